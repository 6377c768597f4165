//! huffseal: compress a text with Huffman coding, seal it with AES-256,
//! open it again and verify the round trip.
//!
//! Exit codes: 0 when the round trip verified, 1 when it did not or a fatal
//! error occurred, 2 on bad arguments.

mod config;
mod input_gen;
mod log;
mod report;
mod stages;

use config::Config;
use huffseal_core::{Error, PipelineReport};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {}", Error::Config(msg));
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    log::init_subscriber(config.log_level);

    match run(&config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run the pipeline and produce every requested output.
///
/// Returns whether the round trip verified.
fn run(config: &Config) -> huffseal_core::Result<bool> {
    if config.print_config {
        config.print();
    }

    let text = input_gen::load_input(config)?;
    let outcome = huffseal_core::run(&text, &config.pipeline_options())?;

    if config.print_stages {
        stages::print_walkthrough(&outcome);
    }

    if let Some(path) = &config.envelope_file {
        write_envelope(path, &outcome)?;
        if !config.print_stages {
            println!("Key (256 bits / 64 hex): {}", outcome.key.to_hex().as_str());
        }
        println!(
            "Envelope written to {} (open it with the key shown)",
            path.display()
        );
    }

    if let Some(path) = &config.report_file {
        if report::write(path, &outcome)? {
            println!("Report written to {}", path.display());
        } else {
            eprintln!("error: cannot generate report: verification failed");
        }
    }

    if config.print_metrics {
        outcome.metrics.print_summary();
    }
    outcome.metrics.print_result();

    Ok(outcome.verified())
}

/// Write the envelope JSON. The key is not part of it.
fn write_envelope(path: &Path, outcome: &PipelineReport) -> huffseal_core::Result<()> {
    std::fs::write(path, outcome.envelope.to_json()?)?;
    tracing::info!(path = %path.display(), "envelope written");
    Ok(())
}
