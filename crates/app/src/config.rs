//! Configuration for the huffseal application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: it then runs the built-in
//! example paragraph. The seed only drives sample text generation; keys and
//! IVs always come from the operating system's random source.

use huffseal_core::{PipelineOptions, PlaintextLayout};
use std::path::PathBuf;
use tracing::Level;

/// Where the input text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// The built-in example paragraph
    Example,
    /// Text given on the command line
    Text(String),
    /// A UTF-8 file
    File(PathBuf),
    /// Generated text of the given number of symbols
    Sample { symbols: usize },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Input ===
    pub input: InputSource,

    /// Seed for sample generation
    pub seed: u64,

    // === Pipeline ===
    /// Plaintext layout handed to the cipher
    pub layout: PlaintextLayout,

    /// Flip a ciphertext byte before opening (failure demonstration)
    pub corrupt_ciphertext: bool,

    // === Outputs ===
    /// Text report path (written only if verification passes)
    pub report_file: Option<PathBuf>,

    /// Envelope JSON path
    pub envelope_file: Option<PathBuf>,

    // === Behavior ===
    /// Maximum tracing level on stderr
    pub log_level: Level,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the stage-by-stage walk-through
    pub print_stages: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If --seed is not provided, a time-based seed is used (and printed by
    /// `--print-config` so the run can be repeated).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut input: Option<InputSource> = None;
        let mut seed: Option<u64> = None;
        let mut layout = PlaintextLayout::Ascii;
        let mut corrupt_ciphertext = false;
        let mut report_file: Option<PathBuf> = None;
        let mut envelope_file: Option<PathBuf> = None;
        let mut log_level = Level::WARN;
        let mut print_config = false;
        let mut print_stages = true;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--text" => {
                    let text = value(args, &mut i, "--text requires a string")?;
                    set_input(&mut input, InputSource::Text(text.to_string()))?;
                }
                "--in" => {
                    let path = value(args, &mut i, "--in requires a path")?;
                    set_input(&mut input, InputSource::File(PathBuf::from(path)))?;
                }
                "--sample" => {
                    let n = value(args, &mut i, "--sample requires a number")?;
                    let symbols = n.parse().map_err(|_| "invalid sample size")?;
                    if symbols == 0 {
                        return Err("--sample must be at least 1".to_string());
                    }
                    set_input(&mut input, InputSource::Sample { symbols })?;
                }
                "--seed" => {
                    let n = value(args, &mut i, "--seed requires a number")?;
                    seed = Some(n.parse().map_err(|_| "invalid seed")?);
                }
                "--pack-bits" => {
                    layout = PlaintextLayout::Packed;
                }
                "--corrupt" => {
                    corrupt_ciphertext = true;
                }
                "--report" => {
                    let path = value(args, &mut i, "--report requires a path")?;
                    report_file = Some(PathBuf::from(path));
                }
                "--envelope" => {
                    let path = value(args, &mut i, "--envelope requires a path")?;
                    envelope_file = Some(PathBuf::from(path));
                }
                "--log" => {
                    let level = value(args, &mut i, "--log requires a level")?;
                    log_level = level
                        .parse()
                        .map_err(|_| format!("invalid log level: {level}"))?;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--quiet" => {
                    print_stages = false;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        Ok(Config {
            input: input.unwrap_or(InputSource::Example),
            seed,
            layout,
            corrupt_ciphertext,
            report_file,
            envelope_file,
            log_level,
            print_config,
            print_stages,
            print_metrics,
        })
    }

    /// Options for the core pipeline.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            layout: self.layout,
            corrupt_ciphertext: self.corrupt_ciphertext,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.input {
            InputSource::Example => println!("Input: built-in example"),
            InputSource::Text(text) => println!("Input: command line ({} symbols)", text.chars().count()),
            InputSource::File(path) => println!("Input: {}", path.display()),
            InputSource::Sample { symbols } => println!("Input: generated sample ({symbols} symbols)"),
        }
        println!("Seed: {}", self.seed);
        println!();
        println!("Cipher: AES-256-CBC, PKCS#7 padding");
        println!("Plaintext layout: {}", self.layout);
        println!("Corrupt ciphertext: {}", self.corrupt_ciphertext);
        println!();
        println!(
            "Report: {}",
            self.report_file
                .as_ref()
                .map_or("(none)".to_string(), |p| p.display().to_string())
        );
        println!(
            "Envelope: {}",
            self.envelope_file
                .as_ref()
                .map_or("(none)".to_string(), |p| p.display().to_string())
        );
        println!("Log level: {}", self.log_level);
        println!();
    }
}

/// Advance to the value following a flag.
fn value<'a>(args: &'a [String], i: &mut usize, missing: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| missing.to_string())
}

fn set_input(input: &mut Option<InputSource>, source: InputSource) -> Result<(), String> {
    if input.is_some() {
        return Err("only one of --text, --in, --sample may be given".to_string());
    }
    *input = Some(source);
    Ok(())
}

fn print_help() {
    println!("huffseal: Huffman compression sealed with AES-256, verified end to end");
    println!();
    println!("USAGE:");
    println!("    huffseal [OPTIONS]");
    println!();
    println!("INPUT (default: built-in example paragraph):");
    println!("    --text <TEXT>           Use TEXT as input");
    println!("    --in <PATH>             Read input from a UTF-8 file");
    println!("    --sample <N>            Generate N symbols of sample text");
    println!("    --seed <N>              Seed for --sample (default: time-based)");
    println!();
    println!("PIPELINE:");
    println!("    --pack-bits             Pack 8 bits per byte before encryption");
    println!("                            (default: one ASCII '0'/'1' per bit)");
    println!("    --corrupt               Flip a ciphertext byte before decrypting");
    println!();
    println!("OUTPUT:");
    println!("    --report <PATH>         Write a text report (only if verified)");
    println!("    --envelope <PATH>       Write the IV/ciphertext envelope as JSON");
    println!("    --log <LEVEL>           trace, debug, info, warn, error (default: warn)");
    println!("    --print-config          Print resolved configuration");
    println!("    --quiet                 Don't print the stage walk-through");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffseal                                  # Run the example paragraph");
    println!("    huffseal --text AAAABBC                   # The textbook case");
    println!("    huffseal --sample 5000 --seed 42          # Deterministic sample");
    println!("    huffseal --in notes.txt --report out.txt  # Report for a file");
    println!("    huffseal --corrupt                        # Watch verification fail");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(&[]).unwrap();
        assert_eq!(config.input, InputSource::Example);
        assert_eq!(config.layout, PlaintextLayout::Ascii);
        assert!(!config.corrupt_ciphertext);
        assert!(config.report_file.is_none());
        assert_eq!(config.log_level, Level::WARN);
        assert!(config.print_stages);
        assert!(config.print_metrics);
    }

    #[test]
    fn test_text_and_flags() {
        let config = Config::from_args(&args(&[
            "--text", "AAAABBC", "--pack-bits", "--corrupt", "--report", "r.txt", "--log", "debug",
        ]))
        .unwrap();

        assert_eq!(config.input, InputSource::Text("AAAABBC".to_string()));
        assert_eq!(config.layout, PlaintextLayout::Packed);
        assert!(config.corrupt_ciphertext);
        assert_eq!(config.report_file, Some(PathBuf::from("r.txt")));
        assert_eq!(config.log_level, Level::DEBUG);

        let options = config.pipeline_options();
        assert_eq!(options.layout, PlaintextLayout::Packed);
        assert!(options.corrupt_ciphertext);
    }

    #[test]
    fn test_sample_with_seed() {
        let config = Config::from_args(&args(&["--sample", "500", "--seed", "42"])).unwrap();
        assert_eq!(config.input, InputSource::Sample { symbols: 500 });
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_conflicting_inputs() {
        let err = Config::from_args(&args(&["--text", "a", "--in", "b.txt"])).unwrap_err();
        assert!(err.contains("only one"));
    }

    #[test]
    fn test_missing_value() {
        assert!(Config::from_args(&args(&["--text"])).is_err());
        assert!(Config::from_args(&args(&["--seed"])).is_err());
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_args(&args(&["--seed", "abc"])).is_err());
        assert!(Config::from_args(&args(&["--sample", "0"])).is_err());
        assert!(Config::from_args(&args(&["--log", "loud"])).is_err());
    }

    #[test]
    fn test_unknown_argument() {
        let err = Config::from_args(&args(&["--frobnicate"])).unwrap_err();
        assert_eq!(err, "unknown argument: --frobnicate");
    }
}
