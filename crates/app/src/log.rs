//! Tracing subscriber set-up for the command-line tool.
//!
//! The core library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed here. Events go to standard error so that the
//! walk-through on standard output stays clean.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global logging subscriber.
///
/// Call once, before running the pipeline. Returns `false` if a subscriber
/// was already installed (the existing one is kept).
///
/// # Arguments
/// * `max_level` - The maximum level of events to print (e.g., `Level::INFO`).
pub fn init_subscriber(max_level: Level) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_refused() {
        // Either this call or another test's installed the first subscriber
        init_subscriber(Level::WARN);
        assert!(!init_subscriber(Level::DEBUG));
    }
}
