//! Logging initialization.
//!
//! Logs always go to stderr so they never interleave with the board or the
//! JSON event stream on stdout. `SCOREBOARD_LOG` overrides the verbosity.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Uses `try_init()` so calling this more than once is harmless.
pub fn init_logging(format: LogFormat, verbosity: u8) {
    let filter = EnvFilter::try_from_env("SCOREBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(verbosity >= 2)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(9), "trace");
    }

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging(LogFormat::Human, 0);
        init_logging(LogFormat::Json, 3);
    }
}
