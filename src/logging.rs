//! Structured logging initialization for stroomer.
//!
//! All diagnostics (configuration problems, unsupported commands, SNMP
//! activity) are tracing events written to stderr.

use std::io::{self, IsTerminal};

use clap::ValueEnum;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (pretty on a TTY, compact otherwise)
    #[default]
    Text,
    /// JSON lines for log shippers
    Json,
}

/// Default filter directive for a verbosity level.
///
/// `quiet` wins over `verbose`.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "stroomer=error";
    }
    match verbose {
        0 => "stroomer=info",
        1 => "stroomer=debug",
        _ => "stroomer=trace",
    }
}

/// Initialize the tracing subscriber.
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the default filter (e.g. "stroomer=debug,elgato_streamdeck=warn")
///
/// | Format | TTY | Output |
/// |--------|-----|--------|
/// | Json | any | JSON lines to stderr |
/// | Text | yes | Pretty colored output to stderr |
/// | Text | no | Compact plain output to stderr |
pub fn init_logging(format: LogFormat, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    match format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_thread_names(true)
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Text if io::stderr().is_terminal() => {
            let fmt_layer = fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_thread_names(true)
                .with_span_events(FmtSpan::NONE)
                .with_writer(io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_thread_names(true)
                .with_span_events(FmtSpan::NONE)
                .compact()
                .with_writer(io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be set once per process, so only the
    // directive selection is tested here.

    #[test]
    fn test_default_directives_parse() {
        for (verbose, quiet) in [(0, false), (1, false), (2, false), (0, true)] {
            let directive = default_directive(verbose, quiet);
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
        assert!(EnvFilter::try_new("stroomer=debug,elgato_streamdeck=warn").is_ok());
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        assert_eq!(default_directive(3, true), "stroomer=error");
        assert_eq!(default_directive(1, false), "stroomer=debug");
        assert_eq!(default_directive(7, false), "stroomer=trace");
    }
}
