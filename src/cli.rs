// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand, ValueEnum};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "og-sentinel",
    version = "0.1.0",
    about = "A CLI tool to inspect, validate and monitor Open Graph metadata",
    long_about = "og-sentinel fetches web pages, extracts their Open Graph tags and either \
                  prints them, validates them against required-tag sets, or watches them \
                  over time and reports changes. Non-zero exit codes on missing tags or \
                  fetch failures make it a good fit for CI/CD pipelines."
)]
pub struct Cli {
    /// Disable coloured output
    ///
    /// Colour is also disabled automatically when stdout is not a terminal
    /// or when the NO_COLOR environment variable is set
    ///
    /// 'global = true' makes the flag usable after any subcommand too
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level for diagnostic output on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Emit logs as newline-delimited JSON instead of human-readable text
    #[arg(long, global = true)]
    pub log_json: bool,

    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// Log verbosity choices for the --log-level flag
//
// ValueEnum generates the string parsing ("debug" -> LogLevel::Debug)
// and the list of allowed values shown in --help
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The directive string understood by tracing's EnvFilter
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// This enum defines our subcommands (inspect, validate, monitor)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect Open Graph metadata for one or many URLs (use "-" to read from STDIN)
    ///
    /// Example: og-sentinel inspect https://example.com https://example.org
    Inspect {
        /// URLs to inspect; pass "-" to read additional URLs from STDIN,
        /// one per line
        ///
        /// These are positional arguments (at least one required)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output aggregated raw JSON instead of per-URL tables
        #[arg(long, short = 'j')]
        json: bool,

        /// HTTP timeout in seconds, applied to each fetch independently
        #[arg(long, short = 't', default_value_t = 10)]
        timeout: u64,

        /// Number of concurrent workers
        ///
        /// Defaults to the number of available CPUs and is capped at the
        /// number of URLs, so a single URL never spawns a whole pool
        #[arg(long, short = 'w')]
        workers: Option<usize>,
    },

    /// Exit with status 1 if required Open Graph tags are missing
    ///
    /// Example: og-sentinel validate https://example.com --essentials
    Validate {
        /// URL to validate
        url: String,

        /// Validate only the essential tags (title, type, image, url, description)
        #[arg(long, short = 'e')]
        essentials: bool,

        /// Enable advanced semantic validation (image resolution, article tags)
        #[arg(long, short = 's')]
        semantic: bool,

        /// HTTP timeout in seconds
        #[arg(long, short = 't', default_value_t = 10)]
        timeout: u64,
    },

    /// Watch a URL and report any Open Graph tag changes until Ctrl+C
    ///
    /// Example: og-sentinel monitor https://example.com --interval 60
    Monitor {
        /// URL to watch
        url: String,

        /// Seconds between successive checks
        #[arg(long, short = 'i', default_value_t = 300)]
        interval: u64,

        /// HTTP timeout in seconds for each check
        #[arg(long, short = 't', default_value_t = 10)]
        timeout: u64,

        /// Print each diff as JSON instead of coloured text
        #[arg(long, short = 'j')]
        json_diff: bool,

        /// Print each diff in unified format (git style)
        #[arg(long, short = 'u', conflicts_with = "json_diff")]
        unified: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_defaults() {
        let cli = Cli::parse_from(["og-sentinel", "inspect", "https://example.com"]);
        match cli.command {
            Commands::Inspect { urls, json, timeout, workers } => {
                assert_eq!(urls, vec!["https://example.com"]);
                assert!(!json);
                assert_eq!(timeout, 10);
                assert_eq!(workers, None);
            }
            _ => panic!("expected inspect subcommand"),
        }
    }

    #[test]
    fn test_parse_monitor_flags() {
        let cli = Cli::parse_from([
            "og-sentinel",
            "monitor",
            "https://example.com",
            "--interval",
            "30",
            "--unified",
        ]);
        match cli.command {
            Commands::Monitor { url, interval, unified, json_diff, .. } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(interval, 30);
                assert!(unified);
                assert!(!json_diff);
            }
            _ => panic!("expected monitor subcommand"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["og-sentinel", "validate", "https://example.com", "--no-color"]);
        assert!(cli.no_color);
    }
}
