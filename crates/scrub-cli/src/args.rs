//! Command-line argument definitions for the Scrub CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the project to scrub, the configuration
//! file, whether documents are written back, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Scrub tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Project root searched for documents
    #[arg(default_value = ".", help = "Path to the project root")]
    pub project: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report what would change without writing any document
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["scrub"]);
        assert_eq!(args.project, ".");
        assert!(args.config.is_none());
        assert!(!args.dry_run);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "scrub",
            "MyGame",
            "--config",
            "scrub.toml",
            "--dry-run",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.project, "MyGame");
        assert_eq!(args.config.as_deref(), Some("scrub.toml"));
        assert!(args.dry_run);
        assert_eq!(args.log_level, "debug");
    }
}
