//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{InstallCommand, ScanCommand, ToolsCommand};

/// Reconnaissance pipeline front end
#[derive(Debug, Parser, Clone)]
#[command(name = "reconpipe")]
#[command(author = "Reconpipe Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Automated target reconnaissance pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to pipeline configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Install a recon tool and its dependencies
    Install(InstallCommand),

    /// Submit a scan to the scheduler
    Scan(ScanCommand),

    /// Show known tools and their install status
    Tools(ToolsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_parses_tool_name() {
        let cli = Cli::try_parse_from(["reconpipe", "install", "masscan"]).unwrap();
        let Command::Install(cmd) = cli.command else {
            panic!("expected install command");
        };
        assert_eq!(cmd.tool, "masscan");
    }

    #[test]
    fn test_scan_rejects_ports_with_top_ports() {
        let result = Cli::try_parse_from([
            "reconpipe",
            "scan",
            "masscan",
            "--target-file",
            "tesla",
            "--ports",
            "80,443",
            "--top-ports",
            "100",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["reconpipe", "tools", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
