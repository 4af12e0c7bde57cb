//! CLI command definitions

use crate::core::ScanDefaults;
use crate::scans::ScanArgs;
use clap::Args;
use std::path::PathBuf;

/// Install a recon tool and its dependencies
#[derive(Debug, Args, Clone)]
pub struct InstallCommand {
    /// Tool to install, or "all" for every known tool
    pub tool: String,
}

/// Submit a scan to the scheduler
#[derive(Debug, Args, Clone)]
pub struct ScanCommand {
    /// Name of the scan to run
    pub scan: String,

    /// File of target domains, one per line
    #[arg(long)]
    pub target_file: String,

    /// Directory scan artifacts are written to
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// File of out-of-scope hosts to exclude
    #[arg(long)]
    pub exempt_list: Option<String>,

    /// Network interface port scans egress from
    #[arg(long)]
    pub interface: Option<String>,

    /// Packets-per-second rate for port scanning
    #[arg(long)]
    pub rate: Option<u32>,

    /// Scan the top N most common ports (mutually exclusive with --ports)
    #[arg(long, conflicts_with = "ports")]
    pub top_ports: Option<usize>,

    /// Comma-separated port list (mutually exclusive with --top-ports)
    #[arg(long)]
    pub ports: Option<String>,

    /// Wordlist for forced browsing
    #[arg(long)]
    pub wordlist: Option<String>,

    /// Worker threads for tools that take a thread count
    #[arg(long)]
    pub threads: Option<usize>,

    /// Comma-separated file extensions for forced browsing
    #[arg(long)]
    pub extensions: Option<String>,

    /// HTTP proxy for forced browsing
    #[arg(long)]
    pub proxy: Option<String>,

    /// Recursively brute-force directories
    #[arg(long)]
    pub recursive: bool,

    /// Per-host timeout for screenshotting, in milliseconds
    #[arg(long)]
    pub scan_timeout: Option<u32>,
}

impl ScanCommand {
    /// Resolve CLI options against configured defaults
    pub fn to_scan_args(&self, defaults: &ScanDefaults) -> ScanArgs {
        ScanArgs {
            target_file: self.target_file.clone(),
            results_dir: self
                .results_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(&defaults.results_dir)),
            exempt_list: self.exempt_list.clone(),
            interface: self
                .interface
                .clone()
                .unwrap_or_else(|| defaults.interface.clone()),
            rate: self.rate.unwrap_or(defaults.rate),
            top_ports: self.top_ports,
            ports: self.ports.clone(),
            wordlist: self
                .wordlist
                .clone()
                .unwrap_or_else(|| defaults.gobuster_wordlist.clone()),
            threads: self.threads.unwrap_or(defaults.threads),
            extensions: self.extensions.clone(),
            proxy: self.proxy.clone(),
            recursive: self.recursive,
            scan_timeout: self.scan_timeout.unwrap_or(defaults.aquatone_scan_timeout),
        }
    }

    /// Command-line arguments forwarded verbatim to the scheduler
    ///
    /// Every option is resolved against the defaults so the scheduler
    /// never needs our config file. Global flags like `--verbose` are
    /// deliberately not part of this list.
    pub fn forwarded_args(&self, defaults: &ScanDefaults) -> Vec<String> {
        let args = self.to_scan_args(defaults);
        let mut out = vec![
            "--target-file".to_string(),
            args.target_file,
            "--results-dir".to_string(),
            args.results_dir.display().to_string(),
            "--interface".to_string(),
            args.interface,
            "--rate".to_string(),
            args.rate.to_string(),
            "--threads".to_string(),
            args.threads.to_string(),
            "--wordlist".to_string(),
            args.wordlist,
            "--scan-timeout".to_string(),
            args.scan_timeout.to_string(),
        ];
        if let Some(exempt) = args.exempt_list {
            out.push("--exempt-list".to_string());
            out.push(exempt);
        }
        if let Some(top) = args.top_ports {
            out.push("--top-ports".to_string());
            out.push(top.to_string());
        }
        if let Some(ports) = args.ports {
            out.push("--ports".to_string());
            out.push(ports);
        }
        if let Some(extensions) = args.extensions {
            out.push("--extensions".to_string());
            out.push(extensions);
        }
        if let Some(proxy) = args.proxy {
            out.push("--proxy".to_string());
            out.push(proxy);
        }
        if args.recursive {
            out.push("--recursive".to_string());
        }
        out
    }
}

/// Show known tools and their install status
#[derive(Debug, Args, Clone)]
pub struct ToolsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
