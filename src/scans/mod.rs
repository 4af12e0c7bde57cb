//! Pipeline step contract and the built-in scan steps
//!
//! Each step wraps one external program invocation. A step declares at most
//! one upstream dependency, a deterministic completion artifact, and how to
//! build its command line. The DAG scheduler that walks chains, dedupes
//! shared upstream work, and skips steps whose artifact already exists is
//! an external collaborator; nothing here executes a scan.

pub mod amass;
pub mod aquatone;
pub mod corscanner;
pub mod gobuster;
pub mod masscan;
pub mod takeover;
pub mod webtargets;

use crate::core::ToolPaths;
use crate::registry::ScanRegistry;
use std::path::{Path, PathBuf};

/// The command an external scheduler should run for a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Pre-split argv, program first
    Argv(Vec<String>),
    /// A line for `sh -c` (steps that need pipes or redirection)
    Shell(String),
}

impl Invocation {
    /// Render for display/logging
    pub fn display(&self) -> String {
        match self {
            Invocation::Argv(argv) => argv.join(" "),
            Invocation::Shell(line) => line.clone(),
        }
    }
}

/// One stage of a reconnaissance pipeline.
///
/// `invocation` must be a pure function of the step's own parameters and
/// the injected tool-path lookup; upstream artifact locations are derived
/// from those parameters, never from ambient state. That keeps the artifact
/// key stable across descriptors built from identical parameters, which is
/// what lets a scheduler deduplicate shared upstream work.
pub trait PipelineStep: Send + Sync {
    /// Command name of this step (also the wrapped tool's catalog name)
    fn name(&self) -> &'static str;

    /// Immediate predecessor, parameterized with the subset of this step's
    /// parameters it needs; `None` for a root step
    fn upstream(&self) -> Option<Box<dyn PipelineStep>>;

    /// Completion artifact. Its existence means "already computed, safe to
    /// reuse"; interpreting that is the scheduler's job.
    fn artifact(&self) -> PathBuf;

    /// Build the external invocation
    fn invocation(&self, paths: &ToolPaths) -> Invocation;
}

impl std::fmt::Debug for dyn PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStep")
            .field("name", &self.name())
            .finish()
    }
}

/// Operator-supplied scan parameters, after defaults have been applied.
///
/// Step builders pull the fields they declare and validate them; anything a
/// step does not declare never reaches its command line.
#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub interface: String,
    pub rate: u32,
    pub top_ports: Option<usize>,
    pub ports: Option<String>,
    pub wordlist: String,
    pub threads: usize,
    pub extensions: Option<String>,
    pub proxy: Option<String>,
    pub recursive: bool,
    pub scan_timeout: u32,
}

/// Register every built-in scan module
pub fn register_all(registry: &mut ScanRegistry) {
    amass::register(registry);
    masscan::register(registry);
    webtargets::register(registry);
    gobuster::register(registry);
    aquatone::register(registry);
    takeover::register(registry);
    corscanner::register(registry);
}

/// Walk `upstream` links from a step back to its root; leaf first
pub fn upstream_chain(step: Box<dyn PipelineStep>) -> Vec<Box<dyn PipelineStep>> {
    let mut chain = Vec::new();
    let mut current = Some(step);
    while let Some(step) = current {
        current = step.upstream();
        chain.push(step);
    }
    chain
}

/// Short label for artifact names: the target file's final path component
pub(crate) fn target_label(target_file: &str) -> String {
    Path::new(target_file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| target_file.to_string())
}

/// Canned arguments shared by the scan module tests
#[cfg(test)]
pub(crate) fn sample_args() -> ScanArgs {
    ScanArgs {
        target_file: "tesla".to_string(),
        results_dir: PathBuf::from("/tmp/recon"),
        exempt_list: None,
        interface: "eth0".to_string(),
        rate: 500,
        top_ports: Some(10),
        ports: None,
        wordlist: "/usr/share/seclists/Discovery/Web-Content/common.txt".to_string(),
        threads: 20,
        extensions: None,
        proxy: None,
        recursive: false,
        scan_timeout: 900,
    }
}
