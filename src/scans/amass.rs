//! Subdomain enumeration via amass
//!
//! Root of every built-in chain. Expects the target file to hold one
//! top-level domain per line and writes newline-delimited JSON findings.
//!
//! amass enum -active -ip -brute -min-for-recursive 3 -df tesla -json amass.tesla.json

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

/// Parameters for [`AmassScan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmassParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    /// File of blacklisted subdomains, one per line
    pub exempt_list: Option<String>,
}

impl AmassParams {
    pub fn from_args(args: &ScanArgs) -> Self {
        Self {
            target_file: args.target_file.clone(),
            results_dir: args.results_dir.clone(),
            exempt_list: args.exempt_list.clone(),
        }
    }
}

pub struct AmassScan {
    params: AmassParams,
}

impl AmassScan {
    pub fn new(params: AmassParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for AmassScan {
    fn name(&self) -> &'static str {
        "amass"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        None
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("amass.{}.json", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let mut argv = vec![paths.lookup("amass").to_string()];
        argv.extend(
            ["enum", "-active", "-ip", "-brute", "-min-for-recursive", "3", "-df"]
                .iter()
                .map(|s| s.to_string()),
        );
        argv.push(self.params.target_file.clone());
        argv.push("-json".to_string());
        argv.push(self.artifact().display().to_string());

        if let Some(exempt) = &self.params.exempt_list {
            argv.push("-blf".to_string());
            argv.push(exempt.clone());
        }

        Invocation::Argv(argv)
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "amass",
        module: module_path!(),
        build: |args| Ok(Box::new(AmassScan::new(AmassParams::from_args(args)))),
    });
}
