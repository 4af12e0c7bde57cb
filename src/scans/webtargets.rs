//! Web target gathering
//!
//! Collapses masscan's JSON results into a deduplicated host list that the
//! web scans fan out from. This is the one built-in step that needs a shell
//! pipeline instead of an argv vector.

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::masscan::{MasscanParams, MasscanScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

/// Parameters for [`WebTargetsScan`]; a superset of what its masscan
/// upstream needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebTargetsParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
}

impl WebTargetsParams {
    pub fn from_args(args: &ScanArgs) -> Result<Self, PipelineError> {
        let masscan = MasscanParams::from_args(args)?;
        Ok(Self {
            target_file: masscan.target_file,
            results_dir: masscan.results_dir,
            exempt_list: masscan.exempt_list,
            rate: masscan.rate,
            interface: masscan.interface,
            ports: masscan.ports,
        })
    }

    pub fn upstream(&self) -> MasscanParams {
        MasscanParams {
            target_file: self.target_file.clone(),
            results_dir: self.results_dir.clone(),
            exempt_list: self.exempt_list.clone(),
            rate: self.rate,
            interface: self.interface.clone(),
            ports: self.ports.clone(),
        }
    }
}

pub struct WebTargetsScan {
    params: WebTargetsParams,
}

impl WebTargetsScan {
    pub fn new(params: WebTargetsParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for WebTargetsScan {
    fn name(&self) -> &'static str {
        "webtargets"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(MasscanScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("webtargets.{}.txt", target_label(&self.params.target_file)))
    }

    fn invocation(&self, _paths: &ToolPaths) -> Invocation {
        let scan_results = MasscanScan::new(self.params.upstream()).artifact();

        Invocation::Shell(format!(
            "jq -r '.[].ip' {} | sort -u > {}",
            scan_results.display(),
            self.artifact().display(),
        ))
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "webtargets",
        module: module_path!(),
        build: |args| Ok(Box::new(WebTargetsScan::new(WebTargetsParams::from_args(args)?))),
    });
}
