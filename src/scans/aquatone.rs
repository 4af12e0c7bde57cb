//! Web screenshots via aquatone

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::webtargets::{WebTargetsParams, WebTargetsScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AquatoneParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
    pub threads: usize,
    pub scan_timeout: u32,
}

impl AquatoneParams {
    pub fn from_args(args: &ScanArgs) -> Result<Self, PipelineError> {
        let upstream = WebTargetsParams::from_args(args)?;
        Ok(Self {
            target_file: upstream.target_file,
            results_dir: upstream.results_dir,
            exempt_list: upstream.exempt_list,
            rate: upstream.rate,
            interface: upstream.interface,
            ports: upstream.ports,
            threads: args.threads,
            scan_timeout: args.scan_timeout,
        })
    }

    pub fn upstream(&self) -> WebTargetsParams {
        WebTargetsParams {
            target_file: self.target_file.clone(),
            results_dir: self.results_dir.clone(),
            exempt_list: self.exempt_list.clone(),
            rate: self.rate,
            interface: self.interface.clone(),
            ports: self.ports.clone(),
        }
    }
}

pub struct AquatoneScan {
    params: AquatoneParams,
}

impl AquatoneScan {
    pub fn new(params: AquatoneParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for AquatoneScan {
    fn name(&self) -> &'static str {
        "aquatone"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(WebTargetsScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("aquatone-{}-results", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let targets = WebTargetsScan::new(self.params.upstream()).artifact();
        let out_dir = self.artifact();
        Invocation::Shell(format!(
            "mkdir -p {out} && {prog} -scan-timeout {timeout} -threads {threads} -silent -out {out} < {targets}",
            out = out_dir.display(),
            prog = paths.lookup("aquatone"),
            timeout = self.params.scan_timeout,
            threads = self.params.threads,
            targets = targets.display(),
        ))
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "aquatone",
        module: module_path!(),
        build: |args| Ok(Box::new(AquatoneScan::new(AquatoneParams::from_args(args)?))),
    });
}
