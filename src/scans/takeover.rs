//! Subdomain takeover checks via tko-subs and subjack
//!
//! Both steps fan out from the gathered web targets and can run side by
//! side in the same scheduler graph.

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::webtargets::{WebTargetsParams, WebTargetsScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoverParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
    pub threads: usize,
}

impl TakeoverParams {
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

pub struct TkoSubsScan {
    params: TakeoverParams,
}

impl TkoSubsScan {
    pub fn new(params: TakeoverParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for TkoSubsScan {
    fn name(&self) -> &'static str {
        "tko-subs"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(WebTargetsScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("tkosubs.{}.csv", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let targets = WebTargetsScan::new(self.params.upstream()).artifact();
        Invocation::Argv(vec![
            paths.lookup("tko-subs").to_string(),
            format!("-domains={}", targets.display()),
            format!("-data={}/providers-data.csv", paths.lookup("tko-subs-dir")),
            format!("-output={}", self.artifact().display()),
        ])
    }
}

pub struct SubjackScan {
    params: TakeoverParams,
}

impl SubjackScan {
    pub fn new(params: TakeoverParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for SubjackScan {
    fn name(&self) -> &'static str {
        "subjack"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(WebTargetsScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("subjack.{}.txt", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let targets = WebTargetsScan::new(self.params.upstream()).artifact();
        Invocation::Argv(vec![
            paths.lookup("subjack").to_string(),
            "-w".to_string(),
            targets.display().to_string(),
            "-t".to_string(),
            self.params.threads.to_string(),
            "-a".to_string(),
            "-timeout".to_string(),
            "30".to_string(),
            "-o".to_string(),
            self.artifact().display().to_string(),
            "-v".to_string(),
            "-ssl".to_string(),
            "-c".to_string(),
            paths.lookup("subjack-fingerprints").to_string(),
        ])
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "tko-subs",
        module: module_path!(),
        build: |args| Ok(Box::new(TkoSubsScan::new(TakeoverParams::from_args(args)?))),
    });
    registry.register(ScanEntry {
        name: "subjack",
        module: module_path!(),
        build: |args| Ok(Box::new(SubjackScan::new(TakeoverParams::from_args(args)?))),
    });
}
