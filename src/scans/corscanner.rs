//! CORS misconfiguration checks via CORScanner

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::webtargets::{WebTargetsParams, WebTargetsScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorscannerParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
    pub threads: usize,
}

impl CorscannerParams {
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

pub struct CorscannerScan {
    params: CorscannerParams,
}

impl CorscannerScan {
    pub fn new(params: CorscannerParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for CorscannerScan {
    fn name(&self) -> &'static str {
        "corscanner"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(WebTargetsScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("corscanner.{}.json", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let targets = WebTargetsScan::new(self.params.upstream()).artifact();
        // CORScanner ships as a python script, not a binary
        Invocation::Argv(vec![
            "python3".to_string(),
            paths.lookup("corscanner").to_string(),
            "-i".to_string(),
            targets.display().to_string(),
            "-t".to_string(),
            self.params.threads.to_string(),
            "-o".to_string(),
            self.artifact().display().to_string(),
        ])
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "corscanner",
        module: module_path!(),
        build: |args| Ok(Box::new(CorscannerScan::new(CorscannerParams::from_args(args)?))),
    });
}
