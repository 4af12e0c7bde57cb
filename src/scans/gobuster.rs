//! Forced browsing via gobuster
//!
//! One gobuster run per gathered web target, over both URL schemes, with
//! per-target output files collected in a results directory. The recursive
//! variant hands each target to recursive-gobuster instead.

use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::webtargets::{WebTargetsParams, WebTargetsScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use std::path::PathBuf;

/// Parameters for [`GobusterScan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GobusterParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
    pub wordlist: String,
    pub threads: usize,
    pub extensions: Option<String>,
    pub proxy: Option<String>,
    /// Recursively bust each target (may produce a LOT of traffic, quickly)
    pub recursive: bool,
}

impl GobusterParams {
    pub fn from_args(args: &ScanArgs) -> Result<Self, PipelineError> {
        let upstream = WebTargetsParams::from_args(args)?;
        Ok(Self {
            target_file: upstream.target_file,
            results_dir: upstream.results_dir,
            exempt_list: upstream.exempt_list,
            rate: upstream.rate,
            interface: upstream.interface,
            ports: upstream.ports,
            wordlist: args.wordlist.clone(),
            threads: args.threads,
            extensions: args.extensions.clone(),
            proxy: args.proxy.clone(),
            recursive: args.recursive,
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

pub struct GobusterScan {
    params: GobusterParams,
}

impl GobusterScan {
    pub fn new(params: GobusterParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for GobusterScan {
    fn name(&self) -> &'static str {
        "gobuster"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(WebTargetsScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("gobuster-{}-results", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let targets = WebTargetsScan::new(self.params.upstream()).artifact();
        let out_dir = self.artifact();

        if self.params.recursive {
            return Invocation::Shell(format!(
                "mkdir -p {out} && cd {out} && for t in $(cat {targets}); do {prog} -w {wordlist} -u https://$t; done",
                out = out_dir.display(),
                targets = targets.display(),
                prog = paths.lookup("recursive-gobuster"),
                wordlist = self.params.wordlist,
            ));
        }

        let mut extra = String::new();
        if let Some(extensions) = &self.params.extensions {
            extra.push_str(&format!(" -x {}", extensions));
        }
        if let Some(proxy) = &self.params.proxy {
            extra.push_str(&format!(" -p {}", proxy));
        }

        Invocation::Shell(format!(
            "mkdir -p {out} && for t in $(cat {targets}); do {prog} dir -q -e -k -t {threads} -w {wordlist}{extra} -u http://$t -o {out}/gobuster.$t.txt; done",
            out = out_dir.display(),
            targets = targets.display(),
            prog = paths.lookup("gobuster"),
            threads = self.params.threads,
            wordlist = self.params.wordlist,
        ))
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "gobuster",
        module: module_path!(),
        build: |args| Ok(Box::new(GobusterScan::new(GobusterParams::from_args(args)?))),
    });
}
