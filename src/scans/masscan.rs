//! Port scanning via masscan
//!
//! masscan -v --open --banners --rate 1000 -e eth0 -oJ masscan.tesla.json --ports 80,443 -iL amass.tesla.json

use crate::core::config::{TOP_TCP_PORTS, TOP_UDP_PORTS};
use crate::core::{PipelineError, ToolPaths};
use crate::registry::{ScanEntry, ScanRegistry};
use crate::scans::amass::{AmassParams, AmassScan};
use crate::scans::{target_label, Invocation, PipelineStep, ScanArgs};
use regex::Regex;
use std::path::PathBuf;

/// Parameters for [`MasscanScan`]. `ports` is the fully resolved masscan
/// port expression; `--top-ports` has already been expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasscanParams {
    pub target_file: String,
    pub results_dir: PathBuf,
    pub exempt_list: Option<String>,
    pub rate: u32,
    pub interface: String,
    pub ports: String,
}

impl MasscanParams {
    /// Validate and resolve the port selection: exactly one of `--ports`
    /// and `--top-ports` must be given
    pub fn from_args(args: &ScanArgs) -> Result<Self, PipelineError> {
        let ports = resolve_ports(args.ports.as_deref(), args.top_ports)?;
        Ok(Self {
            target_file: args.target_file.clone(),
            results_dir: args.results_dir.clone(),
            exempt_list: args.exempt_list.clone(),
            rate: args.rate,
            interface: args.interface.clone(),
            ports,
        })
    }

    /// The subset of these parameters the upstream amass step needs
    pub fn upstream(&self) -> AmassParams {
        AmassParams {
            target_file: self.target_file.clone(),
            results_dir: self.results_dir.clone(),
            exempt_list: self.exempt_list.clone(),
        }
    }
}

fn resolve_ports(ports: Option<&str>, top_ports: Option<usize>) -> Result<String, PipelineError> {
    match (ports, top_ports) {
        (Some(_), Some(_)) => Err(PipelineError::InvalidParameter(
            "only --ports or --top-ports is permitted, not both".to_string(),
        )),
        (None, None) => Err(PipelineError::InvalidParameter(
            "must specify either --top-ports or --ports".to_string(),
        )),
        (Some(ports), None) => {
            let valid = Regex::new(r"^\d+(,\d+)*$").expect("static regex");
            if !valid.is_match(ports) {
                return Err(PipelineError::InvalidParameter(format!(
                    "--ports must be a comma-separated list of port numbers, got '{ports}'"
                )));
            }
            Ok(ports.to_string())
        }
        (None, Some(0)) => Err(PipelineError::InvalidParameter(
            "--top-ports must be greater than 0".to_string(),
        )),
        (None, Some(n)) => {
            let tcp: Vec<String> = TOP_TCP_PORTS.iter().take(n).map(u16::to_string).collect();
            let udp: Vec<String> = TOP_UDP_PORTS.iter().take(n).map(u16::to_string).collect();
            Ok(format!("{},U:{}", tcp.join(","), udp.join(",")))
        }
    }
}

pub struct MasscanScan {
    params: MasscanParams,
}

impl MasscanScan {
    pub fn new(params: MasscanParams) -> Self {
        Self { params }
    }
}

impl PipelineStep for MasscanScan {
    fn name(&self) -> &'static str {
        "masscan"
    }

    fn upstream(&self) -> Option<Box<dyn PipelineStep>> {
        Some(Box::new(AmassScan::new(self.params.upstream())))
    }

    fn artifact(&self) -> PathBuf {
        self.params
            .results_dir
            .join(format!("masscan.{}.json", target_label(&self.params.target_file)))
    }

    fn invocation(&self, paths: &ToolPaths) -> Invocation {
        let target_list = AmassScan::new(self.params.upstream()).artifact();

        Invocation::Argv(vec![
            paths.lookup("masscan").to_string(),
            "-v".to_string(),
            "--open".to_string(),
            "--banners".to_string(),
            "--rate".to_string(),
            self.params.rate.to_string(),
            "-e".to_string(),
            self.params.interface.clone(),
            "-oJ".to_string(),
            self.artifact().display().to_string(),
            "--ports".to_string(),
            self.params.ports.clone(),
            "-iL".to_string(),
            target_list.display().to_string(),
        ])
    }
}

pub(crate) fn register(registry: &mut ScanRegistry) {
    registry.register(ScanEntry {
        name: "masscan",
        module: module_path!(),
        build: |args| Ok(Box::new(MasscanScan::new(MasscanParams::from_args(args)?))),
    });
}
