//! Scan chain scenarios: registry lookup, upstream walking, artifact keys

use reconpipe::core::ToolPaths;
use reconpipe::scans::{upstream_chain, Invocation, ScanArgs};
use reconpipe::{PipelineError, ScanRegistry};
use std::path::PathBuf;

fn args() -> ScanArgs {
    ScanArgs {
        target_file: "tesla".to_string(),
        results_dir: PathBuf::from("/tmp/recon"),
        exempt_list: None,
        interface: "eth0".to_string(),
        rate: 500,
        top_ports: Some(100),
        ports: None,
        wordlist: "/wordlists/common.txt".to_string(),
        threads: 20,
        extensions: None,
        proxy: None,
        recursive: false,
        scan_timeout: 900,
    }
}

#[test]
fn test_registry_builds_every_registered_scan() {
    let registry = ScanRegistry::discover();
    for name in registry.names() {
        let entry = registry.lookup_unique(name).unwrap();
        let step = (entry.build)(&args()).unwrap();
        assert_eq!(step.name(), name);
    }
}

#[test]
fn test_gobuster_chain_reaches_amass() {
    let registry = ScanRegistry::discover();
    let entry = registry.lookup_unique("gobuster").unwrap();
    let step = (entry.build)(&args()).unwrap();

    let chain: Vec<&'static str> = upstream_chain(step).iter().map(|s| s.name()).collect();
    assert_eq!(chain, vec!["gobuster", "webtargets", "masscan", "amass"]);
}

#[test]
fn test_identical_parameters_yield_identical_artifacts() {
    let registry = ScanRegistry::discover();
    let entry = registry.lookup_unique("masscan").unwrap();

    // same parameters, two separate builds: the scheduler relies on the
    // artifact path being a stable completion key
    let first = (entry.build)(&args()).unwrap().artifact();
    let second = (entry.build)(&args()).unwrap().artifact();
    assert_eq!(first, second);
    assert_eq!(first, PathBuf::from("/tmp/recon/masscan.tesla.json"));
}

#[test]
fn test_sibling_scans_share_one_upstream_artifact() {
    let registry = ScanRegistry::discover();
    let mut upstream_artifacts = Vec::new();

    for name in ["gobuster", "aquatone", "tko-subs", "subjack", "corscanner"] {
        let entry = registry.lookup_unique(name).unwrap();
        let step = (entry.build)(&args()).unwrap();
        upstream_artifacts.push(step.upstream().unwrap().artifact());
    }

    upstream_artifacts.dedup();
    assert_eq!(upstream_artifacts.len(), 1);
}

#[test]
fn test_invocations_are_pure() {
    let registry = ScanRegistry::discover();
    let paths = ToolPaths::default();

    for name in registry.names() {
        let entry = registry.lookup_unique(name).unwrap();
        let step = (entry.build)(&args()).unwrap();
        let first = step.invocation(&paths);
        let second = step.invocation(&paths);
        match (first, second) {
            (Invocation::Argv(a), Invocation::Argv(b)) => assert_eq!(a, b),
            (Invocation::Shell(a), Invocation::Shell(b)) => assert_eq!(a, b),
            _ => panic!("invocation flavor changed between calls for {}", name),
        }
    }
}

#[test]
fn test_port_options_are_mutually_exclusive() {
    let registry = ScanRegistry::discover();
    let entry = registry.lookup_unique("masscan").unwrap();

    let mut both = args();
    both.ports = Some("80,443".to_string());
    let err = (entry.build)(&both).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidParameter(_)));

    let mut neither = args();
    neither.top_ports = None;
    let err = (entry.build)(&neither).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidParameter(_)));
}

#[test]
fn test_unknown_scan_is_not_found() {
    let registry = ScanRegistry::discover();
    let err = registry.lookup_unique("nmap").unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
}
