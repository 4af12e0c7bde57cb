//! Tool paths and scan defaults, optionally loaded from YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Most-popular TCP ports, used to expand `--top-ports N` for masscan.
pub const TOP_TCP_PORTS: &[u16] = &[
    80, 23, 443, 21, 22, 25, 3389, 110, 445, 139, 143, 53, 135, 3306, 8080, 1723, 111, 995, 993,
    5900, 1025, 587, 8888, 199, 1720, 465, 548, 113, 81, 6001, 10000, 514, 5060, 179, 1026, 2000,
    8443, 8000, 32768, 554, 26, 1433, 49152, 2001, 515, 8008, 49154, 1027, 5666, 646,
];

/// Most-popular UDP ports, used to expand `--top-ports N` for masscan.
pub const TOP_UDP_PORTS: &[u16] = &[
    631, 161, 137, 123, 138, 1434, 445, 135, 67, 53, 139, 500, 68, 520, 1900, 4500, 514, 49152,
    162, 69, 5353, 111, 49154, 1701, 998,
];

/// Where to find each wrapped external program.
///
/// Unknown tools fall back to the bare tool name so anything on PATH still
/// resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(flatten)]
    paths: BTreeMap<String, String>,
}

impl Default for ToolPaths {
    fn default() -> Self {
        let mut paths = BTreeMap::new();
        for (tool, path) in [
            ("amass", "/root/go/bin/amass"),
            ("masscan", "/usr/local/bin/masscan"),
            ("gobuster", "/root/go/bin/gobuster"),
            ("recursive-gobuster", "/opt/recursive-gobuster/recursive-gobuster.pyz"),
            ("aquatone", "/opt/aquatone"),
            ("corscanner", "/opt/CORScanner/cors_scan.py"),
            ("tko-subs", "/root/go/bin/tko-subs"),
            ("tko-subs-dir", "/root/go/src/github.com/anshumanbh/tko-subs"),
            ("subjack", "/root/go/bin/subjack"),
            ("subjack-fingerprints", "/root/go/src/github.com/haccer/subjack/fingerprints.json"),
            ("scheduler", "recon-scheduler"),
        ] {
            paths.insert(tool.to_string(), path.to_string());
        }
        Self { paths }
    }
}

impl ToolPaths {
    /// Absolute path or bare binary name for a tool identifier
    pub fn lookup<'a>(&'a self, tool: &'a str) -> &'a str {
        self.paths.get(tool).map(String::as_str).unwrap_or(tool)
    }
}

/// Default scan parameters, overridable per-invocation from the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefaults {
    pub threads: usize,
    pub rate: u32,
    pub interface: String,
    pub results_dir: String,
    pub gobuster_wordlist: String,
    pub aquatone_scan_timeout: u32,
}

impl Default for ScanDefaults {
    fn default() -> Self {
        Self {
            threads: 20,
            rate: 500,
            interface: "eth0".to_string(),
            results_dir: ".".to_string(),
            gobuster_wordlist: "/usr/share/seclists/Discovery/Web-Content/common.txt".to_string(),
            aquatone_scan_timeout: 900,
        }
    }
}

/// Top-level configuration: tool paths plus scan defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tool_paths: ToolPaths,
    pub defaults: ScanDefaults,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Load an explicit config file, or the per-user one if present,
    /// or built-in defaults
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("reconpipe").join("config.yml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_bare_name() {
        let paths = ToolPaths::default();
        assert_eq!(paths.lookup("masscan"), "/usr/local/bin/masscan");
        assert_eq!(paths.lookup("jq"), "jq");
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
tool_paths:
  amass: /usr/local/bin/amass
defaults:
  threads: 50
  interface: tun0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tool_paths.lookup("amass"), "/usr/local/bin/amass");
        assert_eq!(config.defaults.threads, 50);
        assert_eq!(config.defaults.interface, "tun0");
        // unspecified defaults survive
        assert_eq!(config.defaults.rate, 500);
    }
}
