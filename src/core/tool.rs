//! Installable-tool domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One installable external tool. The install state maps tool name to this
/// entry; the name itself lives in the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Whether the most recent install run succeeded for every command
    #[serde(default)]
    pub installed: bool,

    /// Names of tools that must be installed first, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Install commands, run in declaration order
    pub commands: Vec<String>,

    /// Run commands through `sh -c` instead of splitting into argv
    /// (go tools chain subshells during install, so they need a real shell)
    #[serde(default)]
    pub shell: bool,

    /// When an install was last attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt: Option<DateTime<Utc>>,
}

impl ToolSpec {
    /// Create a not-yet-installed tool entry
    pub fn new(dependencies: &[&str], commands: &[&str], shell: bool) -> Self {
        Self {
            installed: false,
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            shell,
            last_attempt: None,
        }
    }
}

/// Captured result of one install command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code; `None` when the process could not be spawned or was
    /// killed by a signal
    pub exit_code: Option<i32>,

    /// Captured standard error, trimmed
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// A command that exited non-zero (or failed to spawn), with its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stderr: String,
}
