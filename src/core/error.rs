//! Pipeline error taxonomy

use thiserror::Error;

/// Errors raised by the registry, installer, and scan front end.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An unknown scan or tool name was requested
    #[error("no scan or tool named '{0}'")]
    NotFound(String),

    /// A scan name is claimed by more than one module; the caller must
    /// disambiguate rather than have one picked silently
    #[error("scan '{name}' is provided by multiple modules: {}", .modules.join(", "))]
    AmbiguousScan { name: String, modules: Vec<String> },

    /// The tool dependency graph contains a cycle
    #[error("dependency cycle detected: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    /// A dependency failed to install, so the dependent tool was not attempted
    #[error("cannot install '{tool}': dependency '{dependency}' did not install")]
    DependencyFailed { tool: String, dependency: String },

    /// An external command could not be run or exited non-zero
    #[error("command '{command}' failed: {stderr}")]
    CommandExecution {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The persisted install state is unreadable or unwritable
    #[error("install state at {path} is unusable: {reason}")]
    Persistence { path: String, reason: String },

    /// A scan was given parameters its builder rejects
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
