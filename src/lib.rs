//! reconpipe - automated target reconnaissance pipeline

pub mod cli;
pub mod core;
pub mod install;
pub mod registry;
pub mod scans;
pub mod scheduler;

// Re-export commonly used types
pub use core::{Config, PipelineError, ScanDefaults, ToolPaths, ToolSpec};
pub use install::{InstallEvent, InstallOutcome, InstallResolver, JsonStateStore, ProcessRunner};
pub use registry::{ScanEntry, ScanRegistry};
pub use scans::{Invocation, PipelineStep, ScanArgs};
pub use scheduler::{Scheduler, SubprocessScheduler};
