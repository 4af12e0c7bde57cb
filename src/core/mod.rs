//! Core domain models
//!
//! Defines the installable-tool model, the built-in tool catalog, the error
//! taxonomy, and the tool-path/defaults configuration shared by the
//! installer and the scan front end.

pub mod catalog;
pub mod config;
pub mod error;
pub mod tool;

pub use config::{Config, ScanDefaults, ToolPaths};
pub use error::PipelineError;
pub use tool::{CommandFailure, CommandOutcome, ToolSpec};
