//! Tool installation: resolver, command execution, persisted state

pub mod resolver;
pub mod runner;
pub mod state;

pub use resolver::{InstallEvent, InstallOutcome, InstallReport, InstallResolver, ALL_TOOLS};
pub use runner::{CommandRunner, ProcessRunner};
pub use state::{InMemoryStateStore, InstallState, JsonStateStore, StateStore};
