//! Test utility functions for reconpipe

use async_trait::async_trait;
use reconpipe::core::{CommandOutcome, ToolSpec};
use reconpipe::install::{CommandRunner, InMemoryStateStore, InstallResolver, InstallState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Command runner that never touches the system
///
/// Commands succeed unless scripted to fail, and every execution is
/// recorded so tests can assert on ordering and counts.
pub struct FakeRunner {
    failures: HashMap<String, i32>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            failures: HashMap::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a command to exit with the given non-zero code
    pub fn fail_command(mut self, command: &str, exit_code: i32) -> Self {
        self.failures.insert(command.to_string(), exit_code);
        self
    }

    /// Handle to the execution log, valid after the runner is moved
    /// into a resolver
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &str, _shell: bool) -> CommandOutcome {
        self.log.lock().unwrap().push(command.to_string());
        match self.failures.get(command) {
            Some(code) => CommandOutcome {
                exit_code: Some(*code),
                stderr: format!("scripted failure for '{}'", command),
            },
            None => CommandOutcome {
                exit_code: Some(0),
                stderr: String::new(),
            },
        }
    }
}

/// Build a resolver over the given tool table and runner
pub fn resolver_with(
    state: InstallState,
    runner: FakeRunner,
) -> InstallResolver<InMemoryStateStore, FakeRunner> {
    InstallResolver::new(InMemoryStateStore::seeded(state), runner)
}

/// A tool with one install command named after the tool
pub fn tool(dependencies: &[&str], name: &str) -> ToolSpec {
    ToolSpec::new(dependencies, &[&format!("install {}", name)], false)
}

/// Number of times a command was executed
pub fn executions_of(log: &Arc<Mutex<Vec<String>>>, command: &str) -> usize {
    log.lock().unwrap().iter().filter(|c| *c == command).count()
}
