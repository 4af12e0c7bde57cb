//! Dependency-aware tool installer
//!
//! Resolves a tool and its transitive dependencies depth-first, runs each
//! tool's install commands, and persists the whole state table whether or
//! not the install succeeded.

use crate::core::{CommandFailure, PipelineError};
use crate::install::runner::CommandRunner;
use crate::install::state::{InstallState, StateStore};
use chrono::Utc;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Sentinel tool name that resolves every known tool independently
pub const ALL_TOOLS: &str = "all";

/// Events emitted while a resolve is in flight
#[derive(Debug, Clone)]
pub enum InstallEvent {
    /// Tool queued for installation as part of `resolve("all")`
    Queued { tool: String },
    /// Tool already marked installed; nothing to run
    AlreadyInstalled { tool: String },
    /// Tool has an uninstalled dependency that will be resolved first
    UnmetDependency { tool: String, dependency: String },
    /// Tool's own install commands are about to run
    Installing { tool: String },
    /// One install command is starting
    CommandStarted { tool: String, command: String },
    /// One install command finished (successfully or not)
    CommandFinished {
        tool: String,
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    /// Every command for the tool exited 0
    ToolInstalled { tool: String },
    /// At least one command failed; the tool stays uninstalled
    ToolFailed { tool: String },
}

/// Handler invoked for each [`InstallEvent`]
pub type EventHandler = Box<dyn Fn(&InstallEvent) + Send + Sync>;

/// Outcome of resolving a single tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing ran; the tool was already installed
    AlreadyInstalled,
    /// Every command exited 0
    Installed,
    /// One or more commands failed; all of them were still attempted
    Failed { failures: Vec<CommandFailure> },
}

/// Per-tool results of one resolve invocation
#[derive(Debug)]
pub struct InstallReport {
    pub results: Vec<(String, Result<InstallOutcome, PipelineError>)>,
}

impl InstallReport {
    /// True when every tool in the report installed (or already was)
    pub fn all_succeeded(&self) -> bool {
        self.results
            .iter()
            .all(|(_, r)| matches!(r, Ok(InstallOutcome::Installed | InstallOutcome::AlreadyInstalled)))
    }
}

/// Recursive installer over a state store and a command runner
pub struct InstallResolver<S, R> {
    store: S,
    runner: R,
    handlers: Vec<EventHandler>,
}

impl<S: StateStore, R: CommandRunner> InstallResolver<S, R> {
    pub fn new(store: S, runner: R) -> Self {
        Self {
            store,
            runner,
            handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&InstallEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    fn emit(&self, event: InstallEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Access the state store (e.g. for status listings)
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a tool (or [`ALL_TOOLS`]) and persist the resulting state.
    ///
    /// The table is loaded wholesale before anything runs and written back
    /// wholesale afterwards, regardless of success, so dependency progress
    /// survives a failed target. For `"all"` every tool is attempted
    /// independently and per-tool errors land in the report; for a single
    /// tool, errors other than command failure abort and propagate.
    pub async fn resolve(&self, tool: &str) -> Result<InstallReport, PipelineError> {
        let mut state = self.store.load().await?;

        if tool == ALL_TOOLS {
            for (name, spec) in &state {
                if !spec.installed {
                    self.emit(InstallEvent::Queued { tool: name.clone() });
                }
            }

            let names: Vec<String> = state.keys().cloned().collect();
            let mut results = Vec::with_capacity(names.len());

            for name in names {
                let mut visited = Vec::new();
                let result = self.resolve_one(&mut state, &name, &mut visited).await;
                if let Err(e) = &result {
                    warn!(tool = %name, error = %e, "install aborted");
                }
                results.push((name, result));
            }

            self.store.save(&state).await?;
            return Ok(InstallReport { results });
        }

        let mut visited = Vec::new();
        let result = self.resolve_one(&mut state, tool, &mut visited).await;

        // persist partial progress even when the resolve failed
        let saved = self.store.save(&state).await;
        let outcome = result?;
        saved?;

        Ok(InstallReport {
            results: vec![(tool.to_string(), Ok(outcome))],
        })
    }

    /// Depth-first, pre-order walk over one tool and its dependencies.
    ///
    /// `visited` is the current recursion chain; revisiting a tool on it
    /// means the dependency graph has a cycle, surfaced before any command
    /// runs.
    fn resolve_one<'a>(
        &'a self,
        state: &'a mut InstallState,
        tool: &'a str,
        visited: &'a mut Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<InstallOutcome, PipelineError>> + Send + 'a>> {
        Box::pin(async move {
            if visited.iter().any(|v| v == tool) {
                let mut chain = visited.clone();
                chain.push(tool.to_string());
                return Err(PipelineError::DependencyCycle { chain });
            }

            let spec = state
                .get(tool)
                .ok_or_else(|| PipelineError::NotFound(tool.to_string()))?;

            if spec.installed {
                self.emit(InstallEvent::AlreadyInstalled { tool: tool.to_string() });
                return Ok(InstallOutcome::AlreadyInstalled);
            }

            visited.push(tool.to_string());

            let dependencies = spec.dependencies.clone();
            for dependency in dependencies {
                let dep_installed = state
                    .get(&dependency)
                    .ok_or_else(|| PipelineError::NotFound(dependency.clone()))?
                    .installed;

                if dep_installed {
                    continue;
                }

                self.emit(InstallEvent::UnmetDependency {
                    tool: tool.to_string(),
                    dependency: dependency.clone(),
                });

                let outcome = self.resolve_one(state, &dependency, visited).await?;

                if matches!(outcome, InstallOutcome::Failed { .. }) {
                    visited.pop();
                    return Err(PipelineError::DependencyFailed {
                        tool: tool.to_string(),
                        dependency,
                    });
                }
            }

            self.emit(InstallEvent::Installing { tool: tool.to_string() });

            // all commands run even when an earlier one fails; the failures
            // just decide the installed flag
            let commands = state.get(tool).map(|s| s.commands.clone()).unwrap_or_default();
            let shell = state.get(tool).map(|s| s.shell).unwrap_or(false);
            let mut failures = Vec::new();

            for command in commands {
                self.emit(InstallEvent::CommandStarted {
                    tool: tool.to_string(),
                    command: command.clone(),
                });

                let outcome = self.runner.run(&command, shell).await;
                debug!(tool, %command, exit_code = ?outcome.exit_code, "install command finished");

                self.emit(InstallEvent::CommandFinished {
                    tool: tool.to_string(),
                    command: command.clone(),
                    exit_code: outcome.exit_code,
                    stderr: outcome.stderr.clone(),
                });

                if !outcome.success() {
                    failures.push(CommandFailure {
                        command,
                        exit_code: outcome.exit_code,
                        stderr: outcome.stderr,
                    });
                }
            }

            let installed = failures.is_empty();
            if let Some(spec) = state.get_mut(tool) {
                spec.installed = installed;
                spec.last_attempt = Some(Utc::now());
            }

            visited.pop();

            if installed {
                self.emit(InstallEvent::ToolInstalled { tool: tool.to_string() });
                Ok(InstallOutcome::Installed)
            } else {
                self.emit(InstallEvent::ToolFailed { tool: tool.to_string() });
                Ok(InstallOutcome::Failed { failures })
            }
        })
    }
}
