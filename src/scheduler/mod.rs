//! Handoff to the external DAG scheduler
//!
//! The pipeline does not run scan graphs itself. Once a scan is resolved
//! and its parameters validated, the whole job is forwarded to the
//! scheduler binary, which re-resolves the step by module path and walks
//! its upstream chain.

use crate::core::{PipelineError, ToolPaths};
use crate::registry::ScanEntry;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

/// Accepts a resolved scan and its command-line arguments for execution
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Submit a scan run, blocking until the scheduler exits
    async fn submit(&self, entry: &ScanEntry, forwarded: &[String]) -> Result<(), PipelineError>;
}

/// Scheduler that shells out to the configured scheduler binary
///
/// The scheduler process inherits stdout/stderr so its own progress
/// output reaches the terminal directly.
#[derive(Debug, Clone)]
pub struct SubprocessScheduler {
    scheduler_path: String,
}

impl SubprocessScheduler {
    pub fn new(paths: &ToolPaths) -> Self {
        Self {
            scheduler_path: paths.lookup("scheduler").to_string(),
        }
    }

    /// Build the full argv for a submission, ready to spawn
    pub fn command_line(&self, entry: &ScanEntry, forwarded: &[String]) -> Vec<String> {
        let mut argv = vec![
            self.scheduler_path.clone(),
            "--module".to_string(),
            entry.module.to_string(),
            entry.name.to_string(),
        ];
        argv.extend(forwarded.iter().cloned());
        argv
    }
}

#[async_trait]
impl Scheduler for SubprocessScheduler {
    async fn submit(&self, entry: &ScanEntry, forwarded: &[String]) -> Result<(), PipelineError> {
        let run_id = Uuid::new_v4();
        let argv = self.command_line(entry, forwarded);
        debug!(%run_id, command = %argv.join(" "), "submitting scan");
        info!(%run_id, scan = entry.name, "handing off to scheduler");

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| PipelineError::CommandExecution {
                command: argv.join(" "),
                exit_code: None,
                stderr: format!("failed to spawn scheduler: {}", e),
            })?;

        if !status.success() {
            return Err(PipelineError::CommandExecution {
                command: argv.join(" "),
                exit_code: status.code(),
                stderr: "scheduler exited with a non-zero status".to_string(),
            });
        }

        info!(%run_id, scan = entry.name, "scheduler finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scans::PipelineStep;

    fn entry() -> ScanEntry {
        fn build(
            args: &crate::scans::ScanArgs,
        ) -> Result<Box<dyn PipelineStep>, PipelineError> {
            Ok(Box::new(crate::scans::amass::AmassScan::new(
                crate::scans::amass::AmassParams::from_args(args),
            )))
        }
        ScanEntry {
            name: "amass",
            module: "reconpipe::scans::amass",
            build,
        }
    }

    #[test]
    fn test_command_line_names_module_then_scan() {
        let scheduler = SubprocessScheduler::new(&ToolPaths::default());
        let argv = scheduler.command_line(
            &entry(),
            &["--target-file".to_string(), "tesla".to_string()],
        );
        assert_eq!(argv[1], "--module");
        assert_eq!(argv[2], "reconpipe::scans::amass");
        assert_eq!(argv[3], "amass");
        assert_eq!(&argv[4..], ["--target-file", "tesla"]);
    }

    #[tokio::test]
    async fn test_missing_scheduler_binary_is_reported() {
        let scheduler = SubprocessScheduler {
            scheduler_path: "/nonexistent/recon-scheduler".to_string(),
        };
        let err = scheduler
            .submit(&entry(), &[])
            .await
            .expect_err("spawn should fail");
        assert!(matches!(err, PipelineError::CommandExecution { .. }));
    }
}
