//! CLI output formatting

use crate::core::ToolSpec;
use crate::install::InstallEvent;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar for a multi-tool install
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format an install event for display
pub fn format_install_event(event: &InstallEvent) -> String {
    match event {
        InstallEvent::Queued { tool } => {
            format!("{} Queued {}", INFO, style(tool).cyan())
        }
        InstallEvent::AlreadyInstalled { tool } => {
            format!("{} {} already installed", CHECK, style(tool).bold())
        }
        InstallEvent::UnmetDependency { tool, dependency } => format!(
            "{} {} needs {}; installing it first",
            WARN,
            style(tool).cyan(),
            style(dependency).bold()
        ),
        InstallEvent::Installing { tool } => {
            format!("{} Installing {}", SPINNER, style(tool).cyan())
        }
        InstallEvent::CommandStarted { command, .. } => {
            format!("{} {}", ROCKET, style(command).dim())
        }
        InstallEvent::CommandFinished {
            command,
            exit_code,
            stderr,
            ..
        } => match exit_code {
            Some(0) => format!("{} {}", CHECK, style(command).dim()),
            _ => format!(
                "{} {} ({})",
                CROSS,
                style(command).dim(),
                style(stderr.trim()).red()
            ),
        },
        InstallEvent::ToolInstalled { tool } => {
            format!("{} Installed {}", CHECK, style(tool).bold().green())
        }
        InstallEvent::ToolFailed { tool } => {
            format!("{} {} failed to install", CROSS, style(tool).bold().red())
        }
    }
}

/// Format one tool's install status for the `tools` listing
pub fn format_tool_status(name: &str, spec: &ToolSpec) -> String {
    let icon = if spec.installed { CHECK } else { CROSS };
    let deps = if spec.dependencies.is_empty() {
        style("no dependencies").dim().to_string()
    } else {
        style(format!("needs {}", spec.dependencies.join(", ")))
            .dim()
            .to_string()
    };
    format!("{} {} - {}", icon, style(name).bold(), deps)
}
