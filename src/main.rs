mod cli;
mod core;
mod install;
mod registry;
mod scans;
mod scheduler;

use anyhow::{Context, Result};
use cli::commands::{InstallCommand, ScanCommand, ToolsCommand};
use cli::output::*;
use cli::{Cli, Command};
use install::{InstallOutcome, InstallResolver, JsonStateStore, ProcessRunner, StateStore, ALL_TOOLS};
use registry::ScanRegistry;
use scans::upstream_chain;
use scheduler::{Scheduler, SubprocessScheduler};
use tracing::{error, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Install(cmd) => install_tool(cmd).await?,
        Command::Scan(cmd) => run_scan(cmd, &cli).await?,
        Command::Tools(cmd) => list_tools(cmd).await?,
    }

    Ok(())
}

async fn install_tool(cmd: &InstallCommand) -> Result<()> {
    let store = JsonStateStore::with_default_path()
        .context("Failed to locate the install state file")?;

    let mut resolver = InstallResolver::new(store, ProcessRunner);

    if cmd.tool == ALL_TOOLS {
        // Progress over every tool that is not yet installed
        let state = JsonStateStore::with_default_path()?
            .load()
            .await
            .context("Failed to load install state")?;
        let pending = state.values().filter(|spec| !spec.installed).count();

        let progress = create_progress_bar(pending);
        let bar = progress.clone();
        resolver.add_event_handler(move |event| {
            bar.println(format_install_event(event));
            if matches!(
                event,
                install::InstallEvent::ToolInstalled { .. }
                    | install::InstallEvent::ToolFailed { .. }
            ) {
                bar.inc(1);
            }
        });

        let report = resolver.resolve(ALL_TOOLS).await?;
        progress.finish_and_clear();
        summarize(&report);
    } else {
        resolver.add_event_handler(|event| println!("{}", format_install_event(event)));
        let report = resolver.resolve(&cmd.tool).await?;
        summarize(&report);
    }

    Ok(())
}

fn summarize(report: &install::InstallReport) {
    for (tool, result) in &report.results {
        match result {
            Ok(InstallOutcome::Installed) => {
                println!("{} {} installed", CHECK, style(tool).bold())
            }
            Ok(InstallOutcome::AlreadyInstalled) => {
                println!("{} {} already installed", CHECK, style(tool).bold())
            }
            Ok(InstallOutcome::Failed { failures }) => {
                println!(
                    "{} {} failed ({} command{} failed)",
                    CROSS,
                    style(tool).bold(),
                    failures.len(),
                    if failures.len() == 1 { "" } else { "s" }
                );
                for failure in failures {
                    println!("    {}", style(&failure.command).dim());
                }
            }
            Err(e) => {
                println!("{} {}: {}", CROSS, style(tool).bold(), style(e).red());
                error!("{}", e);
            }
        }
    }
}

async fn run_scan(cmd: &ScanCommand, cli: &Cli) -> Result<()> {
    let config = core::Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let registry = ScanRegistry::discover();
    let entry = *registry.lookup_unique(&cmd.scan)?;

    // Build the step up front so bad parameters fail here, not in the
    // scheduler process
    let args = cmd.to_scan_args(&config.defaults);
    let step = (entry.build)(&args)?;

    println!(
        "{} Scan plan for {}:",
        INFO,
        style(&cmd.target_file).bold()
    );
    for step in upstream_chain(step).iter().rev() {
        let artifact = step.artifact();
        let marker = if artifact.exists() {
            style("cached").green().to_string()
        } else {
            style("pending").dim().to_string()
        };
        println!(
            "  {} -> {} [{}]",
            style(step.name()).cyan(),
            style(artifact.display()).dim(),
            marker
        );
    }

    // The scheduler only runs what the step declares; flag tools we know
    // are not installed before handing off
    let state = JsonStateStore::with_default_path()?
        .load()
        .await
        .context("Failed to load install state")?;
    if let Some(spec) = state.get(entry.name) {
        if !spec.installed {
            println!(
                "{} {} is not marked installed; run `reconpipe install {}` first",
                WARN,
                style(entry.name).bold(),
                entry.name
            );
            warn!(tool = entry.name, "scan submitted with uninstalled tool");
        }
    }

    let scheduler = SubprocessScheduler::new(&config.tool_paths);
    scheduler
        .submit(&entry, &cmd.forwarded_args(&config.defaults))
        .await?;

    println!(
        "\n{} {} completed {}",
        CHECK,
        style(entry.name).bold(),
        style("successfully").green()
    );
    Ok(())
}

async fn list_tools(cmd: &ToolsCommand) -> Result<()> {
    let state = JsonStateStore::with_default_path()?
        .load()
        .await
        .context("Failed to load install state")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("{} Known tools:", INFO);
    for (name, spec) in &state {
        println!("  {}", format_tool_status(name, spec));
    }

    Ok(())
}
