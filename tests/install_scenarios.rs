//! Installer scenarios: dependency ordering, failure isolation, idempotency

mod helpers;

use helpers::*;
use reconpipe::core::{PipelineError, ToolSpec};
use reconpipe::install::{InstallOutcome, InstallState, StateStore};

#[tokio::test]
async fn test_dependency_installs_before_dependent() {
    let mut state = InstallState::new();
    state.insert("amass".to_string(), tool(&["go"], "amass"));
    state.insert("go".to_string(), tool(&[], "go"));

    let runner = FakeRunner::new();
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    let report = resolver.resolve("amass").await.unwrap();
    assert!(report.all_succeeded());

    let executed = log.lock().unwrap().clone();
    assert_eq!(executed, vec!["install go", "install amass"]);

    let snapshot = resolver.store().snapshot().await;
    assert!(snapshot.get("go").unwrap().installed);
    assert!(snapshot.get("amass").unwrap().installed);
}

#[tokio::test]
async fn test_failed_target_keeps_dependency_progress() {
    let mut state = InstallState::new();
    state.insert("amass".to_string(), tool(&["go"], "amass"));
    state.insert("go".to_string(), tool(&[], "go"));

    let runner = FakeRunner::new().fail_command("install amass", 1);
    let resolver = resolver_with(state, runner);

    let report = resolver.resolve("amass").await.unwrap();
    assert!(!report.all_succeeded());
    let (_, result) = &report.results[0];
    assert!(matches!(result, Ok(InstallOutcome::Failed { .. })));

    // the dependency's success is persisted even though the target failed
    let snapshot = resolver.store().snapshot().await;
    assert!(snapshot.get("go").unwrap().installed);
    assert!(!snapshot.get("amass").unwrap().installed);
    assert!(snapshot.get("amass").unwrap().last_attempt.is_some());
}

#[tokio::test]
async fn test_failed_dependency_aborts_dependent() {
    let mut state = InstallState::new();
    state.insert("amass".to_string(), tool(&["go"], "amass"));
    state.insert("go".to_string(), tool(&[], "go"));

    let runner = FakeRunner::new().fail_command("install go", 1);
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    let err = resolver.resolve("amass").await.unwrap_err();
    assert!(matches!(err, PipelineError::DependencyFailed { .. }));

    // the dependent's own commands never ran
    assert_eq!(executions_of(&log, "install amass"), 0);
    assert_eq!(executions_of(&log, "install go"), 1);
}

#[tokio::test]
async fn test_all_commands_run_despite_failures() {
    let mut state = InstallState::new();
    state.insert(
        "masscan".to_string(),
        ToolSpec::new(&[], &["git clone masscan", "make", "mv masscan"], false),
    );

    let runner = FakeRunner::new().fail_command("make", 2);
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    let report = resolver.resolve("masscan").await.unwrap();
    let (_, result) = &report.results[0];
    let Ok(InstallOutcome::Failed { failures }) = result else {
        panic!("expected a failed outcome");
    };

    // later commands still ran after the failure
    assert_eq!(log.lock().unwrap().len(), 3);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].command, "make");
    assert_eq!(failures[0].exit_code, Some(2));
}

#[tokio::test]
async fn test_resolve_all_skips_installed_and_isolates_failures() {
    let mut state = InstallState::new();
    let mut installed = tool(&[], "go");
    installed.installed = true;
    state.insert("go".to_string(), installed);
    state.insert("masscan".to_string(), tool(&[], "masscan"));
    state.insert("amass".to_string(), tool(&["go"], "amass"));

    let runner = FakeRunner::new().fail_command("install masscan", 1);
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    let report = resolver.resolve("all").await.unwrap();
    assert!(!report.all_succeeded());

    // the pre-installed tool ran nothing, and masscan's failure did not
    // stop amass from installing
    assert_eq!(executions_of(&log, "install go"), 0);
    assert_eq!(executions_of(&log, "install amass"), 1);

    let snapshot = resolver.store().snapshot().await;
    assert!(snapshot.get("amass").unwrap().installed);
    assert!(!snapshot.get("masscan").unwrap().installed);
}

#[tokio::test]
async fn test_second_resolve_is_a_no_op() {
    let mut state = InstallState::new();
    state.insert("gobuster".to_string(), tool(&["go"], "gobuster"));
    state.insert("go".to_string(), tool(&[], "go"));

    let runner = FakeRunner::new();
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    resolver.resolve("gobuster").await.unwrap();
    let after_first = log.lock().unwrap().len();

    let report = resolver.resolve("gobuster").await.unwrap();
    let (_, result) = &report.results[0];
    assert!(matches!(result, Ok(InstallOutcome::AlreadyInstalled)));
    assert_eq!(log.lock().unwrap().len(), after_first);
}

#[tokio::test]
async fn test_cycle_is_detected_before_any_command_runs() {
    let mut state = InstallState::new();
    state.insert("x".to_string(), tool(&["y"], "x"));
    state.insert("y".to_string(), tool(&["x"], "y"));

    let runner = FakeRunner::new();
    let log = runner.log();
    let resolver = resolver_with(state, runner);

    let err = resolver.resolve("x").await.unwrap_err();
    let PipelineError::DependencyCycle { chain } = err else {
        panic!("expected a cycle error");
    };
    assert_eq!(chain, vec!["x", "y", "x"]);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_dependency_is_reported_by_name() {
    let mut state = InstallState::new();
    state.insert("broken".to_string(), tool(&["missing"], "broken"));

    let resolver = resolver_with(state, FakeRunner::new());
    let err = resolver.resolve("broken").await.unwrap_err();
    let PipelineError::NotFound(name) = err else {
        panic!("expected not-found");
    };
    assert_eq!(name, "missing");
}

#[tokio::test]
async fn test_state_survives_through_the_store() {
    // install through one resolver, then read the table back through the
    // store trait as a fresh consumer would
    let mut state = InstallState::new();
    state.insert("seclists".to_string(), tool(&[], "seclists"));

    let resolver = resolver_with(state, FakeRunner::new());
    resolver.resolve("seclists").await.unwrap();

    let reloaded = resolver.store().load().await.unwrap();
    assert!(reloaded.get("seclists").unwrap().installed);
}
