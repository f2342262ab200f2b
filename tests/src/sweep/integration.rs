use std::sync::Arc;

use adminsweep_common::config::Config;
use adminsweep_common::outcome::Classification;
use adminsweep_core::targets::{self, TargetSource};
use adminsweep_core::transport::CommandExecutor;
use adminsweep_core::{Classifier, SweepReport, SweepSession, sweep};

use crate::utils::{RecordingReporter, TableExecutor, targets};

async fn run(
    executor: Arc<TableExecutor>,
    names: &[&str],
    cfg: &Config,
) -> (SweepReport, RecordingReporter) {
    let mut reporter = RecordingReporter::default();
    let session = SweepSession::new(targets(names));
    let report = sweep(session, executor, Classifier::default(), cfg, &mut reporter).await;
    (report, reporter)
}

fn verdict_of(report: &SweepReport, host: &str) -> Option<Classification> {
    report
        .outcomes
        .iter()
        .find(|outcome| outcome.target().as_str() == host)
        .map(|outcome| outcome.classification)
}

#[tokio::test]
async fn denied_host_stays_quiet_and_admin_host_is_confirmed() {
    let executor = Arc::new(TableExecutor::new(&[
        ("h1", Some("Access is denied.")),
        ("h2", None),
    ]));
    let (report, reporter) = run(executor, &["h1", "h2"], &Config::default()).await;

    assert_eq!(verdict_of(&report, "h1"), Some(Classification::Denied));
    assert_eq!(verdict_of(&report, "h2"), Some(Classification::Confirmed));
    assert_eq!(report.confirmed().map(|t| t.as_str()).collect::<Vec<_>>(), ["h2"]);
    assert_eq!(report.count(Classification::Anomalous), 0);
    assert_eq!(reporter.seen.len(), 2);
}

#[tokio::test]
async fn rpc_failure_is_reported_as_anomalous_with_its_text() {
    let executor = Arc::new(TableExecutor::new(&[(
        "h3",
        Some("The RPC server is unavailable."),
    )]));
    let (report, reporter) = run(executor, &["h3"], &Config::default()).await;

    assert_eq!(report.count(Classification::Anomalous), 1);
    assert_eq!(
        reporter.seen[0].error_message(),
        Some("The RPC server is unavailable.")
    );
}

#[tokio::test]
async fn empty_target_list_produces_nothing() {
    let resolved = targets::resolve(&TargetSource::List(Vec::new()))
        .await
        .unwrap();
    let executor = Arc::new(TableExecutor::new(&[]));
    let mut reporter = RecordingReporter::default();

    let report = sweep(
        SweepSession::new(resolved),
        executor.clone(),
        Classifier::default(),
        &Config::default(),
        &mut reporter,
    )
    .await;

    assert_eq!(report.probed(), 0);
    assert_eq!(report.skipped, 0);
    assert!(reporter.seen.is_empty());
    assert!(executor.probed().is_empty());
}

#[tokio::test]
async fn outcome_count_matches_target_count() {
    let names: Vec<String> = (0..50).map(|i| format!("ws{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut table: Vec<(&str, Option<&'static str>)> = refs
        .iter()
        .map(|name| (*name, Some("Access is denied.")))
        .collect();
    table[17].1 = None;
    table.truncate(40);

    let executor = Arc::new(TableExecutor::new(&table));
    let cfg = Config {
        concurrency: 8,
        ..Config::default()
    };
    let (report, reporter) = run(executor, &refs, &cfg).await;

    assert_eq!(report.probed(), 50);
    assert_eq!(reporter.seen.len(), 50);
    assert_eq!(report.count(Classification::Confirmed), 1);
    assert_eq!(report.count(Classification::Denied), 39);
    assert_eq!(report.count(Classification::Anomalous), 10);
}

#[tokio::test]
async fn stop_on_success_with_sequential_dispatch_skips_the_rest() {
    let executor = Arc::new(TableExecutor::new(&[
        ("A", None),
        ("B", Some("Access is denied.")),
        ("C", None),
    ]));
    let cfg = Config {
        concurrency: 1,
        stop_on_success: true,
        ..Config::default()
    };
    let (report, _) = run(executor.clone(), &["A", "B", "C"], &cfg).await;

    assert_eq!(executor.probed(), ["A"]);
    assert!(report.stopped_early);
    assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn external_stop_behaves_like_an_interrupt() {
    let executor = Arc::new(TableExecutor::new(&[
        ("a", Some("Access is denied.")),
        ("b", Some("Access is denied.")),
        ("c", Some("Access is denied.")),
    ]));
    let session = SweepSession::new(targets(&["a", "b", "c"]));
    let mut reporter = RecordingReporter {
        stop_after_first: Some(session.stop_signal()),
        ..RecordingReporter::default()
    };
    let cfg = Config {
        concurrency: 1,
        ..Config::default()
    };

    let report = sweep(session, executor.clone(), Classifier::default(), &cfg, &mut reporter).await;

    assert!(report.stopped_early);
    assert_eq!(report.probed() + report.skipped, 3);
    assert!(report.skipped >= 1);
}

#[tokio::test]
async fn duplicate_hosts_in_a_target_file_are_probed_once() {
    let path = std::env::temp_dir().join(format!("adminsweep-targets-{}.txt", std::process::id()));
    std::fs::write(&path, "# lab\nWS01\nws01\nws02\n\n").unwrap();

    let resolved = targets::resolve(&TargetSource::File(path.clone())).await;
    std::fs::remove_file(&path).unwrap();
    let session = SweepSession::new(resolved.unwrap());

    let executor = Arc::new(TableExecutor::new(&[
        ("WS01", None),
        ("ws02", Some("Access is denied.")),
    ]));
    let mut reporter = RecordingReporter::default();
    let report = sweep(
        session,
        executor.clone(),
        Classifier::default(),
        &Config::default(),
        &mut reporter,
    )
    .await;

    assert_eq!(report.probed(), 2);
    assert_eq!(executor.probed().len(), 2);
    assert_eq!(verdict_of(&report, "WS01"), Some(Classification::Confirmed));
}

#[cfg(unix)]
mod processes {
    use super::*;
    use adminsweep_common::outcome::ClassifiedOutcome;
    use std::time::Duration;

    const SCRIPT: &str = "case {target} in \
        ok*) echo {target} ;; \
        denied*) echo 'Access is denied.' >&2; exit 1 ;; \
        slow*) sleep 5 ;; \
        *) echo 'The RPC server is unavailable.' >&2; exit 1 ;; \
        esac";

    fn shell_executor() -> Arc<CommandExecutor> {
        Arc::new(CommandExecutor::new("sh", ["-c", SCRIPT]).unwrap())
    }

    async fn run_shell(names: &[&str], cfg: &Config) -> SweepReport {
        let mut reporter: Vec<ClassifiedOutcome> = Vec::new();
        sweep(
            SweepSession::new(targets(names)),
            shell_executor(),
            Classifier::default(),
            cfg,
            &mut reporter,
        )
        .await
    }

    #[tokio::test]
    async fn child_process_results_are_classified() {
        let report = run_shell(&["ok1", "denied1", "broken1"], &Config::default()).await;

        assert_eq!(report.probed(), 3);
        assert_eq!(verdict_of(&report, "ok1"), Some(Classification::Confirmed));
        assert_eq!(verdict_of(&report, "denied1"), Some(Classification::Denied));
        assert_eq!(verdict_of(&report, "broken1"), Some(Classification::Anomalous));
    }

    #[tokio::test]
    async fn hung_remote_command_is_cut_off_by_the_probe_timeout() {
        let cfg = Config {
            probe_timeout: Duration::from_millis(300),
            ..Config::default()
        };
        let started = std::time::Instant::now();
        let report = run_shell(&["slow1", "ok2"], &cfg).await;

        assert!(started.elapsed() < Duration::from_secs(4));
        assert_eq!(verdict_of(&report, "slow1"), Some(Classification::Anomalous));
        assert_eq!(verdict_of(&report, "ok2"), Some(Classification::Confirmed));
    }

    #[tokio::test]
    async fn sequential_early_stop_with_real_processes() {
        let cfg = Config {
            concurrency: 1,
            stop_on_success: true,
            ..Config::default()
        };
        let report = run_shell(&["denied1", "ok1", "ok2"], &cfg).await;

        assert_eq!(report.probed(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.confirmed().map(|t| t.as_str()).collect::<Vec<_>>(), ["ok1"]);
    }
}
