use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use tracing::{Instrument, info, info_span, warn};

use adminsweep_common::config::Config;
use adminsweep_core::{Classifier, StopSignal, SweepReport, SweepSession, targets};

use crate::commands::CommandLine;
use crate::terminal::{print, reporter::TerminalReporter, spinner};

pub async fn sweep(commands: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    print::header("resolving targets", cfg.quiet);
    let source = commands.target_source();
    let resolved = targets::resolve(&source)
        .await
        .context("could not resolve targets")?;

    let session = SweepSession::new(resolved);
    let total: usize = session.targets().len();
    if total == 0 {
        print::no_targets(cfg.quiet);
        return Ok(());
    }

    let transport = commands.transport();
    let executor = transport
        .executor(cfg.probe_timeout)
        .context("could not set up the probe transport")?;
    let matcher = commands
        .denied_text
        .iter()
        .fold(transport.denial_matcher(), |matcher, phrase| {
            matcher.with_phrase(phrase.as_str())
        });

    let unit: &str = if total == 1 { "host" } else { "hosts" };
    info!(
        "Probing {total} {unit} via {transport}, {} at a time",
        cfg.effective_concurrency()
    );
    print::header("sweeping", cfg.quiet);

    let interrupts = Interrupts::default();
    let interrupt = tokio::spawn(stop_on_interrupt(session.stop_signal(), interrupts.clone()));

    let span = info_span!("sweep", indicatif.pb_show = true);
    spinner::init_sweep_progress(&span, total);
    let mut reporter = TerminalReporter::new(span.clone());

    let report: SweepReport = adminsweep_core::sweep(
        session,
        Arc::new(executor),
        Classifier::new(matcher),
        cfg,
        &mut reporter,
    )
    .instrument(span)
    .await;

    interrupt.abort();

    match stop_cause(report.stopped_early, interrupts.interrupted()) {
        Some(StopCause::Interrupted) => {
            warn!("Sweep interrupted, {} targets were never probed", report.skipped)
        }
        Some(StopCause::FirstConfirmed) => info!("Stopped after the first confirmed host"),
        None => {}
    }
    print::summary(&report, cfg.quiet);
    Ok(())
}

/// Ctrl-C presses seen during a sweep. Counted apart from the [`StopSignal`],
/// which stop-on-success may already have triggered.
#[derive(Clone, Debug, Default)]
struct Interrupts {
    presses: Arc<AtomicUsize>,
}

impl Interrupts {
    /// Records a press and stops dispatching. Returns `true` from the second press on.
    fn press(&self, stop: &StopSignal) -> bool {
        stop.trigger();
        self.presses.fetch_add(1, Ordering::AcqRel) > 0
    }

    fn interrupted(&self) -> bool {
        self.presses.load(Ordering::Acquire) > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopCause {
    Interrupted,
    FirstConfirmed,
}

fn stop_cause(stopped_early: bool, interrupted: bool) -> Option<StopCause> {
    match (stopped_early, interrupted) {
        (_, true) => Some(StopCause::Interrupted),
        (true, false) => Some(StopCause::FirstConfirmed),
        (false, false) => None,
    }
}

/// First Ctrl-C stops dispatching; a second one exits immediately.
async fn stop_on_interrupt(stop: StopSignal, interrupts: Interrupts) {
    while tokio::signal::ctrl_c().await.is_ok() {
        if interrupts.press(&stop) {
            std::process::exit(130);
        }
        warn!("Interrupted, waiting for in-flight probes to finish (Ctrl-C again to abort)");
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
