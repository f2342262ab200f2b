//! The **probe dispatcher**.
//!
//! Fans one probe per target out over a bounded pool of tokio tasks and
//! collects exactly one [`ClassifiedOutcome`] for every target it dispatched.
//!
//! Dispatch and collection share a single `select!` loop, so outcomes from
//! fast hosts reach the [`Reporter`] while slow or unreachable hosts are still
//! pending. A semaphore permit is taken *before* each task is spawned, which
//! keeps dispatch in input order and makes `concurrency == 1` strictly
//! sequential.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use adminsweep_common::config::Config;
use adminsweep_common::executor::RemoteExecutor;
use adminsweep_common::network::target::Target;
use adminsweep_common::outcome::{Classification, ClassifiedOutcome, ProbeOutcome};
use adminsweep_common::reporter::Reporter;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{Id, JoinError, JoinSet};
use tokio::time::timeout;
use tracing::{Instrument, debug, debug_span, error, trace};

use crate::classifier::Classifier;
use crate::session::SweepSession;
use crate::stop::StopSignal;

pub struct ProbeDispatcher {
    executor: Arc<dyn RemoteExecutor>,
    classifier: Arc<Classifier>,
    concurrency: usize,
    probe_timeout: Duration,
    stop_on_success: bool,
}

impl ProbeDispatcher {
    pub fn new(
        executor: Arc<dyn RemoteExecutor>,
        classifier: Arc<Classifier>,
        cfg: &Config,
    ) -> Self {
        Self {
            executor,
            classifier,
            concurrency: cfg.effective_concurrency(),
            probe_timeout: cfg.probe_timeout,
            stop_on_success: cfg.stop_on_success,
        }
    }

    /// Probes every target of `session`, reporting and recording outcomes as they complete.
    ///
    /// Returns once every dispatched probe has settled. When the session's
    /// stop signal fires, targets not yet dispatched are counted as skipped.
    pub async fn dispatch(&self, session: &mut SweepSession, reporter: &mut dyn Reporter) {
        let stop: StopSignal = session.stop_signal();
        let targets: Vec<Target> = session.take_targets();
        if targets.is_empty() {
            debug!("No targets to probe");
            return;
        }

        debug!(
            targets = targets.len(),
            concurrency = self.concurrency,
            "Dispatching probes"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut pending = targets.into_iter().peekable();
        let mut tasks: JoinSet<ClassifiedOutcome> = JoinSet::new();
        let mut in_flight: HashMap<Id, Target> = HashMap::new();

        loop {
            let can_dispatch: bool = pending.peek().is_some() && !stop.is_triggered();

            tokio::select! {
                biased;

                Some(joined) = tasks.join_next_with_id(), if !tasks.is_empty() => {
                    if let Some(classified) = self.settle(joined, &mut in_flight) {
                        reporter.report(&classified);
                        session.record(classified);
                    }
                }

                permit = semaphore.clone().acquire_owned(), if can_dispatch => {
                    let Ok(permit) = permit else {
                        error!("Probe pool closed unexpectedly");
                        break;
                    };
                    // The signal may have fired while this slot was awaited.
                    if stop.is_triggered() {
                        continue;
                    }
                    let Some(target) = pending.next() else {
                        continue;
                    };
                    let handle = tasks.spawn(self.probe_task(target.clone(), permit, stop.clone()));
                    in_flight.insert(handle.id(), target);
                }

                else => break,
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            if let Some(classified) = self.settle(joined, &mut in_flight) {
                reporter.report(&classified);
                session.record(classified);
            }
        }

        let skipped: usize = pending.count();
        if skipped > 0 {
            debug!(skipped, "Sweep stopped before every target was dispatched");
        }
        session.mark_skipped(skipped);
    }

    fn probe_task(
        &self,
        target: Target,
        permit: OwnedSemaphorePermit,
        stop: StopSignal,
    ) -> impl Future<Output = ClassifiedOutcome> + Send + use<> {
        let executor = Arc::clone(&self.executor);
        let classifier = Arc::clone(&self.classifier);
        let probe_timeout = self.probe_timeout;
        let stop_on_success = self.stop_on_success;
        let span = debug_span!("probe", host = %target);

        async move {
            trace!(%target, "Probe dispatched");
            let outcome: ProbeOutcome = match timeout(probe_timeout, executor.probe(&target)).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => ProbeOutcome::failure(
                    target.clone(),
                    format!("probe timed out after {probe_timeout:?}"),
                ),
            };

            let classification = classifier.classify(&outcome);

            // Must happen while the permit is held, or the next target could slip through.
            if stop_on_success && classification == Classification::Confirmed && stop.trigger() {
                debug!(%target, "Admin access confirmed, dispatching no further probes");
            }
            drop(permit);

            ClassifiedOutcome {
                outcome,
                classification,
            }
        }
        .instrument(span)
    }

    fn settle(
        &self,
        joined: Result<(Id, ClassifiedOutcome), JoinError>,
        in_flight: &mut HashMap<Id, Target>,
    ) -> Option<ClassifiedOutcome> {
        match joined {
            Ok((id, classified)) => {
                in_flight.remove(&id);
                Some(classified)
            }
            Err(join_err) => {
                let Some(target) = in_flight.remove(&join_err.id()) else {
                    error!("Lost track of a failed probe task: {join_err}");
                    return None;
                };
                let outcome = ProbeOutcome::failure(target, format!("probe task failed: {join_err}"));
                let classification = self.classifier.classify(&outcome);
                Some(ClassifiedOutcome {
                    outcome,
                    classification,
                })
            }
        }
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
