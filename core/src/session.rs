//! Process-scoped sweep state.
//!
//! A [`SweepSession`] is created with the resolved targets, filled with
//! outcomes by the dispatcher, and consumed into a [`SweepReport`] when the
//! sweep ends.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use adminsweep_common::network::target::Target;
use adminsweep_common::outcome::{Classification, ClassifiedOutcome};

use crate::stop::StopSignal;

pub struct SweepSession {
    targets: Vec<Target>,
    stop: StopSignal,
    outcomes: Vec<ClassifiedOutcome>,
    skipped: usize,
    started: Instant,
}

impl SweepSession {
    /// Drops repeated hostnames (case-insensitive), keeping the first spelling seen.
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let targets: Vec<Target> = targets
            .into_iter()
            .filter(|target| seen.insert(target.dedup_key()))
            .collect();

        Self {
            targets,
            stop: StopSignal::new(),
            outcomes: Vec::new(),
            skipped: 0,
            started: Instant::now(),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn outcomes(&self) -> &[ClassifiedOutcome] {
        &self.outcomes
    }

    pub(crate) fn take_targets(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.targets)
    }

    pub(crate) fn record(&mut self, outcome: ClassifiedOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn mark_skipped(&mut self, count: usize) {
        self.skipped += count;
    }

    pub fn into_report(self) -> SweepReport {
        SweepReport {
            stopped_early: self.stop.is_triggered(),
            outcomes: self.outcomes,
            skipped: self.skipped,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Everything a sweep produced, in completion order.
#[derive(Debug)]
pub struct SweepReport {
    pub outcomes: Vec<ClassifiedOutcome>,
    /// Targets never dispatched because the sweep was stopped.
    pub skipped: usize,
    pub stopped_early: bool,
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn confirmed(&self) -> impl Iterator<Item = &Target> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_confirmed())
            .map(ClassifiedOutcome::target)
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.classification == classification)
            .count()
    }

    pub fn probed(&self) -> usize {
        self.outcomes.len()
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
