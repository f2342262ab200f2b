use adminsweep_common::outcome::{Classification, ClassifiedOutcome};
use adminsweep_common::reporter::Reporter;
use adminsweep_core::reporter::confirmation_line;
use colored::*;
use tracing::{Span, debug, warn};

use crate::terminal::{colors, spinner};

/// Prints confirmed hosts on stdout and routes everything else through tracing.
pub struct TerminalReporter {
    progress: Span,
}

impl TerminalReporter {
    pub fn new(progress: Span) -> Self {
        Self { progress }
    }
}

impl Reporter for TerminalReporter {
    fn report(&mut self, outcome: &ClassifiedOutcome) {
        let target = outcome.target();

        match outcome.classification {
            Classification::Confirmed => {
                let line = confirmation_line(target);
                tracing_indicatif::suspend_tracing_indicatif(|| println!("{line}"));
            }
            Classification::Denied => {
                debug!("{} {}", "Access denied on".color(colors::DENIED), target);
            }
            Classification::Anomalous => {
                let error = outcome.error_message().unwrap_or("no error text");
                warn!("{}: {}", target.to_string().color(colors::ANOMALOUS).bold(), error);
            }
        }

        spinner::report_probe_progress(&self.progress);
    }
}
