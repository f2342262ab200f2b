use adminsweep_common::network::target::Target;
use adminsweep_common::outcome::{Classification, ClassifiedOutcome};
use adminsweep_common::reporter::Reporter;
use tracing::{debug, info, warn};

pub fn confirmation_line(target: &Target) -> String {
    format!("The current user has Local Admin access on: {target}")
}

/// Routes every outcome through `tracing`: confirmations at info, denials at
/// debug, anomalies at warn with the raw error text.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, outcome: &ClassifiedOutcome) {
        let target = outcome.target();
        let error = outcome.error_message().unwrap_or_default();

        match outcome.classification {
            Classification::Confirmed => info!("{}", confirmation_line(target)),
            Classification::Denied => debug!("Access denied on {target}"),
            Classification::Anomalous => warn!("Probe against {target} failed: {error}"),
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
