//! The concurrent probe-and-classify engine.
//!
//! A sweep takes an already resolved host list, runs a read-only remote
//! command against every host through a [`RemoteExecutor`], and sorts each
//! result into confirmed admin access, an expected denial, or an anomaly
//! worth a warning.

use std::sync::Arc;

use adminsweep_common::config::Config;
use adminsweep_common::executor::RemoteExecutor;
use adminsweep_common::reporter::Reporter;

pub mod classifier;
pub mod dispatcher;
pub mod reporter;
pub mod session;
pub mod stop;
pub mod targets;
pub mod transport;

pub use classifier::{Classifier, DenialMatcher, PhraseMatcher};
pub use dispatcher::ProbeDispatcher;
pub use session::{SweepReport, SweepSession};
pub use stop::StopSignal;

/// Runs a complete sweep over `session` and returns what it found.
pub async fn sweep(
    mut session: SweepSession,
    executor: Arc<dyn RemoteExecutor>,
    classifier: Classifier,
    cfg: &Config,
    reporter: &mut dyn Reporter,
) -> SweepReport {
    let dispatcher = ProbeDispatcher::new(executor, Arc::new(classifier), cfg);
    dispatcher.dispatch(&mut session, reporter).await;
    session.into_report()
}
