use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use adminsweep_common::executor::RemoteExecutor;
use adminsweep_common::network::target::Target;
use adminsweep_common::outcome::{ClassifiedOutcome, ProbeOutcome};
use adminsweep_common::reporter::Reporter;
use adminsweep_core::StopSignal;
use async_trait::async_trait;

/// Answers each hostname from a fixed table. Unknown hosts fail name resolution.
pub struct TableExecutor {
    replies: HashMap<String, Option<&'static str>>,
    delay: Duration,
    log: Mutex<Vec<String>>,
}

impl TableExecutor {
    /// `None` means the remote command succeeded; `Some(text)` is the error it produced.
    pub fn new(replies: &[(&str, Option<&'static str>)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(host, reply)| (host.to_string(), *reply))
                .collect(),
            delay: Duration::from_millis(5),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteExecutor for TableExecutor {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        self.log.lock().unwrap().push(target.to_string());
        tokio::time::sleep(self.delay).await;

        match self.replies.get(target.as_str()) {
            Some(None) => ProbeOutcome::success(target.clone()),
            Some(Some(error)) => ProbeOutcome::failure(target.clone(), *error),
            None => ProbeOutcome::failure(
                target.clone(),
                "The WinRM client cannot process the request because the server name cannot be resolved.",
            ),
        }
    }
}

/// Keeps every reported outcome and can pull a stop signal after the first one,
/// the way an operator pressing Ctrl-C would.
#[derive(Default)]
pub struct RecordingReporter {
    pub seen: Vec<ClassifiedOutcome>,
    pub stop_after_first: Option<StopSignal>,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, outcome: &ClassifiedOutcome) {
        self.seen.push(outcome.clone());
        if let Some(stop) = &self.stop_after_first {
            stop.trigger();
        }
    }
}

pub fn targets(names: &[&str]) -> Vec<Target> {
    names.iter().map(|name| name.parse().unwrap()).collect()
}
