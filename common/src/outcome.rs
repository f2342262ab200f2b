//! Per-target probe results and their verdicts.

use std::fmt;

use crate::network::target::Target;

/// Raw result of one probe attempt against one target.
///
/// Built once when the probe completes and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: Target,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

impl ProbeOutcome {
    pub fn success(target: Target) -> Self {
        Self {
            target,
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failure(target: Target, message: impl Into<String>) -> Self {
        Self {
            target,
            succeeded: false,
            error_message: Some(message.into()),
        }
    }
}

/// Tri-state verdict derived from a [`ProbeOutcome`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The remote command ran: the current identity holds admin execution rights.
    Confirmed,
    /// The transport reported an authorization refusal. Expected and quiet.
    Denied,
    /// Anything else: unreachable host, name resolution, transport misconfiguration.
    Anomalous,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Confirmed => "confirmed",
            Classification::Denied => "denied",
            Classification::Anomalous => "anomalous",
        };
        f.write_str(label)
    }
}

/// A probe outcome paired with its verdict, as handed to reporters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedOutcome {
    pub outcome: ProbeOutcome,
    pub classification: Classification,
}

impl ClassifiedOutcome {
    pub fn target(&self) -> &Target {
        &self.outcome.target
    }

    pub fn error_message(&self) -> Option<&str> {
        self.outcome.error_message.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.classification == Classification::Confirmed
    }
}
