//! The **outcome classifier**.
//!
//! Turns a raw [`ProbeOutcome`] into a [`Classification`] with three ordered
//! rules, first match wins:
//!
//! 1. the probe succeeded and carries no error text: [`Classification::Confirmed`]
//! 2. the error text is recognised by the [`DenialMatcher`]: [`Classification::Denied`]
//! 3. everything else: [`Classification::Anomalous`]
//!
//! The remote command carries no payload worth inspecting, so the only way to
//! tell "no rights here" apart from "something is broken" is the transport's
//! error text. That text is locale and transport specific, which is why the
//! match lives behind [`DenialMatcher`] and not inside the rules.

use adminsweep_common::outcome::{Classification, ProbeOutcome};

/// Phrase emitted by Windows remoting when the caller lacks rights on the host.
pub const ACCESS_DENIED: &str = "Access is denied.";

/// Decides whether an error message means "authorization refused".
pub trait DenialMatcher: Send + Sync {
    fn is_denied(&self, message: &str) -> bool;
}

impl<F> DenialMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_denied(&self, message: &str) -> bool {
        self(message)
    }
}

/// Case-sensitive substring match against a list of known denial phrases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseMatcher {
    phrases: Vec<String>,
}

impl PhraseMatcher {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        if !phrase.is_empty() && !self.phrases.contains(&phrase) {
            self.phrases.push(phrase);
        }
        self
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for PhraseMatcher {
    fn default() -> Self {
        Self::new([ACCESS_DENIED])
    }
}

impl DenialMatcher for PhraseMatcher {
    fn is_denied(&self, message: &str) -> bool {
        self.phrases.iter().any(|phrase| message.contains(phrase.as_str()))
    }
}

pub struct Classifier {
    matcher: Box<dyn DenialMatcher>,
}

impl Classifier {
    pub fn new(matcher: impl DenialMatcher + 'static) -> Self {
        Self {
            matcher: Box::new(matcher),
        }
    }

    /// Pure and total: every outcome maps to exactly one verdict.
    pub fn classify(&self, outcome: &ProbeOutcome) -> Classification {
        match (outcome.succeeded, outcome.error_message.as_deref()) {
            (true, None) => Classification::Confirmed,
            (_, Some(message)) if self.matcher.is_denied(message) => Classification::Denied,
            _ => Classification::Anomalous,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PhraseMatcher::default())
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
