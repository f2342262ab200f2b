//! # Sweep Target Model
//!
//! A [`Target`] is a single hostname handed to the probe dispatcher.
//!
//! Targets are validated when parsed so that a bad entry in a target file is
//! reported once, up front, instead of turning into an anomalous probe later:
//! * surrounding whitespace is trimmed,
//! * empty names and names with interior whitespace are rejected,
//! * braces are rejected (they would collide with command templates),
//! * a leading `-` is rejected (a remoting client would read it as an option),
//! * names longer than a DNS name (253 characters) are rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::SweepError;

const MAX_HOSTNAME_LEN: usize = 253;

/// A hostname being probed for administrative access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used to decide whether two targets name the same host.
    pub fn dedup_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl FromStr for Target {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        let reason = if name.is_empty() {
            Some("hostname is empty")
        } else if name.chars().any(char::is_whitespace) {
            Some("hostname contains whitespace")
        } else if name.contains(['{', '}']) {
            Some("hostname contains a brace")
        } else if name.starts_with('-') {
            Some("hostname starts with '-'")
        } else if name.len() > MAX_HOSTNAME_LEN {
            Some("hostname is longer than 253 characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SweepError::InvalidTarget {
                value: s.to_string(),
                reason,
            }),
            None => Ok(Self(name.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
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
