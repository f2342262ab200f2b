use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Sweep-level failures.
///
/// These only arise before probing starts (target resolution and transport
/// setup). Per-target probe failures never surface here; they are carried by
/// [`ProbeOutcome`](crate::outcome::ProbeOutcome).
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to read target file {}: {source}", .path.display())]
    TargetFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid target '{value}': {reason}")]
    InvalidTarget { value: String, reason: &'static str },

    #[error("failed to launch {program}: {source}")]
    DirectoryLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("directory query failed: {0}")]
    DirectoryQuery(String),

    #[error("invalid transport: {0}")]
    InvalidTransport(String),
}
