//! Command-line remoting transports.
//!
//! The probe itself is delegated to a remoting client already present on the
//! operator's machine (`winrs`, `ssh`, or anything else that can run a command
//! on a remote host). The client is launched as a child process under the
//! ambient identity of the current user, so no credentials ever pass through
//! this crate.

use std::fmt;
use std::process::{Output, Stdio};
use std::str::FromStr;
use std::time::Duration;

use adminsweep_common::SweepError;
use adminsweep_common::executor::RemoteExecutor;
use adminsweep_common::network::target::Target;
use adminsweep_common::outcome::ProbeOutcome;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::classifier::{ACCESS_DENIED, PhraseMatcher};

/// Placeholder substituted with the hostname in every argument of a template.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// Denial phrase printed by OpenSSH when no accepted key or ticket is held.
pub const SSH_PERMISSION_DENIED: &str = "Permission denied";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transport {
    /// Windows Remote Shell over WinRM: `winrs -r:{target} hostname`.
    Winrs,
    /// OpenSSH in batch mode, relying on an agent or Kerberos ticket.
    Ssh,
    /// A user supplied whitespace-separated template containing `{target}`.
    Custom(String),
}

impl Transport {
    /// Builds the executor for this transport.
    ///
    /// `connect_timeout` is only forwarded to clients that accept one.
    pub fn executor(&self, connect_timeout: Duration) -> Result<CommandExecutor, SweepError> {
        match self {
            Transport::Winrs => CommandExecutor::new("winrs", ["-r:{target}", "hostname"]),
            Transport::Ssh => {
                let connect_timeout = format!("ConnectTimeout={}", connect_timeout.as_secs().max(1));
                CommandExecutor::new(
                    "ssh",
                    [
                        "-o",
                        "BatchMode=yes",
                        "-o",
                        connect_timeout.as_str(),
                        "--",
                        "{target}",
                        "hostname",
                    ],
                )
            }
            Transport::Custom(template) => CommandExecutor::from_template(template),
        }
    }

    /// Phrases this transport prints when the caller lacks rights on the host.
    pub fn denial_matcher(&self) -> PhraseMatcher {
        match self {
            Transport::Ssh => PhraseMatcher::new([ACCESS_DENIED, SSH_PERMISSION_DENIED]),
            Transport::Winrs | Transport::Custom(_) => PhraseMatcher::default(),
        }
    }
}

impl FromStr for Transport {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winrs" | "winrm" => Ok(Transport::Winrs),
            "ssh" => Ok(Transport::Ssh),
            _ if s.contains(TARGET_PLACEHOLDER) => Ok(Transport::Custom(s.trim().to_string())),
            _ => Err(SweepError::InvalidTransport(format!(
                "unknown transport '{s}' (expected winrs, ssh, or a template containing {TARGET_PLACEHOLDER})"
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Winrs => f.write_str("winrs"),
            Transport::Ssh => f.write_str("ssh"),
            Transport::Custom(template) => f.write_str(template),
        }
    }
}

/// Runs a remoting client once per target and maps its exit status to a [`ProbeOutcome`].
#[derive(Clone, Debug)]
pub struct CommandExecutor {
    program: String,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Result<Self, SweepError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program: String = program.into();
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        if program.trim().is_empty() {
            return Err(SweepError::InvalidTransport("command template is empty".into()));
        }
        if !args.iter().any(|arg| arg.contains(TARGET_PLACEHOLDER)) {
            return Err(SweepError::InvalidTransport(format!(
                "command template for {program} never mentions {TARGET_PLACEHOLDER}"
            )));
        }

        Ok(Self { program, args })
    }

    /// Splits `template` on whitespace: the first word is the program.
    pub fn from_template(template: &str) -> Result<Self, SweepError> {
        let mut words = template.split_whitespace();
        let Some(program) = words.next() else {
            return Err(SweepError::InvalidTransport("command template is empty".into()));
        };
        Self::new(program, words)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with the placeholder replaced by `target`.
    pub fn args_for(&self, target: &Target) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(TARGET_PLACEHOLDER, target.as_str()))
            .collect()
    }

    fn outcome_from_output(&self, target: &Target, output: Output) -> ProbeOutcome {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();

        if output.status.success() {
            trace!(%target, remote_hostname = stdout, "Remote command succeeded");
            return ProbeOutcome::success(target.clone());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let message: String = if !stderr.is_empty() {
            stderr.to_string()
        } else if !stdout.is_empty() {
            stdout.to_string()
        } else {
            format!("{} exited with {}", self.program, output.status)
        };

        ProbeOutcome::failure(target.clone(), message)
    }
}

#[async_trait]
impl RemoteExecutor for CommandExecutor {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        let output = Command::new(&self.program)
            .args(self.args_for(target))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) => self.outcome_from_output(target, output),
            Err(e) => ProbeOutcome::failure(
                target.clone(),
                format!("failed to launch {}: {e}", self.program),
            ),
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
