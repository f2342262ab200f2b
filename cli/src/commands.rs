pub mod sweep;

use std::path::PathBuf;
use std::time::Duration;

use adminsweep_common::config::{Config, DEFAULT_CONCURRENCY, DEFAULT_PROBE_TIMEOUT};
use adminsweep_core::targets::TargetSource;
use adminsweep_core::transport::Transport;
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "adminsweep", version)]
#[command(about = "Find the hosts where the current user holds local admin rights.")]
pub struct CommandLine {
    /// Hostnames to probe; comma-separated lists are accepted
    #[arg(value_delimiter = ',', conflicts_with_all = ["file", "domain"])]
    pub targets: Vec<String>,

    /// Read targets from a newline-delimited file
    #[arg(short, long, value_name = "PATH", conflicts_with = "domain")]
    pub file: Option<PathBuf>,

    /// Enumerate computer accounts of this directory domain (default source)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Stop dispatching probes after the first confirmed host
    #[arg(short, long)]
    pub stop_on_success: bool,

    /// Maximum number of probes in flight
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-probe timeout in seconds
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_PROBE_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Remoting client used for probes: winrs or ssh
    #[arg(long, conflicts_with = "exec")]
    pub transport: Option<Transport>,

    /// Custom probe command; every {target} is replaced with the hostname
    #[arg(long, value_name = "TEMPLATE")]
    pub exec: Option<String>,

    /// Extra error text meaning "access denied" (repeatable)
    #[arg(long, value_name = "PHRASE")]
    pub denied_text: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print confirmed hosts and warnings
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn target_source(&self) -> TargetSource {
        if !self.targets.is_empty() {
            TargetSource::List(self.targets.clone())
        } else if let Some(path) = &self.file {
            TargetSource::File(path.clone())
        } else {
            TargetSource::Directory {
                domain: self.domain.clone(),
            }
        }
    }

    pub fn transport(&self) -> Transport {
        match (&self.exec, &self.transport) {
            (Some(template), _) => Transport::Custom(template.clone()),
            (None, Some(transport)) => transport.clone(),
            (None, None) => Transport::Winrs,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            stop_on_success: self.stop_on_success,
            concurrency: self.concurrency,
            probe_timeout: Duration::from_secs(self.timeout.max(1)),
            quiet: self.quiet,
            no_banner: self.no_banner,
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
