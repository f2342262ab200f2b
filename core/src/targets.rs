//! # Target Resolution
//!
//! Produces the ordered host list a sweep consumes, from one of three sources:
//! * an explicit list of hostnames,
//! * a newline-delimited file (`#` comments and blank lines are ignored),
//! * a directory query for computer accounts (the default).
//!
//! Any failure here is a sweep-level error and is surfaced before a single
//! probe is sent. An empty result is not an error.

use std::env;
use std::path::PathBuf;
use std::process::Stdio;

use adminsweep_common::SweepError;
use adminsweep_common::network::target::Target;
use tokio::process::Command;
use tracing::debug;

const LDAPSEARCH: &str = "ldapsearch";
/// `sAMAccountType` value shared by every machine account.
pub const COMPUTER_ACCOUNT_FILTER: &str = "(sAMAccountType=805306369)";
const HOSTNAME_ATTRIBUTE: &str = "dNSHostName";
/// Page below the directory's MaxPageSize so large domains are listed in full.
const PAGED_RESULTS: &str = "pr=1000/noprompt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSource {
    List(Vec<String>),
    File(PathBuf),
    /// Computer accounts from the directory, optionally scoped to a DNS domain.
    Directory { domain: Option<String> },
}

impl Default for TargetSource {
    fn default() -> Self {
        TargetSource::Directory { domain: None }
    }
}

pub async fn resolve(source: &TargetSource) -> Result<Vec<Target>, SweepError> {
    let targets = match source {
        TargetSource::List(names) => parse_names(names.iter().map(String::as_str))?,
        TargetSource::File(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SweepError::TargetFile {
                    path: path.clone(),
                    source,
                })?;
            parse_target_file(&content)?
        }
        TargetSource::Directory { domain } => {
            let domain = domain.clone().or_else(|| env::var("USERDNSDOMAIN").ok());
            query_directory(domain.as_deref()).await?
        }
    };

    debug!(count = targets.len(), "Targets resolved");
    Ok(targets)
}

fn parse_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<Vec<Target>, SweepError> {
    names.map(str::parse::<Target>).collect()
}

/// One hostname per line; blank lines and `#` comments are skipped.
pub fn parse_target_file(content: &str) -> Result<Vec<Target>, SweepError> {
    parse_names(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    )
}

/// Converts `corp.example.com` into `DC=corp,DC=example,DC=com`.
pub fn domain_to_base_dn(domain: &str) -> String {
    domain
        .trim()
        .trim_end_matches('.')
        .split('.')
        .filter(|label| !label.is_empty())
        .map(|label| format!("DC={label}"))
        .collect::<Vec<String>>()
        .join(",")
}

/// Arguments for an `ldapsearch` bound with the caller's Kerberos ticket.
pub fn ldapsearch_args(domain: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = [
        "-LLL",
        "-Q",
        "-Y",
        "GSSAPI",
        "-o",
        "ldif-wrap=no",
        "-E",
        PAGED_RESULTS,
    ]
        .into_iter()
        .map(String::from)
        .collect();

    if let Some(domain) = domain.map(str::trim).filter(|d| !d.is_empty()) {
        args.push("-H".into());
        args.push(format!("ldap://{domain}"));
        args.push("-b".into());
        args.push(domain_to_base_dn(domain));
    }

    args.push(COMPUTER_ACCOUNT_FILTER.into());
    args.push(HOSTNAME_ATTRIBUTE.into());
    args
}

/// Joins folded LDIF lines: a line starting with one space continues the previous one.
fn unfold_ldif(ldif: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in ldif.lines() {
        match (line.strip_prefix(' '), lines.last_mut()) {
            (Some(rest), Some(previous)) => previous.push_str(rest),
            _ => lines.push(line.to_string()),
        }
    }
    lines
}

/// Pulls `dNSHostName` values out of LDIF. Accounts without one are skipped.
pub fn parse_ldif_hostnames(ldif: &str) -> Result<Vec<Target>, SweepError> {
    let lines = unfold_ldif(ldif);
    parse_names(lines.iter().filter_map(|line| {
        let (attribute, value) = line.split_once(':')?;
        // `attr::` is base64 and `attr:<` is a URL; neither holds a plain hostname.
        if !attribute.eq_ignore_ascii_case(HOSTNAME_ATTRIBUTE) || value.starts_with([':', '<']) {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    }))
}

async fn query_directory(domain: Option<&str>) -> Result<Vec<Target>, SweepError> {
    let args = ldapsearch_args(domain);
    debug!(
        domain = domain.unwrap_or("<ldap.conf default>"),
        "Querying directory for computer accounts"
    );

    let output = Command::new(LDAPSEARCH)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| SweepError::DirectoryLaunch {
            program: LDAPSEARCH.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SweepError::DirectoryQuery(format!(
            "{LDAPSEARCH} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    parse_ldif_hostnames(&String::from_utf8_lossy(&output.stdout))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
