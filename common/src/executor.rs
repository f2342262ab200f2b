use async_trait::async_trait;

use crate::network::target::Target;
use crate::outcome::ProbeOutcome;

/// Runs the read-only "report hostname" command on a remote host.
///
/// Implementations reuse the ambient identity of the calling process and must
/// fold every failure (connection, authentication, launch) into the returned
/// [`ProbeOutcome`]. A probe never fails the sweep.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn probe(&self, target: &Target) -> ProbeOutcome;
}
