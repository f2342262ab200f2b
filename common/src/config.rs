use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 32;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(20);

pub struct Config {
    /// Stops dispatching new probes once the first host confirms admin access.
    ///
    /// Probes that are already in flight are allowed to finish.
    pub stop_on_success: bool,
    /// Upper bound on probes running at the same time. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Per-probe deadline. A probe that exceeds it is reported as anomalous.
    pub probe_timeout: Duration,
    pub quiet: u8,
    pub no_banner: bool,
}

impl Config {
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_on_success: false,
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            quiet: 0,
            no_banner: false,
        }
    }
}
