use retry_gate::RetryPolicy;
use sitegauge_core_types::{RunId, Verdict};

/// Tunables for one run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Concurrent site workers. 1 keeps the default strictly sequential
    /// schedule that third-party rate limits assume.
    pub parallel_sites: usize,
    /// Checkpoint flush cadence, in completed sites.
    pub checkpoint_interval: u32,
    pub page_retry: RetryPolicy,
    pub semantic_retry: RetryPolicy,
    /// Screenshot failing visual checks when the adapter supports it.
    pub capture_evidence: bool,
    /// Characters of reduced page content per semantic call.
    pub max_context_chars: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel_sites: 1,
            checkpoint_interval: 1,
            page_retry: RetryPolicy::page(),
            semantic_retry: RetryPolicy::semantic(),
            capture_evidence: true,
            max_context_chars: evaluator_semantic::DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

/// End-of-run accounting. ERROR and NOT_SUPPORTED are surfaced apart from
/// the pass/fail rate; consumers must not fold them into denominators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub run_id: Option<RunId>,
    pub pass: usize,
    pub fail: usize,
    pub error: usize,
    pub not_supported: usize,
    /// Pairs already completed in the loaded checkpoint.
    pub skipped: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub(crate) fn count(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
            Verdict::Error => self.error += 1,
            Verdict::NotSupported => self.not_supported += 1,
        }
    }

    pub(crate) fn absorb(&mut self, other: &RunSummary) {
        self.pass += other.pass;
        self.fail += other.fail;
        self.error += other.error;
        self.not_supported += other.not_supported;
        self.skipped += other.skipped;
    }

    /// Results produced by this run, excluding skipped pairs.
    pub fn produced(&self) -> usize {
        self.pass + self.fail + self.error + self.not_supported
    }

    /// Total pairs accounted for across this run and the checkpoint.
    pub fn accounted(&self) -> usize {
        self.produced() + self.skipped
    }
}
