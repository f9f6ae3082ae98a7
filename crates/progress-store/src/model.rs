use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitegauge_core_types::{AuditResult, CriterionId, SiteId};

/// The sole recovery artifact of a run. Grows monotonically; pairs are
/// never removed during a run. The ordered set keeps checkpoint output
/// stable across saves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub completed_pairs: BTreeSet<(SiteId, CriterionId)>,
    pub results: Vec<AuditResult>,
    pub saved_at: DateTime<Utc>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self {
            completed_pairs: BTreeSet::new(),
            results: Vec::new(),
            saved_at: Utc::now(),
        }
    }

    pub fn is_completed(&self, site_id: SiteId, criterion_id: CriterionId) -> bool {
        self.completed_pairs.contains(&(site_id, criterion_id))
    }

    /// Append a result. Returns false (and keeps the existing result) when
    /// the pair already completed; resume must never duplicate.
    pub fn record(&mut self, result: AuditResult) -> bool {
        if !self.completed_pairs.insert(result.pair()) {
            return false;
        }
        self.results.push(result);
        true
    }

    pub fn completed_count(&self) -> usize {
        self.completed_pairs.len()
    }
}

#[cfg(test)]
mod tests {
    use sitegauge_core_types::AuditResult;

    use super::*;

    #[test]
    fn records_are_deduplicated_by_pair() {
        let mut record = ProgressRecord::new();
        let first = AuditResult::deterministic(SiteId(1), CriterionId(2), true, "first");
        let second = AuditResult::deterministic(SiteId(1), CriterionId(2), false, "second");

        assert!(record.record(first));
        assert!(!record.record(second));
        assert_eq!(record.results.len(), 1);
        assert_eq!(record.results[0].details, "first");
        assert!(record.is_completed(SiteId(1), CriterionId(2)));
    }

    #[test]
    fn distinct_pairs_accumulate() {
        let mut record = ProgressRecord::new();
        record.record(AuditResult::deterministic(SiteId(1), CriterionId(1), true, "a"));
        record.record(AuditResult::deterministic(SiteId(1), CriterionId(2), true, "b"));
        record.record(AuditResult::deterministic(SiteId(2), CriterionId(1), true, "c"));
        assert_eq!(record.completed_count(), 3);
    }
}
