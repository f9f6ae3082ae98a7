use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Validation errors raised while loading the site/criterion catalogs.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid site id {0}: ids start at 1")]
    InvalidSiteId(u32),
    #[error("invalid site url {url}: {reason}")]
    InvalidSiteUrl { url: String, reason: String },
    #[error("duplicate id {0} in catalog")]
    DuplicateId(u32),
    #[error("unknown check kind: {0}")]
    UnknownCheckKind(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub u32);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CriterionId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one audit run, shared by every result it produces.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Correlation value threaded through orchestrator, evaluators and the retry
/// gate; attached to every tracing event instead of process-global state.
/// Site-scoped operations (page navigation) carry no criterion yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckCtx {
    pub run_id: RunId,
    pub site_id: SiteId,
    pub criterion_id: Option<CriterionId>,
}

impl CheckCtx {
    pub fn for_site(run_id: RunId, site_id: SiteId) -> Self {
        Self {
            run_id,
            site_id,
            criterion_id: None,
        }
    }

    pub fn for_check(run_id: RunId, site_id: SiteId, criterion_id: CriterionId) -> Self {
        Self {
            run_id,
            site_id,
            criterion_id: Some(criterion_id),
        }
    }
}

impl fmt::Display for CheckCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run={} site={}", self.run_id.0, self.site_id)?;
        if let Some(criterion_id) = self.criterion_id {
            write!(f, " criterion={criterion_id}")?;
        }
        Ok(())
    }
}

/// A site under audit. Loaded once, read-only for the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub url: Url,
}

impl Site {
    pub fn new(id: u32, name: impl Into<String>, url: &str) -> Result<Self, ModelError> {
        if id == 0 {
            return Err(ModelError::InvalidSiteId(id));
        }
        let parsed = Url::parse(url).map_err(|err| ModelError::InvalidSiteUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ModelError::InvalidSiteUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            id: SiteId(id),
            name: name.into(),
            url: parsed,
        })
    }
}

/// How a criterion is decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Structural,
    Visual,
    Semantic,
    Unsupported,
}

impl std::str::FromStr for CheckKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "visual" => Ok(Self::Visual),
            "semantic" => Ok(Self::Semantic),
            "unsupported" => Ok(Self::Unsupported),
            other => Err(ModelError::UnknownCheckKind(other.to_string())),
        }
    }
}

/// One evaluation rule from the fixed catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub category: String,
    pub subcategory: String,
    pub check_kind: CheckKind,
    pub evaluator_key: String,
    pub instruction: String,
}

/// Reject duplicate ids before a run starts; the catalogs are the only
/// place ids enter the system.
pub fn validate_unique_sites(sites: &[Site]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for site in sites {
        if !seen.insert(site.id) {
            return Err(ModelError::DuplicateId(site.id.0));
        }
    }
    Ok(())
}

pub fn validate_unique_criteria(criteria: &[Criterion]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for criterion in criteria {
        if !seen.insert(criterion.id) {
            return Err(ModelError::DuplicateId(criterion.id.0));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "NOT_SUPPORTED")]
    NotSupported,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Error => "ERROR",
            Verdict::NotSupported => "NOT_SUPPORTED",
        };
        f.write_str(label)
    }
}

/// Outcome of one (site, criterion) check. Immutable once constructed; a
/// retry produces a replacement record, never an in-place edit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditResult {
    pub site_id: SiteId,
    pub criterion_id: CriterionId,
    pub verdict: Verdict,
    pub confidence: f32,
    pub details: String,
    pub checked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_path: Option<String>,
}

impl AuditResult {
    /// Deterministic checks are always fully confident.
    pub fn deterministic(
        site_id: SiteId,
        criterion_id: CriterionId,
        passed: bool,
        details: impl Into<String>,
    ) -> Self {
        Self {
            site_id,
            criterion_id,
            verdict: if passed { Verdict::Pass } else { Verdict::Fail },
            confidence: 1.0,
            details: details.into(),
            checked_at: Utc::now(),
            error_message: None,
            evidence_path: None,
        }
    }

    /// Semantic verdicts pass the service's self-reported confidence
    /// through, clamped to [0, 1].
    pub fn semantic(
        site_id: SiteId,
        criterion_id: CriterionId,
        found: bool,
        confidence: f32,
        details: impl Into<String>,
    ) -> Self {
        Self {
            site_id,
            criterion_id,
            verdict: if found { Verdict::Pass } else { Verdict::Fail },
            confidence: confidence.clamp(0.0, 1.0),
            details: details.into(),
            checked_at: Utc::now(),
            error_message: None,
            evidence_path: None,
        }
    }

    pub fn error(
        site_id: SiteId,
        criterion_id: CriterionId,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            site_id,
            criterion_id,
            verdict: Verdict::Error,
            confidence: 0.0,
            details: message.clone(),
            checked_at: Utc::now(),
            error_message: Some(message),
            evidence_path: None,
        }
    }

    pub fn not_supported(
        site_id: SiteId,
        criterion_id: CriterionId,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            site_id,
            criterion_id,
            verdict: Verdict::NotSupported,
            confidence: 0.0,
            details: reason.into(),
            checked_at: Utc::now(),
            error_message: None,
            evidence_path: None,
        }
    }

    pub fn with_evidence(mut self, path: impl Into<String>) -> Self {
        self.evidence_path = Some(path.into());
        self
    }

    pub fn pair(&self) -> (SiteId, CriterionId) {
        (self.site_id, self.criterion_id)
    }
}

/// Parsed semantic-service output; consumed immediately to build a result.
#[derive(Clone, Debug, Deserialize)]
pub struct SemanticVerdict {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl SemanticVerdict {
    /// Fallback used when the service output cannot be decoded. Decode
    /// failures map to a confident-zero FAIL, never an error.
    pub fn unparseable(reason: impl fmt::Display) -> Self {
        Self {
            found: false,
            confidence: 0.0,
            details: format!("unparseable response: {reason}"),
            reasoning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_rejects_bad_input() {
        assert!(Site::new(0, "Zero", "https://example.com").is_err());
        assert!(Site::new(1, "NoScheme", "example.com/ir").is_err());
        assert!(Site::new(1, "Ftp", "ftp://example.com").is_err());
        assert!(Site::new(1, "Ok", "https://example.com/ir").is_ok());
    }

    #[test]
    fn duplicate_site_ids_rejected() {
        let sites = vec![
            Site::new(1, "A", "https://a.example").unwrap(),
            Site::new(1, "B", "https://b.example").unwrap(),
        ];
        assert!(matches!(
            validate_unique_sites(&sites),
            Err(ModelError::DuplicateId(1))
        ));
    }

    #[test]
    fn semantic_confidence_clamped() {
        let result = AuditResult::semantic(SiteId(1), CriterionId(2), true, 1.7, "found");
        assert_eq!(result.verdict, Verdict::Pass);
        assert_eq!(result.confidence, 1.0);

        let result = AuditResult::semantic(SiteId(1), CriterionId(2), false, -0.3, "absent");
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn deterministic_always_fully_confident() {
        let result = AuditResult::deterministic(SiteId(1), CriterionId(2), true, "contrast 5.2:1");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.verdict, Verdict::Pass);
    }

    #[test]
    fn not_supported_never_carries_confidence() {
        let result = AuditResult::not_supported(SiteId(1), CriterionId(2), "needs instrumentation");
        assert_eq!(result.verdict, Verdict::NotSupported);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn verdict_serializes_upper_snake() {
        let json = serde_json::to_string(&Verdict::NotSupported).unwrap();
        assert_eq!(json, "\"NOT_SUPPORTED\"");
        let back: Verdict = serde_json::from_str("\"PASS\"").unwrap();
        assert_eq!(back, Verdict::Pass);
    }

    #[test]
    fn check_kind_parses_catalog_labels() {
        assert_eq!(
            "Structural".parse::<CheckKind>().unwrap(),
            CheckKind::Structural
        );
        assert!("timing".parse::<CheckKind>().is_err());
    }
}
