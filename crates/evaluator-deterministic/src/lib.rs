//! Deterministic threshold checks.
//!
//! Every check here is a pure function over already-extracted
//! [`PageMetrics`]: no page access, no service calls, and a verdict that is
//! always fully confident. Detail strings embed the measured value.

pub mod contrast;
pub mod coverage;
pub mod enumeration;
pub mod geometry;

use page_adapter::{CoverageAspect, PageMetrics};

/// Outcome of one deterministic check, before it is stamped into an
/// audit result by the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckOutcome {
    pub kind: OutcomeKind,
    pub details: String,
    /// Selector worth screenshotting as evidence, when one exists.
    pub evidence_selector: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutcomeKind {
    Pass,
    Fail,
    /// The metric needed to decide was not measurable on this page.
    Unmeasurable,
}

impl CheckOutcome {
    pub fn pass(details: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Pass,
            details: details.into(),
            evidence_selector: None,
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Fail,
            details: details.into(),
            evidence_selector: None,
        }
    }

    pub fn unmeasurable(details: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Unmeasurable,
            details: details.into(),
            evidence_selector: None,
        }
    }

    pub fn with_evidence(mut self, selector: impl Into<String>) -> Self {
        self.evidence_selector = Some(selector.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.kind == OutcomeKind::Pass
    }
}

/// Closed set of deterministic checks, resolved from the catalog at load
/// time. Coverage variants carry the criterion's own minimum; there is no
/// shared default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeterministicCheck {
    ContrastRatio,
    HeroViewportRatio,
    CarouselSlideCount,
    CarouselPauseControl,
    Coverage {
        aspect: CoverageAspect,
        minimum: f64,
    },
}

impl DeterministicCheck {
    pub fn evaluate(&self, metrics: &PageMetrics) -> CheckOutcome {
        match self {
            DeterministicCheck::ContrastRatio => contrast::evaluate(metrics),
            DeterministicCheck::HeroViewportRatio => geometry::evaluate_hero_ratio(metrics),
            DeterministicCheck::CarouselSlideCount => enumeration::evaluate_slide_count(metrics),
            DeterministicCheck::CarouselPauseControl => {
                enumeration::evaluate_pause_control(metrics)
            }
            DeterministicCheck::Coverage { aspect, minimum } => {
                coverage::evaluate(metrics, *aspect, *minimum)
            }
        }
    }
}
