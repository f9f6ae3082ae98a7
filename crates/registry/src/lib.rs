//! Criterion dispatch table.
//!
//! Catalog keys are resolved into a closed evaluator enum once, at load
//! time. An unknown key is a catalog-consistency defect that aborts the run
//! before any page is opened, not a runtime condition to recover from.

mod errors;
mod not_supported;

pub use errors::RegistryError;
pub use not_supported::not_supported_reason;

use std::collections::HashMap;

use tracing::info;

use evaluator_deterministic::DeterministicCheck;
use page_adapter::CoverageAspect;
use sitegauge_core_types::{CheckKind, Criterion, CriterionId};

/// What a criterion dispatches to. Resolved once per run.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluatorBinding {
    Deterministic(DeterministicCheck),
    Semantic,
    Unsupported { reason: String },
}

#[derive(Debug)]
pub struct CriterionRegistry {
    bindings: HashMap<CriterionId, EvaluatorBinding>,
}

impl CriterionRegistry {
    /// Resolve every catalog entry, failing fast on the first defect.
    pub fn build(criteria: &[Criterion]) -> Result<Self, RegistryError> {
        let mut bindings = HashMap::with_capacity(criteria.len());
        for criterion in criteria {
            let binding = resolve_binding(criterion)?;
            bindings.insert(criterion.id, binding);
        }
        info!(
            target: "registry",
            criteria = bindings.len(),
            "criterion registry built"
        );
        Ok(Self { bindings })
    }

    pub fn resolve(&self, id: CriterionId) -> Option<&EvaluatorBinding> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn resolve_binding(criterion: &Criterion) -> Result<EvaluatorBinding, RegistryError> {
    // Instrumentation-dependent criteria are never guessed, whatever the
    // catalog declares for them.
    if let Some(reason) = not_supported_reason(criterion) {
        return Ok(EvaluatorBinding::Unsupported {
            reason: reason.to_string(),
        });
    }

    match criterion.check_kind {
        CheckKind::Unsupported => Ok(EvaluatorBinding::Unsupported {
            reason: if criterion.instruction.is_empty() {
                "not measurable without external instrumentation".to_string()
            } else {
                criterion.instruction.clone()
            },
        }),
        CheckKind::Semantic => match criterion.evaluator_key.as_str() {
            "semantic" => Ok(EvaluatorBinding::Semantic),
            other => Err(RegistryError::UnknownEvaluator {
                criterion_id: criterion.id,
                key: other.to_string(),
            }),
        },
        CheckKind::Structural | CheckKind::Visual => {
            let check = deterministic_check(criterion)?;
            Ok(EvaluatorBinding::Deterministic(check))
        }
    }
}

fn deterministic_check(criterion: &Criterion) -> Result<DeterministicCheck, RegistryError> {
    let check = match criterion.evaluator_key.as_str() {
        "contrast_ratio" => DeterministicCheck::ContrastRatio,
        "hero_viewport_ratio" => DeterministicCheck::HeroViewportRatio,
        "carousel_slide_count" => DeterministicCheck::CarouselSlideCount,
        "carousel_pause_control" => DeterministicCheck::CarouselPauseControl,
        "alt_text_coverage" => DeterministicCheck::Coverage {
            aspect: CoverageAspect::AltText,
            minimum: 0.95,
        },
        "link_decoration_coverage" => DeterministicCheck::Coverage {
            aspect: CoverageAspect::LinkDecoration,
            minimum: 0.60,
        },
        "external_link_mark_coverage" => DeterministicCheck::Coverage {
            aspect: CoverageAspect::ExternalLinkMark,
            minimum: 0.50,
        },
        "heading_hierarchy_coverage" => DeterministicCheck::Coverage {
            aspect: CoverageAspect::HeadingHierarchy,
            minimum: 0.80,
        },
        other => {
            return Err(RegistryError::UnknownEvaluator {
                criterion_id: criterion.id,
                key: other.to_string(),
            })
        }
    };
    Ok(check)
}
