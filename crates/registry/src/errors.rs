use thiserror::Error;

use sitegauge_core_types::CriterionId;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("criterion {criterion_id} references unknown evaluator key '{key}'")]
    UnknownEvaluator {
        criterion_id: CriterionId,
        key: String,
    },
}
