use thiserror::Error;

use progress_store::StoreError;
use sitegauge_core_types::CriterionId;
use sitegauge_registry::RegistryError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("checkpoint failure: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("criterion {0} missing from registry")]
    CatalogInconsistent(CriterionId),
}
