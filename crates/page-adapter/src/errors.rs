use retry_gate::{FailureClass, FailureClassified};
use thiserror::Error;

/// Classified failures surfaced by page-access implementations.
#[derive(Clone, Debug, Error)]
pub enum PageError {
    #[error("navigation timed out")]
    NavTimeout,
    #[error("network failure: {0}")]
    Network(String),
    #[error("page returned http status {0}")]
    HttpStatus(u16),
    #[error("element not found: {0}")]
    ElementMissing(String),
    #[error("internal page-access error: {0}")]
    Internal(String),
}

impl PageError {
    /// True when the page could not be obtained at all; the orchestrator
    /// fans this out to ERROR results for every remaining criterion.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            PageError::NavTimeout | PageError::Network(_) | PageError::HttpStatus(_)
        )
    }
}

impl FailureClassified for PageError {
    fn class(&self) -> FailureClass {
        match self {
            PageError::NavTimeout => FailureClass::Timeout,
            PageError::Network(_) => FailureClass::Network,
            PageError::HttpStatus(status) if (500..600).contains(status) => {
                FailureClass::Transient
            }
            PageError::HttpStatus(_) => FailureClass::NotFound,
            PageError::ElementMissing(_) => FailureClass::NotFound,
            PageError::Internal(_) => FailureClass::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_covers_nav_and_http_failures() {
        assert!(PageError::NavTimeout.is_unavailable());
        assert!(PageError::Network("reset".into()).is_unavailable());
        assert!(PageError::HttpStatus(404).is_unavailable());
        assert!(!PageError::ElementMissing(".hero".into()).is_unavailable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!PageError::HttpStatus(404).class().is_retryable());
        assert!(PageError::HttpStatus(503).class().is_retryable());
        assert!(PageError::NavTimeout.class().is_retryable());
    }
}
