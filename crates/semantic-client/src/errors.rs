use retry_gate::{FailureClass, FailureClassified};
use thiserror::Error;

/// Classified failures from the hosted reasoning service.
#[derive(Clone, Debug, Error)]
pub enum SemanticError {
    #[error("rate limited by upstream")]
    RateLimited,
    #[error("semantic call timed out")]
    Timeout,
    #[error("transient upstream failure: {0}")]
    Transient(String),
    #[error("fatal upstream failure: {0}")]
    Fatal(String),
}

impl FailureClassified for SemanticError {
    fn class(&self) -> FailureClass {
        match self {
            SemanticError::RateLimited => FailureClass::RateLimited,
            SemanticError::Timeout => FailureClass::Timeout,
            SemanticError::Transient(_) => FailureClass::Transient,
            SemanticError::Fatal(_) => FailureClass::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fatal_is_terminal() {
        assert!(SemanticError::RateLimited.class().is_retryable());
        assert!(SemanticError::Timeout.class().is_retryable());
        assert!(SemanticError::Transient("503".into()).class().is_retryable());
        assert!(!SemanticError::Fatal("401".into()).class().is_retryable());
    }
}
