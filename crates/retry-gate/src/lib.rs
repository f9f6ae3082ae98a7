mod gate;
mod policy;

pub use gate::{GateError, RetryGate};
pub use policy::RetryPolicy;

use thiserror::Error;

/// Failure taxonomy shared by every network- or service-bound call the
/// engine makes. Callers classify their own error types; the gate only
/// consults the class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// Connection-level failure while reaching the target.
    Network,
    /// The call did not complete within its deadline.
    Timeout,
    /// Upstream signalled throttling; retried after a fixed cooldown.
    RateLimited,
    /// Other transient upstream failure, retried once.
    Transient,
    /// The requested resource does not exist; retrying cannot help.
    NotFound,
    /// Permanent failure, surfaced immediately.
    Fatal,
}

impl FailureClass {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureClass::Network
                | FailureClass::Timeout
                | FailureClass::RateLimited
                | FailureClass::Transient
        )
    }
}

/// Implemented by error types that know their own failure class.
pub trait FailureClassified: std::error::Error {
    fn class(&self) -> FailureClass;
}

/// Ready-made carrier for callers whose failures already know their class.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    pub class: FailureClass,
    pub message: String,
}

impl ClassifiedError {
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }
}

impl FailureClassified for ClassifiedError {
    fn class(&self) -> FailureClass {
        self.class
    }
}
