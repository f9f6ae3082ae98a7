use std::future::Future;

use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use sitegauge_core_types::CheckCtx;

use crate::policy::RetryPolicy;
use crate::{FailureClass, FailureClassified};

/// Terminal outcome after the gate has exhausted its attempt budget.
/// Carries the last failure's classification so the caller can decide
/// between an ERROR result and a confident FAIL.
#[derive(Debug, Error)]
#[error("{label} failed after {attempts} attempt(s): {message}")]
pub struct GateError {
    pub class: FailureClass,
    pub attempts: u32,
    pub label: String,
    pub message: String,
}

/// Wraps any service-bound call with class-aware retry, exponential
/// backoff and a rate-limit cooldown. One instance per worker; the gate
/// itself holds no mutable state.
#[derive(Clone, Debug)]
pub struct RetryGate {
    policy: RetryPolicy,
}

impl RetryGate {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute<T, E, F, Fut>(
        &self,
        ctx: &CheckCtx,
        label: &str,
        mut op: F,
    ) -> Result<T, GateError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: FailureClassified,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let class = err.class();
            let allowed = self.policy.attempts_for(class);
            if attempt >= allowed {
                return Err(GateError {
                    class,
                    attempts: attempt,
                    label: label.to_string(),
                    message: err.to_string(),
                });
            }

            let mut delay = self.policy.backoff_delay(attempt);
            if class == FailureClass::RateLimited {
                delay += self.policy.rate_limit_cooldown;
            }
            warn!(
                target: "retry_gate",
                run_id = %ctx.run_id.0,
                site_id = %ctx.site_id,
                criterion_id = ?ctx.criterion_id,
                label,
                attempt,
                class = ?class,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "attempt failed, backing off"
            );
            sleep(delay).await;
        }
    }
}
