//! Semantic evaluation: reduce page markup, prompt the reasoning service
//! through the retry gate, decode its verdict.
//!
//! Failures on this channel never abort a run: unparseable responses become
//! confident-zero FAILs, exhausted retries become ERROR results.

pub mod prompt;
pub mod reduce;
pub mod verdict;

use std::sync::Arc;

use tracing::debug;

use retry_gate::RetryGate;
use semantic_client::SemanticClient;
use sitegauge_core_types::{AuditResult, CheckCtx, Criterion};

/// Characters of reduced page content sent per call, bounding token spend.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 15_000;

pub struct SemanticEvaluator {
    client: Arc<dyn SemanticClient>,
    gate: RetryGate,
    max_context_chars: usize,
}

impl SemanticEvaluator {
    pub fn new(client: Arc<dyn SemanticClient>, gate: RetryGate) -> Self {
        Self {
            client,
            gate,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }

    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    /// Judge one criterion against the raw markup of the page.
    pub async fn evaluate(
        &self,
        ctx: &CheckCtx,
        criterion: &Criterion,
        page_content: &str,
    ) -> AuditResult {
        let context = reduce::reduce_markup(page_content, self.max_context_chars);
        let prompt = prompt::build_prompt(criterion);
        debug!(
            target: "evaluator_semantic",
            run_id = %ctx.run_id.0,
            site_id = %ctx.site_id,
            criterion_id = %criterion.id,
            context_chars = context.len(),
            "dispatching semantic judgment"
        );

        let raw = self
            .gate
            .execute(ctx, "semantic_call", || {
                self.client.send(&prompt, &context)
            })
            .await;

        match raw {
            Ok(text) => {
                let verdict = verdict::decode(&text);
                AuditResult::semantic(
                    ctx.site_id,
                    criterion.id,
                    verdict.found,
                    verdict.confidence,
                    verdict.details,
                )
            }
            Err(gate_err) => AuditResult::error(ctx.site_id, criterion.id, gate_err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use retry_gate::RetryPolicy;
    use semantic_client::SemanticError;
    use sitegauge_core_types::{CheckKind, CriterionId, RunId, SiteId, Verdict};
    use std::time::Duration;

    use super::*;

    struct CannedClient {
        response: Result<String, SemanticError>,
    }

    #[async_trait]
    impl SemanticClient for CannedClient {
        async fn send(&self, _prompt: &str, _context: &str) -> Result<String, SemanticError> {
            self.response.clone()
        }
    }

    fn criterion() -> Criterion {
        Criterion {
            id: CriterionId(42),
            category: "Content".into(),
            subcategory: "News list".into(),
            check_kind: CheckKind::Semantic,
            evaluator_key: "semantic".into(),
            instruction: "A dated list of disclosure news must be present.".into(),
        }
    }

    fn ctx() -> CheckCtx {
        CheckCtx::for_check(RunId::new(), SiteId(3), CriterionId(42))
    }

    fn tight_gate() -> RetryGate {
        RetryGate::new(RetryPolicy {
            base_delay: Duration::from_millis(1),
            rate_limit_cooldown: Duration::from_millis(1),
            ..RetryPolicy::default()
        })
    }

    #[tokio::test]
    async fn found_verdict_becomes_pass() {
        let evaluator = SemanticEvaluator::new(
            Arc::new(CannedClient {
                response: Ok(
                    r#"{"found": true, "confidence": 0.9, "details": "news list with dates"}"#
                        .into(),
                ),
            }),
            tight_gate(),
        );
        let result = evaluator.evaluate(&ctx(), &criterion(), "<html></html>").await;
        assert_eq!(result.verdict, Verdict::Pass);
        assert!((result.confidence - 0.9).abs() < 1e-6);
        assert!(result.details.contains("news list"));
    }

    #[tokio::test]
    async fn unparseable_response_is_confident_zero_fail() {
        let evaluator = SemanticEvaluator::new(
            Arc::new(CannedClient {
                response: Ok("I could not find anything relevant, sorry.".into()),
            }),
            tight_gate(),
        );
        let result = evaluator.evaluate(&ctx(), &criterion(), "<html></html>").await;
        assert_eq!(result.verdict, Verdict::Fail);
        assert_eq!(result.confidence, 0.0);
        assert!(result.details.contains("unparseable"));
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn exhausted_retries_become_error() {
        let evaluator = SemanticEvaluator::new(
            Arc::new(CannedClient {
                response: Err(SemanticError::Timeout),
            }),
            tight_gate(),
        );
        let result = evaluator.evaluate(&ctx(), &criterion(), "<html></html>").await;
        assert_eq!(result.verdict, Verdict::Error);
        assert!(result.error_message.is_some());
    }
}
