use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use evaluator_deterministic::{DeterministicCheck, OutcomeKind};
use evaluator_semantic::SemanticEvaluator;
use page_adapter::{PageAccess, PageHandle, PageMetrics};
use progress_store::{JsonProgressStore, ProgressWriter, WriterMsg};
use retry_gate::{GateError, RetryGate};
use semantic_client::SemanticClient;
use sitegauge_core_types::{AuditResult, CheckCtx, Criterion, CriterionId, RunId, Site, SiteId};
use sitegauge_registry::{CriterionRegistry, EvaluatorBinding};

use crate::errors::OrchestratorError;
use crate::model::{RunOptions, RunSummary};

/// Drives the site loop and criterion loop. All collaborator failures are
/// converted to results here; nothing below this boundary aborts a run.
pub struct Orchestrator {
    page_access: Arc<dyn PageAccess>,
    semantic_client: Arc<dyn SemanticClient>,
    store: JsonProgressStore,
    options: RunOptions,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        page_access: Arc<dyn PageAccess>,
        semantic_client: Arc<dyn SemanticClient>,
        store: JsonProgressStore,
        options: RunOptions,
    ) -> Self {
        Self {
            page_access,
            semantic_client,
            store,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Token the operator can cancel; honored between criteria, never
    /// mid-evaluation.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Audit every site against every criterion not already checkpointed.
    /// New results stream through `results_tx` in completion order; every
    /// result streamed is durably saved before this returns.
    pub async fn run(
        &self,
        sites: &[Site],
        criteria: &[Criterion],
        results_tx: mpsc::Sender<AuditResult>,
    ) -> Result<RunSummary, OrchestratorError> {
        let record = self.store.load()?.unwrap_or_default();
        let completed: Arc<BTreeSet<(SiteId, CriterionId)>> =
            Arc::new(record.completed_pairs.clone());

        let registry = CriterionRegistry::build(criteria)?;
        let mut plan = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let binding = registry
                .resolve(criterion.id)
                .ok_or(OrchestratorError::CatalogInconsistent(criterion.id))?;
            plan.push((criterion.clone(), binding.clone()));
        }
        let plan = Arc::new(plan);

        let run_id = RunId::new();
        info!(
            target: "orchestrator",
            run_id = %run_id.0,
            sites = sites.len(),
            criteria = criteria.len(),
            resumed_pairs = completed.len(),
            parallel_sites = self.options.parallel_sites,
            "starting audit run"
        );

        let writer = ProgressWriter::spawn(
            self.store.clone(),
            record,
            self.options.checkpoint_interval,
        );
        let writer_tx = writer.sender();

        let mut summary = RunSummary {
            run_id: Some(run_id.clone()),
            ..RunSummary::default()
        };

        if self.options.parallel_sites <= 1 {
            for site in sites {
                if self.cancel.is_cancelled() {
                    summary.cancelled = true;
                    break;
                }
                let task = self.site_task(&run_id, &plan, &completed, &writer_tx, &results_tx);
                let site_summary = task.audit(site).await;
                if site_summary.cancelled {
                    summary.cancelled = true;
                }
                summary.absorb(&site_summary);
                let _ = writer_tx.send(WriterMsg::SiteDone).await;
            }
        } else {
            let slots = Arc::new(Semaphore::new(self.options.parallel_sites));
            let mut handles = Vec::with_capacity(sites.len());
            for site in sites.iter().cloned() {
                let task = self.site_task(&run_id, &plan, &completed, &writer_tx, &results_tx);
                let slots = Arc::clone(&slots);
                let writer_tx = writer_tx.clone();
                handles.push(tokio::spawn(async move {
                    let _permit = match slots.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return RunSummary::default(),
                    };
                    if task.cancel.is_cancelled() {
                        return RunSummary {
                            cancelled: true,
                            ..RunSummary::default()
                        };
                    }
                    let site_summary = task.audit(&site).await;
                    let _ = writer_tx.send(WriterMsg::SiteDone).await;
                    site_summary
                }));
            }
            for handle in handles {
                match handle.await {
                    Ok(site_summary) => {
                        if site_summary.cancelled {
                            summary.cancelled = true;
                        }
                        summary.absorb(&site_summary);
                    }
                    Err(err) => {
                        error!(target: "orchestrator", error = %err, "site worker panicked");
                    }
                }
            }
        }

        drop(writer_tx);
        let record = writer.finish().await?;

        info!(
            target: "orchestrator",
            run_id = %run_id.0,
            pass = summary.pass,
            fail = summary.fail,
            error = summary.error,
            not_supported = summary.not_supported,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            checkpointed = record.completed_count(),
            "audit run finished"
        );
        Ok(summary)
    }

    fn site_task(
        &self,
        run_id: &RunId,
        plan: &Arc<Vec<(Criterion, EvaluatorBinding)>>,
        completed: &Arc<BTreeSet<(SiteId, CriterionId)>>,
        writer_tx: &mpsc::Sender<WriterMsg>,
        results_tx: &mpsc::Sender<AuditResult>,
    ) -> SiteTask {
        SiteTask {
            page_access: Arc::clone(&self.page_access),
            semantic_client: Arc::clone(&self.semantic_client),
            plan: Arc::clone(plan),
            completed: Arc::clone(completed),
            options: self.options.clone(),
            run_id: run_id.clone(),
            cancel: self.cancel.clone(),
            writer_tx: writer_tx.clone(),
            results_tx: results_tx.clone(),
        }
    }
}

/// Evaluators a pending criterion can dispatch to once a page exists.
enum MeasurableBinding {
    Deterministic(DeterministicCheck),
    Semantic,
}

/// Per-site execution state: one page handle, one retry gate of each kind,
/// shared with nothing.
struct SiteTask {
    page_access: Arc<dyn PageAccess>,
    semantic_client: Arc<dyn SemanticClient>,
    plan: Arc<Vec<(Criterion, EvaluatorBinding)>>,
    completed: Arc<BTreeSet<(SiteId, CriterionId)>>,
    options: RunOptions,
    run_id: RunId,
    cancel: CancellationToken,
    writer_tx: mpsc::Sender<WriterMsg>,
    results_tx: mpsc::Sender<AuditResult>,
}

impl SiteTask {
    async fn audit(&self, site: &Site) -> RunSummary {
        let mut summary = RunSummary::default();

        let pending: Vec<&(Criterion, EvaluatorBinding)> = self
            .plan
            .iter()
            .filter(|(criterion, _)| !self.completed.contains(&(site.id, criterion.id)))
            .collect();
        summary.skipped = self.plan.len() - pending.len();
        if pending.is_empty() {
            debug!(target: "orchestrator", site_id = %site.id, "site already completed, skipping");
            return summary;
        }

        info!(
            target: "orchestrator",
            site_id = %site.id,
            name = %site.name,
            url = %site.url,
            pending = pending.len(),
            "auditing site"
        );

        // Not-measurable criteria need no page; they resolve even when the
        // site itself is unreachable.
        let mut measurable: Vec<(&Criterion, MeasurableBinding)> = Vec::new();
        for (criterion, binding) in pending {
            match binding {
                EvaluatorBinding::Unsupported { reason } => {
                    self.emit(
                        &mut summary,
                        AuditResult::not_supported(site.id, criterion.id, reason.clone()),
                    )
                    .await;
                }
                EvaluatorBinding::Deterministic(check) => {
                    measurable.push((criterion, MeasurableBinding::Deterministic(*check)));
                }
                EvaluatorBinding::Semantic => {
                    measurable.push((criterion, MeasurableBinding::Semantic));
                }
            }
        }
        if measurable.is_empty() {
            return summary;
        }

        let gate = RetryGate::new(self.options.page_retry.clone());
        let site_ctx = CheckCtx::for_site(self.run_id.clone(), site.id);
        let page = match gate
            .execute(&site_ctx, "page_open", || self.page_access.open(&site.url))
            .await
        {
            Ok(page) => page,
            Err(gate_err) => {
                warn!(
                    target: "orchestrator",
                    site_id = %site.id,
                    error = %gate_err,
                    "site unreachable, fanning out error results"
                );
                for (criterion, _) in measurable {
                    self.emit(
                        &mut summary,
                        AuditResult::error(
                            site.id,
                            criterion.id,
                            format!("page unavailable: {gate_err}"),
                        ),
                    )
                    .await;
                }
                return summary;
            }
        };

        // Page assets are fetched once and shared by every criterion of
        // this site.
        let needs_metrics = measurable
            .iter()
            .any(|(_, binding)| matches!(binding, MeasurableBinding::Deterministic(_)));
        let needs_content = measurable
            .iter()
            .any(|(_, binding)| matches!(binding, MeasurableBinding::Semantic));
        let metrics = if needs_metrics {
            Some(
                gate.execute(&site_ctx, "extract_metrics", || {
                    self.page_access.extract_metrics(&page)
                })
                .await,
            )
        } else {
            None
        };
        let content = if needs_content {
            Some(
                gate.execute(&site_ctx, "extract_content", || {
                    self.page_access.extract_content(&page)
                })
                .await,
            )
        } else {
            None
        };

        let semantic = SemanticEvaluator::new(
            Arc::clone(&self.semantic_client),
            RetryGate::new(self.options.semantic_retry.clone()),
        )
        .with_max_context_chars(self.options.max_context_chars);

        for (criterion, binding) in measurable {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let result = match binding {
                MeasurableBinding::Deterministic(check) => {
                    self.run_deterministic(site, criterion, check, metrics.as_ref(), &page)
                        .await
                }
                MeasurableBinding::Semantic => match content.as_ref() {
                    Some(Ok(content)) => {
                        let ctx = CheckCtx::for_check(self.run_id.clone(), site.id, criterion.id);
                        semantic.evaluate(&ctx, criterion, content).await
                    }
                    Some(Err(gate_err)) => AuditResult::error(
                        site.id,
                        criterion.id,
                        format!("page content unavailable: {gate_err}"),
                    ),
                    None => {
                        AuditResult::error(site.id, criterion.id, "page content unavailable")
                    }
                },
            };
            self.emit(&mut summary, result).await;
        }

        if let Err(err) = self.page_access.close(page).await {
            debug!(target: "orchestrator", site_id = %site.id, error = %err, "page close failed");
        }
        summary
    }

    async fn run_deterministic(
        &self,
        site: &Site,
        criterion: &Criterion,
        check: DeterministicCheck,
        metrics: Option<&Result<PageMetrics, GateError>>,
        page: &PageHandle,
    ) -> AuditResult {
        let metrics = match metrics {
            Some(Ok(metrics)) => metrics,
            Some(Err(gate_err)) => {
                return AuditResult::error(
                    site.id,
                    criterion.id,
                    format!("page metrics unavailable: {gate_err}"),
                )
            }
            None => return AuditResult::error(site.id, criterion.id, "page metrics unavailable"),
        };

        let outcome = check.evaluate(metrics);
        match outcome.kind {
            OutcomeKind::Pass => {
                AuditResult::deterministic(site.id, criterion.id, true, outcome.details)
            }
            OutcomeKind::Fail => {
                let mut result =
                    AuditResult::deterministic(site.id, criterion.id, false, outcome.details);
                if self.options.capture_evidence {
                    if let Some(selector) = &outcome.evidence_selector {
                        match self.page_access.capture_evidence(page, selector).await {
                            Ok(path) => result = result.with_evidence(path.display().to_string()),
                            Err(err) => debug!(
                                target: "orchestrator",
                                site_id = %site.id,
                                criterion_id = %criterion.id,
                                error = %err,
                                "evidence capture failed"
                            ),
                        }
                    }
                }
                result
            }
            OutcomeKind::Unmeasurable => AuditResult::error(site.id, criterion.id, outcome.details),
        }
    }

    async fn emit(&self, summary: &mut RunSummary, result: AuditResult) {
        summary.count(result.verdict);
        if self
            .writer_tx
            .send(WriterMsg::Completed(result.clone()))
            .await
            .is_err()
        {
            error!(target: "orchestrator", "progress writer closed before run finished");
        }
        // the reporting consumer may hang up early; that is its business
        let _ = self.results_tx.send(result).await;
    }
}
