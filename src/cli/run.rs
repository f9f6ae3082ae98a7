use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use progress_store::JsonProgressStore;
use retry_gate::RetryPolicy;
use semantic_client::{AnthropicClient, AnthropicConfig, SemanticClient};
use sitegauge_core_types::{AuditResult, Verdict};
use sitegauge_orchestrator::{Orchestrator, RunOptions};

use crate::catalog;
use crate::config::{AppConfig, API_KEY_ENV};
use crate::snapshot::SnapshotPageAccess;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
    /// Override the configured number of concurrent site workers
    #[arg(long)]
    pub parallel: Option<usize>,
}

pub async fn cmd_run(args: &RunArgs) -> Result<()> {
    let config = AppConfig::load(&args.config)?;
    super::init_logging(&config.logging.level)?;

    let api_key = std::env::var(API_KEY_ENV)
        .with_context(|| format!("{API_KEY_ENV} must be set for semantic checks"))?;

    let sites = catalog::load_sites(&config.input.sites_list)?;
    let criteria = catalog::load_criteria(&config.input.criteria_list)?;
    info!(
        sites = sites.len(),
        criteria = criteria.len(),
        total_checks = sites.len() * criteria.len(),
        "catalogs loaded"
    );

    let client = Arc::new(AnthropicClient::new(AnthropicConfig {
        api_key,
        model: config.api.model.clone(),
        api_base: config.api.api_base.clone(),
        max_tokens: config.api.max_tokens,
        timeout: config.api_timeout(),
    })?);
    let page_access = Arc::new(SnapshotPageAccess::new(&config.input.captures_dir));
    let store = JsonProgressStore::new(&config.processing.checkpoint_path);
    let options = RunOptions {
        parallel_sites: args.parallel.unwrap_or(config.processing.parallel_sites),
        checkpoint_interval: config.processing.checkpoint_interval,
        capture_evidence: config.processing.capture_evidence,
        max_context_chars: config.processing.max_context_chars,
        semantic_retry: RetryPolicy {
            max_attempts: config.api.max_retries,
            rate_limit_cooldown: Duration::from_secs(config.api.rate_limit_cooldown_secs),
            ..RetryPolicy::semantic()
        },
        ..RunOptions::default()
    };

    let orchestrator = Orchestrator::new(
        page_access,
        Arc::clone(&client) as Arc<dyn SemanticClient>,
        store,
        options,
    );

    let cancel = orchestrator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("stop requested; finishing the current evaluation before exiting");
            cancel.cancel();
        }
    });

    let (results_tx, mut results_rx) = mpsc::channel::<AuditResult>(256);
    let reporter = tokio::spawn(async move {
        while let Some(result) = results_rx.recv().await {
            match result.verdict {
                Verdict::Pass => info!(
                    target: "report",
                    site_id = %result.site_id,
                    criterion_id = %result.criterion_id,
                    confidence = result.confidence,
                    details = %result.details,
                    "PASS"
                ),
                Verdict::Fail => warn!(
                    target: "report",
                    site_id = %result.site_id,
                    criterion_id = %result.criterion_id,
                    confidence = result.confidence,
                    details = %result.details,
                    "FAIL"
                ),
                Verdict::NotSupported => info!(
                    target: "report",
                    site_id = %result.site_id,
                    criterion_id = %result.criterion_id,
                    details = %result.details,
                    "NOT_SUPPORTED"
                ),
                Verdict::Error => error!(
                    target: "report",
                    site_id = %result.site_id,
                    criterion_id = %result.criterion_id,
                    details = %result.details,
                    "ERROR"
                ),
            }
        }
    });

    let summary = orchestrator.run(&sites, &criteria, results_tx).await?;
    reporter.await.ok();

    // ERROR and NOT_SUPPORTED stay out of the pass/fail rate
    info!(
        pass = summary.pass,
        fail = summary.fail,
        error = summary.error,
        not_supported = summary.not_supported,
        skipped = summary.skipped,
        "run summary"
    );
    let usage = client.usage();
    info!(
        calls = usage.calls,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        estimated_cost_usd = %format!(
            "{:.4}",
            usage.estimated_cost_usd(
                config.api.input_cost_per_mtok,
                config.api.output_cost_per_mtok
            )
        ),
        "semantic service usage"
    );
    if summary.cancelled {
        warn!("run cancelled; re-run with the same checkpoint to resume");
    }
    Ok(())
}
