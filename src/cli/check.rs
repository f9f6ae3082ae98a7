use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use sitegauge_registry::CriterionRegistry;

use crate::catalog;
use crate::config::AppConfig;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

/// Validate config and catalogs without touching any page or service:
/// surfaces unknown evaluator keys before an hours-long run starts.
pub fn cmd_check(args: &CheckArgs) -> Result<()> {
    let config = AppConfig::load(&args.config)?;
    super::init_logging(&config.logging.level)?;

    let sites = catalog::load_sites(&config.input.sites_list)?;
    let criteria = catalog::load_criteria(&config.input.criteria_list)?;
    let registry = CriterionRegistry::build(&criteria)?;

    info!(
        sites = sites.len(),
        criteria = registry.len(),
        "config and catalogs are consistent"
    );
    Ok(())
}
