//! Application configuration: one YAML file plus the API key from the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable holding the reasoning-service API key; never read
/// from the config file.
pub const API_KEY_ENV: &str = "SITEGAUGE_API_KEY";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub input: InputConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InputConfig {
    /// CSV catalog of sites to audit.
    pub sites_list: PathBuf,
    /// CSV catalog of criteria.
    pub criteria_list: PathBuf,
    /// Root directory of pre-extracted page captures.
    pub captures_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempt budget for rate-limited and timed-out semantic calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Cooldown imposed by upstream throttling, on top of backoff.
    #[serde(default = "default_rate_limit_cooldown_secs")]
    pub rate_limit_cooldown_secs: u64,
    /// Per-million-token prices used for the end-of-run cost estimate.
    #[serde(default = "default_input_price")]
    pub input_cost_per_mtok: f64,
    #[serde(default = "default_output_price")]
    pub output_cost_per_mtok: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_parallel_sites")]
    pub parallel_sites: usize,
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: u32,
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,
    #[serde(default = "default_capture_evidence")]
    pub capture_evidence: bool,
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_sites: default_parallel_sites(),
            checkpoint_interval: default_checkpoint_interval(),
            checkpoint_path: default_checkpoint_path(),
            capture_evidence: default_capture_evidence(),
            max_context_chars: default_max_context_chars(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.anthropic.com/v1".to_string()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    3
}
fn default_rate_limit_cooldown_secs() -> u64 {
    60
}
fn default_input_price() -> f64 {
    3.0
}
fn default_output_price() -> f64 {
    15.0
}
fn default_parallel_sites() -> usize {
    1
}
fn default_checkpoint_interval() -> u32 {
    1
}
fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("output/progress.json")
}
fn default_capture_evidence() -> bool {
    true
}
fn default_max_context_chars() -> usize {
    evaluator_semantic::DEFAULT_MAX_CONTEXT_CHARS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("config file not found: {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.model.trim().is_empty() {
            bail!("api.model must not be empty");
        }
        if self.processing.parallel_sites == 0 {
            bail!("processing.parallel_sites must be at least 1");
        }
        if self.processing.max_context_chars < 1_000 {
            bail!("processing.max_context_chars below 1000 starves semantic checks");
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> AppConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    const MINIMAL: &str = r#"
input:
  sites_list: data/sites.csv
  criteria_list: data/criteria.csv
  captures_dir: data/captures
api:
  model: claude-sonnet-4-20250514
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse(MINIMAL);
        config.validate().unwrap();
        assert_eq!(config.processing.parallel_sites, 1);
        assert_eq!(config.processing.checkpoint_interval, 1);
        assert_eq!(config.api.max_tokens, 1024);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_parallelism_is_rejected() {
        let mut config = parse(MINIMAL);
        config.processing.parallel_sites = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_model_is_rejected() {
        let mut config = parse(MINIMAL);
        config.api.model = " ".into();
        assert!(config.validate().is_err());
    }
}
