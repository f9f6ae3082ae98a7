//! CSV catalog loading for sites and criteria.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use sitegauge_core_types::{
    validate_unique_criteria, validate_unique_sites, CheckKind, Criterion, CriterionId, Site,
};

#[derive(Debug, Deserialize)]
struct SiteRow {
    site_id: u32,
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CriterionRow {
    criterion_id: u32,
    category: String,
    subcategory: String,
    check_kind: String,
    evaluator_key: String,
    instruction: String,
}

pub fn load_sites(path: &Path) -> Result<Vec<Site>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("sites catalog not found: {}", path.display()))?;
    let mut sites = Vec::new();
    for row in reader.deserialize::<SiteRow>() {
        let row = row.context("malformed sites catalog row")?;
        let site = Site::new(row.site_id, row.name, &row.url)
            .with_context(|| format!("invalid site {}", row.site_id))?;
        sites.push(site);
    }
    validate_unique_sites(&sites)?;
    Ok(sites)
}

pub fn load_criteria(path: &Path) -> Result<Vec<Criterion>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("criteria catalog not found: {}", path.display()))?;
    let mut criteria = Vec::new();
    for row in reader.deserialize::<CriterionRow>() {
        let row = row.context("malformed criteria catalog row")?;
        let check_kind: CheckKind = row
            .check_kind
            .parse()
            .with_context(|| format!("invalid criterion {}", row.criterion_id))?;
        criteria.push(Criterion {
            id: CriterionId(row.criterion_id),
            category: row.category,
            subcategory: row.subcategory,
            check_kind,
            evaluator_key: row.evaluator_key,
            instruction: row.instruction,
        });
    }
    validate_unique_criteria(&criteria)?;
    Ok(criteria)
}
