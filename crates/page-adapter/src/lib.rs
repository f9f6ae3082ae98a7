//! Page access boundary for the audit engine.
//!
//! This crate hosts the trait the orchestrator drives to obtain pages and
//! already-extracted metrics. Concrete browser integrations live behind it;
//! the engine itself never touches a DOM. Tests implement in-memory fakes
//! against the same trait.

mod errors;
mod model;

pub use errors::PageError;
pub use model::{
    CarouselMetrics, ContrastSample, CoverageAspect, CoverageCount, PageMetrics, Rgb, Viewport,
};

use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

/// Opaque handle to one open page. Handles are not safely shared across
/// concurrent evaluations; each site worker owns its own.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PageHandle {
    pub id: PageId,
    pub url: Url,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PageId(pub Uuid);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl PageHandle {
    pub fn new(url: Url) -> Self {
        Self {
            id: PageId::new(),
            url,
        }
    }
}

/// What the engine consumes from a page-access implementation.
#[async_trait]
pub trait PageAccess: Send + Sync {
    /// Navigate to the URL and return a handle once the page settled.
    async fn open(&self, url: &Url) -> Result<PageHandle, PageError>;

    /// Extract the structural/visual metrics the deterministic checks need.
    async fn extract_metrics(&self, page: &PageHandle) -> Result<PageMetrics, PageError>;

    /// Raw markup of the page, input to the semantic content reducer.
    async fn extract_content(&self, page: &PageHandle) -> Result<String, PageError>;

    /// Screenshot the element matching `selector`; returns the stored path.
    async fn capture_evidence(
        &self,
        page: &PageHandle,
        selector: &str,
    ) -> Result<PathBuf, PageError>;

    async fn close(&self, page: PageHandle) -> Result<(), PageError>;
}
