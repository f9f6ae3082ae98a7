//! Page access over pre-extracted captures.
//!
//! A capture directory holds, per site host, the already-extracted metrics
//! and reduced-ready markup of one page visit:
//!
//! ```text
//! captures/
//!   ir.example.com/
//!     metrics.json
//!     page.html
//!     evidence/        # optional element screenshots
//! ```
//!
//! Extraction itself happens upstream; the engine only ever sees this
//! adapter or a live-browser implementation of the same trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use url::Url;

use page_adapter::{PageAccess, PageError, PageHandle, PageMetrics};

pub struct SnapshotPageAccess {
    root: PathBuf,
}

impl SnapshotPageAccess {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn site_dir(&self, url: &Url) -> Result<PathBuf, PageError> {
        let host = url
            .host_str()
            .ok_or_else(|| PageError::Internal(format!("url without host: {url}")))?;
        Ok(self.root.join(host))
    }

    fn read(&self, path: &Path) -> Result<String, PageError> {
        std::fs::read_to_string(path)
            .map_err(|err| PageError::Internal(format!("{}: {err}", path.display())))
    }
}

fn sanitize_selector(selector: &str) -> String {
    let sanitized: String = selector
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    sanitized.chars().take(50).collect()
}

#[async_trait]
impl PageAccess for SnapshotPageAccess {
    async fn open(&self, url: &Url) -> Result<PageHandle, PageError> {
        let dir = self.site_dir(url)?;
        if !dir.is_dir() {
            // no capture recorded for this site
            return Err(PageError::HttpStatus(404));
        }
        Ok(PageHandle::new(url.clone()))
    }

    async fn extract_metrics(&self, page: &PageHandle) -> Result<PageMetrics, PageError> {
        let path = self.site_dir(&page.url)?.join("metrics.json");
        let raw = self.read(&path)?;
        serde_json::from_str(&raw)
            .map_err(|err| PageError::Internal(format!("{}: {err}", path.display())))
    }

    async fn extract_content(&self, page: &PageHandle) -> Result<String, PageError> {
        let path = self.site_dir(&page.url)?.join("page.html");
        self.read(&path)
    }

    async fn capture_evidence(
        &self,
        page: &PageHandle,
        selector: &str,
    ) -> Result<PathBuf, PageError> {
        let path = self
            .site_dir(&page.url)?
            .join("evidence")
            .join(format!("{}.png", sanitize_selector(selector)));
        if path.is_file() {
            Ok(path)
        } else {
            Err(PageError::ElementMissing(selector.to_string()))
        }
    }

    async fn close(&self, _page: PageHandle) -> Result<(), PageError> {
        Ok(())
    }
}
