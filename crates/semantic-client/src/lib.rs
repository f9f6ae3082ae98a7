//! Hosted-reasoning service boundary.
//!
//! The engine talks to whatever answers semantic judgments through the
//! [`SemanticClient`] trait and receives classified failures, never untyped
//! ones. A production implementation for the Anthropic messages API lives in
//! [`anthropic`]; tests substitute stubs.

pub mod anthropic;
mod errors;
mod usage;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use errors::SemanticError;
pub use usage::{Usage, UsageCounters};

use async_trait::async_trait;

/// Sends a prompt plus page context to the reasoning service and returns
/// the raw response text.
#[async_trait]
pub trait SemanticClient: Send + Sync {
    async fn send(&self, prompt: &str, context: &str) -> Result<String, SemanticError>;

    /// Cumulative usage across all calls made through this client.
    fn usage(&self) -> Usage {
        Usage::default()
    }
}
