//! Remote collaborator: the course website
//!
//! The website is the fallback source of the roster and the only source of
//! the cleaning task list. Both are reached through [`StudentDirectory`] so
//! the scheduling core never depends on HTTP directly.

pub mod client;
pub mod extract;
pub mod guard;

use async_trait::async_trait;

use crate::error::Result;

pub use client::SiteClient;
pub use extract::{extract_elements, StudentExtractor};
pub use guard::UrlGuard;

/// Source of student names and page elements
///
/// An empty `Vec` means "nothing usable this time" and is retried by the
/// caller exactly like an error.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// List every student of the configured year
    async fn list_students(&self) -> Result<Vec<String>>;

    /// Text of every element matching `selector` on the page at `url`
    async fn list_elements(&self, url: &str, selector: &str) -> Result<Vec<String>>;
}
