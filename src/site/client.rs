//! Authenticated HTTP client for the course website
//!
//! Every page is fetched with HTTP basic auth. Before a request is sent the
//! URL passes through a [`UrlGuard`] so credentials never leave the site.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client,
};

use super::extract::{extract_elements, StudentExtractor};
use super::guard::UrlGuard;
use super::StudentDirectory;
use crate::config::SiteConfig;
use crate::error::{Error, Result};

/// Course website client
pub struct SiteClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    user: String,
    password: String,

    /// Year overview page
    start_url: String,

    guard: UrlGuard,
    students: StudentExtractor,
}

impl SiteClient {
    /// Create a client from the site configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when credentials are missing and
    /// `Error::Http` if the HTTP client cannot be created
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let user = config
            .user
            .clone()
            .ok_or_else(|| Error::config("site user is not set"))?;
        let password = config
            .password
            .clone()
            .ok_or_else(|| Error::config("site password is not set"))?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(format!("cleaning-schedule/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(Self::default_headers())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            user,
            password,
            start_url: config.start_url(),
            guard: UrlGuard::new(config.allowed_domain.clone(), config.enforce_https),
            students: StudentExtractor::new(
                config.student_link_marker(),
                config.include_playground,
            ),
        })
    }

    /// Replace the URL guard, e.g. to talk to a local mock server
    pub fn with_guard(mut self, guard: UrlGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Year overview page this client reads students from
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// GET a page with basic auth
    ///
    /// Returns `Ok(None)` when the guard refuses the URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` on transport errors and non-success statuses
    pub async fn get_page(&self, url: &str) -> Result<Option<String>> {
        if !self.guard.allows(url) {
            return Ok(None);
        }

        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;

        Ok(Some(response.text().await?))
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8,nl;q=0.7"));
        headers
    }
}

#[async_trait]
impl StudentDirectory for SiteClient {
    async fn list_students(&self) -> Result<Vec<String>> {
        let Some(page) = self.get_page(&self.start_url).await? else {
            return Ok(Vec::new());
        };
        Ok(self.students.extract(&page))
    }

    async fn list_elements(&self, url: &str, selector: &str) -> Result<Vec<String>> {
        match self.get_page(url).await? {
            Some(page) if !page.trim().is_empty() => extract_elements(&page, selector),
            _ => {
                tracing::warn!(url = %url, "Webpage call returned nothing to search for");
                Ok(Vec::new())
            }
        }
    }
}
