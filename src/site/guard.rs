//! Credential guard for outgoing requests
//!
//! Every request to the site carries HTTP basic auth, so a URL is only
//! fetched when it uses https and points at the configured domain.

use url::Url;

/// Decides whether credentials may be sent to a URL
#[derive(Debug, Clone)]
pub struct UrlGuard {
    allowed_domain: Option<String>,
    enforce_https: bool,
}

impl UrlGuard {
    /// Create a guard; `None` as domain accepts any host
    pub fn new(allowed_domain: Option<String>, enforce_https: bool) -> Self {
        Self {
            allowed_domain: allowed_domain.map(|d| d.to_lowercase()),
            enforce_https,
        }
    }

    /// Guard that lets everything through, for local test servers
    pub fn permissive() -> Self {
        Self::new(None, false)
    }

    /// Check a URL, logging the reason when it is refused
    pub fn allows(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!(
                    url = %url,
                    error = %e,
                    "Could not parse URL, are you using https://?"
                );
                return false;
            }
        };

        if self.enforce_https && parsed.scheme() != "https" {
            tracing::error!(
                url = %url,
                "URL does not use https, refusing to leak credentials"
            );
            return false;
        }

        let Some(domain) = &self.allowed_domain else {
            return true;
        };

        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        if host == *domain || host.ends_with(&format!(".{domain}")) {
            true
        } else {
            tracing::error!(
                url = %url,
                allowed_domain = %domain,
                "URL is not on the allowed domain, refusing to send credentials"
            );
            false
        }
    }
}
