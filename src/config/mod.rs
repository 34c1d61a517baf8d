//! Configuration management for the cleaning schedule
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command-line flags are applied last by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::retry::RetryPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Course website configuration
    pub site: SiteConfig,

    /// Retry policy for remote fetches
    pub retry: RetryPolicy,

    /// Selection configuration
    pub schedule: ScheduleConfig,

    /// Notification configuration
    pub mail: MailConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Course website configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the site, without trailing slash
    pub base_url: String,

    /// Academic year used in every site path (e.g. `2018-2019`)
    pub year: String,

    /// HTTP basic auth user
    pub user: Option<String>,

    /// HTTP basic auth password
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Only send credentials to this domain and its subdomains
    pub allowed_domain: Option<String>,

    /// Refuse to send credentials over plain HTTP
    pub enforce_https: bool,

    /// Keep the "Playground" entry that the site lists among the students
    pub include_playground: bool,

    /// CSS selector for the cleaning task items
    pub task_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://www.os3.nl"),
            year: String::from("2018-2019"),
            user: None,
            password: None,
            request_timeout_secs: 30,
            allowed_domain: Some(String::from("os3.nl")),
            enforce_https: true,
            include_playground: false,
            task_selector: String::from("li.level1"),
        }
    }
}

impl SiteConfig {
    /// Year overview page that links every student
    pub fn start_url(&self) -> String {
        format!("{}/{}/start", self.base_url, self.year)
    }

    /// Page listing the weekly cleaning tasks
    pub fn cleaning_tasks_url(&self) -> String {
        format!("{}/{}/students/playground/cleaning", self.base_url, self.year)
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Href fragment that marks a link as a student page
    pub fn student_link_marker(&self) -> String {
        format!("/{}/students", self.year)
    }
}

/// Selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Number of students to pick per run
    pub pick_count: usize,

    /// Leave picked students on the roster
    pub keep_picked: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            pick_count: 2,
            keep_picked: false,
        }
    }
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Sender address
    pub from_address: String,

    /// Custom Handlebars template replacing the built-in one
    pub template_path: Option<PathBuf>,

    /// Sendmail-compatible command that reads a message on stdin
    pub sendmail_command: Vec<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: String::from("cleaning-schedule@os3.nl"),
            template_path: None,
            sendmail_command: vec![
                String::from("sendmail"),
                String::from("-t"),
                String::from("-i"),
            ],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load an optional file, then apply the environment on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CLEANING_SITE_URL") {
            self.site.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(year) = std::env::var("CLEANING_YEAR") {
            self.site.year = year;
        }
        if let Ok(user) = std::env::var("SITE_USER") {
            self.site.user = Some(user);
        }
        if let Ok(password) = std::env::var("SITE_PASS") {
            self.site.password = Some(password);
        }
        if let Some(timeout) = std::env::var("CLEANING_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.site.request_timeout_secs = timeout;
        }
        if let Some(attempts) = std::env::var("CLEANING_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.retry.max_attempts = attempts;
        }
        if let Ok(level) = std::env::var("CLEANING_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CLEANING_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be greater than 0");
        }

        if self.retry.max_attempts > 10 {
            anyhow::bail!("retry.max_attempts must not exceed 10");
        }

        if self.site.request_timeout_secs == 0 {
            anyhow::bail!("site.request_timeout_secs must be greater than 0");
        }

        if self.schedule.pick_count == 0 {
            anyhow::bail!("schedule.pick_count must be greater than 0");
        }

        if self.site.user.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("No user given and $SITE_USER not set");
        }

        if self.site.password.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("No password given and $SITE_PASS not set");
        }

        Ok(())
    }
}
