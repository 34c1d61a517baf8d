//! Unified error handling for the cleaning schedule
//!
//! Only a handful of conditions ever abort a run. Everything else (a bad
//! exclude file, a name that is not on the roster, a failed roster write) is
//! logged where it happens and the run carries on, so those never surface
//! here.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum returned by every fallible operation
//!
//! # Usage
//!
//! ```rust,ignore
//! use cleaning_schedule::error::Error;
//!
//! fn finish(err: Error) -> std::process::ExitCode {
//!     tracing::error!(category = %err.category(), "{err}");
//!     err.exit_code()
//! }
//! ```

use std::fmt;
use std::io;
use std::process::ExitCode;
use thiserror::Error;

/// Exit code used when no students could be obtained at all
pub const EXIT_NO_STUDENTS: u8 = 10;

/// Exit code used for template rendering and notification delivery failures
pub const EXIT_NOTIFY_FAILED: u8 = 255;

/// Exit code for every other fatal condition
pub const EXIT_FAILURE: u8 = 1;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Roster could not be obtained or is too small
    Roster,
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Storage and I/O errors
    Storage,
    /// Template rendering and message delivery
    Notification,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Notification => "notification",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the cleaning schedule
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the roster file nor the remote site produced any student
    #[error("No roster available: could not find any students")]
    NoRosterAvailable,

    /// More students were requested than the eligible pool holds
    #[error("Cannot pick {requested} students from a pool of {available}")]
    InsufficientPool { requested: usize, available: usize },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Template registration or rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// Notification could not be delivered
    #[error("Notification error: {0}")]
    Notify(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a notification delivery error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoRosterAvailable | Self::InsufficientPool { .. } => ErrorCategory::Roster,
            Self::Http(_) => ErrorCategory::Network,
            Self::Io(_) => ErrorCategory::Storage,
            Self::Template(_) | Self::Notify(_) => ErrorCategory::Notification,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether this error must abort the run
    ///
    /// Network and I/O errors are absorbed by the retry helper and the
    /// persister respectively; they only abort when they escape those.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Http(_) | Self::Io(_))
    }

    /// Numeric exit status for this error
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::NoRosterAvailable => EXIT_NO_STUDENTS,
            Self::Template(_) | Self::Notify(_) => EXIT_NOTIFY_FAILED,
            _ => EXIT_FAILURE,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
