//! Delivery channels for the weekly notification

pub mod sendmail;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use super::email::EmailMessage;
use crate::error::{Error, Result};

pub use sendmail::SendmailNotifier;

/// Response from sending a notification
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryStatus {
    /// Channel that delivered the notification
    pub channel: String,
    /// Optional message about the delivery
    pub message: Option<String>,
    /// Timestamp of delivery
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DeliveryStatus {
    /// Create a delivery status
    pub fn delivered(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Create a delivery status with a message
    pub fn delivered_with_message(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::delivered(channel)
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[DELIVERED] {}", self.channel)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

/// Trait for notification channels
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &str;

    /// Deliver a composed message
    ///
    /// # Errors
    ///
    /// Returns `Error::Notify` when the message could not be handed over
    async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryStatus>;
}

/// Prints the rendered body instead of mailing it
pub struct ConsoleNotifier<W: Write + Send> {
    out: std::sync::Mutex<W>,
}

/// Standard stream the console notifier prints to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    /// Stdout unless it is reserved for the JSON run outcome
    pub fn for_output(json_on_stdout: bool) -> Self {
        if json_on_stdout {
            Self::Stderr
        } else {
            Self::Stdout
        }
    }
}

impl ConsoleNotifier<Box<dyn Write + Send>> {
    /// Print to a standard stream
    pub fn on(stream: ConsoleStream) -> Self {
        match stream {
            ConsoleStream::Stdout => Self::new(Box::new(std::io::stdout())),
            ConsoleStream::Stderr => Self::new(Box::new(std::io::stderr())),
        }
    }
}

impl<W: Write + Send> ConsoleNotifier<W> {
    /// Print to any writer
    pub fn new(out: W) -> Self {
        Self {
            out: std::sync::Mutex::new(out),
        }
    }

    /// Take back the writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryStatus> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::notify("console writer lock poisoned"))?;
        writeln!(out, "{}", message.html_body).map_err(|e| Error::notify(e.to_string()))?;
        out.flush().map_err(|e| Error::notify(e.to_string()))?;
        Ok(DeliveryStatus::delivered(self.name()))
    }
}
