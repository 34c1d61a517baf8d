//! Weekly notification of the picked students
//!
//! ```text
//! RunOutcome + tasks ─▶ NotificationContext ─▶ TemplateRenderer
//!                    ─▶ EmailMessage ─▶ Notifier
//! ```
//!
//! Rendering and delivery failures are fatal for the process (exit 255),
//! but they happen after the roster has been persisted.

pub mod channels;
pub mod email;
pub mod template;

use chrono::NaiveDate;
use serde::Serialize;

use crate::scheduler::RunOutcome;

pub use channels::{ConsoleNotifier, ConsoleStream, DeliveryStatus, Notifier, SendmailNotifier};
pub use email::{is_valid_address, verify_addresses, EmailMessage};
pub use template::TemplateRenderer;

/// Data handed to the notification template
#[derive(Debug, Clone, Serialize)]
pub struct NotificationContext {
    /// Run date as `DD-MM-YYYY`
    pub date: String,
    /// Page with the full task list
    pub cleaning_url: String,
    /// Picked students
    pub students: Vec<String>,
    /// Tasks scraped from the task page, possibly empty
    pub cleaning_tasks: Vec<String>,
    /// The roster was rebuilt this run
    pub list_rotated: bool,
    /// Students left on the roster
    pub remaining: usize,
}

impl NotificationContext {
    /// Build the template data for a finished run
    pub fn from_outcome(
        outcome: &RunOutcome,
        date: NaiveDate,
        cleaning_url: impl Into<String>,
        cleaning_tasks: Vec<String>,
    ) -> Self {
        Self {
            date: format_date(date),
            cleaning_url: cleaning_url.into(),
            students: outcome.picked.clone(),
            cleaning_tasks,
            list_rotated: outcome.list_rotated(),
            remaining: outcome.remaining.len(),
        }
    }

    /// Subject line for the notification email
    pub fn subject(&self) -> String {
        format!("Cleaning schedule for the week of {}", self.date)
    }
}

/// Format a date the way the notification shows it
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}
