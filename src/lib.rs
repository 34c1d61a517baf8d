//! cleaning-schedule - randomized cleaning duty picker
//!
//! Picks a few students from a roster for this week's cleaning duty, keeps
//! track of who is still due in a flat roster file, and mails the group.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`roster`] - Roster sourcing, exclusions and persistence
//! - [`scheduler`] - Selection and the run pipeline
//! - [`site`] - Course website client and HTML extraction
//! - [`notifications`] - Template rendering and delivery
//! - [`utils`] - Line files and bounded retry
//!
//! # Example
//!
//! ```no_run
//! use cleaning_schedule::config::Config;
//! use cleaning_schedule::scheduler::{RunRequest, ScheduleOrchestrator};
//! use cleaning_schedule::site::SiteClient;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SiteClient::new(&config.site)?;
//!     let orchestrator = ScheduleOrchestrator::new(&client, config.retry.clone());
//!     let request = RunRequest::new("students.txt", 2);
//!     let outcome = orchestrator.run(&request, &mut rand::thread_rng()).await?;
//!     println!("{:?}", outcome.picked);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod notifications;
pub mod roster;
pub mod scheduler;
pub mod site;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::roster::{Roster, SourceOrigin};
    pub use crate::scheduler::{RunOutcome, RunRequest, ScheduleOrchestrator};
    pub use crate::site::{SiteClient, StudentDirectory};
}

pub use roster::{Roster, SourceOrigin};
pub use scheduler::{RunOutcome, RunRequest};
