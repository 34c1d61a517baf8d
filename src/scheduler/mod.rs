//! Scheduling a cleaning duty run
//!
//! One run is a straight pipeline:
//!
//! ```text
//! obtain roster ─▶ resolve exclusions ─▶ dedup + remove excluded
//!               ─▶ pick ─▶ remove picked ─▶ persist
//! ```
//!
//! Only two conditions abort it: no students at all, and a pick count larger
//! than the eligible pool. Both are raised before the roster file is touched.
//! Everything else is logged and recorded in the [`RunOutcome`].

pub mod selector;
pub mod tasks;

use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::roster::{
    remove_names, ExclusionResolver, Roster, RosterPersister, RosterSource, SourceOrigin,
};
use crate::site::StudentDirectory;
use crate::utils::retry::RetryPolicy;

pub use tasks::fetch_cleaning_tasks;

/// Inputs of a single run
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Roster file to read from and write back to
    pub roster_path: PathBuf,

    /// Number of students to pick; also the minimum the roster file must hold
    pub pick_count: usize,

    /// Leave picked students on the roster
    pub keep_picked: bool,

    /// Names to exclude, given directly
    pub excluded_names: Option<Vec<String>>,

    /// File with names to exclude
    pub excluded_file: Option<PathBuf>,
}

impl RunRequest {
    /// Request picking `pick_count` students from the roster at `roster_path`
    pub fn new(roster_path: impl Into<PathBuf>, pick_count: usize) -> Self {
        Self {
            roster_path: roster_path.into(),
            pick_count,
            keep_picked: false,
            excluded_names: None,
            excluded_file: None,
        }
    }

    /// Keep picked students on the roster
    pub fn keep_picked(mut self, keep: bool) -> Self {
        self.keep_picked = keep;
        self
    }

    /// Exclude these names
    pub fn exclude_names(mut self, names: Vec<String>) -> Self {
        self.excluded_names = Some(names);
        self
    }

    /// Exclude the names listed in this file
    pub fn exclude_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded_file = Some(path.into());
        self
    }
}

/// Why a name could not be taken off the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Excluded name that is not on the roster
    NotInRoster,
    /// Picked name that could not be removed from the pool
    RemovalFailed,
}

/// A name that failed to exclude or remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameFailure {
    pub name: String,
    pub reason: FailureReason,
}

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Picked students, in sampling order
    pub picked: Vec<String>,

    /// Roster after exclusions and, unless kept, picked removal
    pub remaining: Roster,

    /// Where the roster came from
    pub origin: SourceOrigin,

    /// Whether the roster file was (re)written
    pub written: bool,

    /// Names that could not be excluded or removed
    pub failures: Vec<NameFailure>,
}

impl RunOutcome {
    /// The roster was rebuilt from the website this run
    pub fn list_rotated(&self) -> bool {
        self.origin == SourceOrigin::FromRemote
    }
}

/// Sequences roster sourcing, exclusion, selection and persistence
pub struct ScheduleOrchestrator<'a> {
    directory: &'a dyn StudentDirectory,
    retry: RetryPolicy,
}

impl<'a> ScheduleOrchestrator<'a> {
    /// Create an orchestrator using `directory` as the remote roster
    pub fn new(directory: &'a dyn StudentDirectory, retry: RetryPolicy) -> Self {
        Self { directory, retry }
    }

    /// Execute one run
    ///
    /// # Errors
    ///
    /// Returns `Error::NoRosterAvailable` when neither file nor website
    /// yields a student, and `Error::InsufficientPool` when fewer eligible
    /// students remain than requested. The roster file is untouched in
    /// both cases.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        request: &RunRequest,
        rng: &mut R,
    ) -> Result<RunOutcome> {
        let source = RosterSource::new(self.directory, self.retry.clone());
        let (roster, origin) = source.obtain(&request.roster_path, request.pick_count).await;

        if roster.is_empty() {
            tracing::error!("Could not find any students");
            return Err(Error::NoRosterAvailable);
        }
        tracing::debug!(origin = %origin, students = ?roster.names(), "Found student list");

        let excluded = ExclusionResolver::new().resolve(
            request.excluded_names.as_deref(),
            request.excluded_file.as_deref(),
        );
        let (mut pool, not_found) = remove_names(roster, &excluded);
        let mut failures: Vec<NameFailure> = not_found
            .into_iter()
            .map(|name| NameFailure {
                name,
                reason: FailureReason::NotInRoster,
            })
            .collect();

        if pool.is_empty() {
            tracing::error!("Every student was excluded, nobody left to pick");
            return Err(Error::InsufficientPool {
                requested: request.pick_count,
                available: 0,
            });
        }

        tracing::info!(count = request.pick_count, pool = pool.len(), "Picking students from list");
        let picked = selector::pick(&pool, request.pick_count, rng).inspect_err(|e| {
            tracing::error!(error = %e, "Cannot pick students");
        })?;
        tracing::debug!(students = ?picked, "Picked students");

        if !request.keep_picked {
            failures.extend(
                selector::remove_picked(&mut pool, &picked)
                    .into_iter()
                    .map(|name| NameFailure {
                        name,
                        reason: FailureReason::RemovalFailed,
                    }),
            );
        }

        let written = RosterPersister::new(&request.roster_path).maybe_write(
            &pool,
            origin,
            request.keep_picked,
        );

        Ok(RunOutcome {
            picked,
            remaining: pool,
            origin,
            written,
            failures,
        })
    }
}
