//! Roster sourcing: roster file first, website as fallback

use std::path::Path;

use super::{Roster, SourceOrigin};
use crate::site::StudentDirectory;
use crate::utils::read_lines;
use crate::utils::retry::{fetch_with_retry, RetryPolicy};

/// Obtains the working roster for a run
pub struct RosterSource<'a> {
    directory: &'a dyn StudentDirectory,
    retry: RetryPolicy,
}

impl<'a> RosterSource<'a> {
    /// Create a source backed by `directory` for remote fetches
    pub fn new(directory: &'a dyn StudentDirectory, retry: RetryPolicy) -> Self {
        Self { directory, retry }
    }

    /// Load the roster file, or fetch from the website when it falls short
    ///
    /// The file is used when it can be read and holds at least
    /// `minimum_required` names. Otherwise the website is queried with the
    /// configured number of attempts. An empty roster tagged
    /// [`SourceOrigin::FromRemote`] means every attempt failed.
    pub async fn obtain(&self, path: &Path, minimum_required: usize) -> (Roster, SourceOrigin) {
        if path.is_file() {
            tracing::info!(path = %path.display(), "Found roster file, retrieving student list");
            match read_lines(path) {
                Ok(names) if names.len() >= minimum_required => {
                    tracing::debug!(count = names.len(), "Loaded roster from file");
                    return (Roster::from(names), SourceOrigin::FromFile);
                }
                Ok(names) => {
                    tracing::info!(
                        path = %path.display(),
                        count = names.len(),
                        minimum_required = minimum_required,
                        "Roster file holds too few students, getting student list from the website"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Could not read roster file, getting student list from the website"
                    );
                }
            }
        } else {
            tracing::info!(
                path = %path.display(),
                "Roster file does not exist, getting student list from the website"
            );
        }

        let names = fetch_with_retry(&self.retry, "list of students", || {
            self.directory.list_students()
        })
        .await;

        (Roster::from(names), SourceOrigin::FromRemote)
    }
}
