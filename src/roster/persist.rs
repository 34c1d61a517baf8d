//! Writing the remaining roster back to disk

use std::path::{Path, PathBuf};

use super::{Roster, SourceOrigin};
use crate::utils::write_lines;

/// Decides whether the roster file must be (re)written and writes it
#[derive(Debug, Clone)]
pub struct RosterPersister {
    path: PathBuf,
}

impl RosterPersister {
    /// Create a persister for the roster file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Roster file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A roster fetched this run replaces the file; removing picked
    /// students changes it. Anything else leaves it alone.
    pub fn should_write(origin: SourceOrigin, keep_picked: bool) -> bool {
        origin.requires_write() || !keep_picked
    }

    /// Write the roster when [`Self::should_write`] says so
    ///
    /// Returns whether the file was written. A failed write is logged and
    /// reported as `false`; the selection of this run stays valid.
    pub fn maybe_write(&self, roster: &Roster, origin: SourceOrigin, keep_picked: bool) -> bool {
        if !Self::should_write(origin, keep_picked) {
            tracing::debug!("Roster unchanged, not writing roster file");
            return false;
        }

        tracing::info!(
            path = %self.path.display(),
            count = roster.len(),
            "Writing list of remaining students"
        );

        match write_lines(&self.path, roster.names()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not write students to roster file"
                );
                false
            }
        }
    }
}
