//! Roster lifecycle: sourcing, exclusion, reconciliation and persistence
//!
//! A [`Roster`] is built fresh for every run, either from the roster file or
//! from the website, and is written back at the end when the run changed it.
//! The file is the only state that survives between runs.

pub mod exclusion;
pub mod persist;
pub mod reconcile;
pub mod source;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub use exclusion::ExclusionResolver;
pub use persist::RosterPersister;
pub use reconcile::remove_names;
pub use source::RosterSource;

/// Where the working roster of this run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    /// Loaded from the roster file
    FromFile,
    /// Fetched from the website because the file was missing or too short
    FromRemote,
}

impl SourceOrigin {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FromFile => "file",
            Self::FromRemote => "remote",
        }
    }

    /// A remote roster replaces the file, so it always has to be written
    pub fn requires_write(&self) -> bool {
        matches!(self, Self::FromRemote)
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered list of candidate names
///
/// Order is discovery order. A source may repeat a name; reconciliation
/// collapses repeats with [`Roster::dedup`] before anything is excluded or
/// picked, so the working pool holds every name at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(Vec<String>);

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the roster has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in order
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Whether `name` is on the roster (exact, case-sensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Remove the first entry equal to `name`; `false` when absent
    pub fn remove_first(&mut self, name: &str) -> bool {
        match self.0.iter().position(|n| n == name) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop repeated names, keeping the first occurrence of each
    ///
    /// Returns the dropped entries in the order they were found.
    pub fn dedup(&mut self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dropped = Vec::new();
        self.0.retain(|name| {
            if seen.insert(name.clone()) {
                true
            } else {
                dropped.push(name.clone());
                false
            }
        });
        dropped
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl<'a> From<&'a [&'a str]> for Roster {
    fn from(names: &'a [&'a str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}
