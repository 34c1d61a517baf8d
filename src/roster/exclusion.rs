//! Names the operator asked to leave out of this run

use std::collections::BTreeSet;
use std::path::Path;

use crate::utils::read_lines;

/// Resolves the exclusion list from the command line or a file
#[derive(Debug, Default, Clone, Copy)]
pub struct ExclusionResolver;

impl ExclusionResolver {
    /// Create a resolver
    pub fn new() -> Self {
        Self
    }

    /// Resolve the set of names to exclude
    ///
    /// A file that cannot be read is logged and treated as an empty list; a
    /// bad exclude file never blocks the run. The command line keeps the two
    /// inputs mutually exclusive; should both arrive anyway the file wins.
    pub fn resolve(&self, names: Option<&[String]>, file: Option<&Path>) -> BTreeSet<String> {
        if let Some(path) = file {
            if names.is_some_and(|n| !n.is_empty()) {
                tracing::warn!(
                    "Both an exclude list and an exclude file were given, using the file"
                );
            }

            return match read_lines(path) {
                Ok(lines) => {
                    tracing::info!(path = %path.display(), "Excluding students from file");
                    let excluded: BTreeSet<String> = lines.into_iter().collect();
                    tracing::debug!(students = ?excluded, "Students to exclude");
                    excluded
                }
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        "Not a valid exclude file, ignoring"
                    );
                    BTreeSet::new()
                }
            };
        }

        match names {
            Some(names) if !names.is_empty() => {
                let excluded: BTreeSet<String> = names.iter().cloned().collect();
                tracing::info!(students = ?excluded, "Students to exclude");
                excluded
            }
            _ => {
                tracing::debug!("No students to exclude");
                BTreeSet::new()
            }
        }
    }
}
