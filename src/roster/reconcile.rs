//! Applying exclusions to a roster

use super::Roster;

/// Remove every name in `names` from `roster`
///
/// Repeated roster entries are collapsed first (first occurrence kept, each
/// dropped repeat logged), so the result is the set difference of roster and
/// exclusions in roster order. Names that are not on the roster are logged
/// and returned; they never abort the run.
pub fn remove_names<'a, I>(mut roster: Roster, names: I) -> (Roster, Vec<String>)
where
    I: IntoIterator<Item = &'a String>,
{
    for duplicate in roster.dedup() {
        tracing::warn!(student = %duplicate, "Student listed more than once, ignoring repeat");
    }

    let mut not_found = Vec::new();

    for name in names {
        if !roster.remove_first(name) {
            tracing::warn!(
                student = %name,
                "Tried to remove student from student list, but person was not present"
            );
            not_found.push(name.clone());
        }
    }

    (roster, not_found)
}
