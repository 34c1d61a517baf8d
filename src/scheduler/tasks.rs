//! Cleaning task list shown next to the picked students

use crate::site::StudentDirectory;
use crate::utils::retry::{fetch_with_retry, RetryPolicy};

/// Fetch the cleaning tasks from the task page
///
/// Uses the same bounded retry as the roster fetch. An empty list is not
/// fatal: the notification simply goes out without tasks.
pub async fn fetch_cleaning_tasks(
    directory: &dyn StudentDirectory,
    retry: &RetryPolicy,
    url: &str,
    selector: &str,
) -> Vec<String> {
    let tasks = fetch_with_retry(retry, "list of cleaning tasks", || {
        directory.list_elements(url, selector)
    })
    .await;

    if tasks.is_empty() {
        tracing::error!(url = %url, "Could not find any cleaning tasks");
        tracing::warn!("Assuming the task page is broken, continuing with empty task list");
    } else {
        tracing::debug!(tasks = ?tasks, "Found cleaning tasks");
    }

    tasks
}
