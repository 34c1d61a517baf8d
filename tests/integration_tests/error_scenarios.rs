//! Error scenario tests
//!
//! Tests for the conditions that abort a run and for the failures that are
//! only logged.

use cleaning_schedule::error::{Error, EXIT_FAILURE, EXIT_NO_STUDENTS};
use cleaning_schedule::scheduler::{RunRequest, ScheduleOrchestrator};
use cleaning_schedule::utils::retry::RetryPolicy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::fixtures::{RosterDir, FOUR_STUDENTS};
use crate::common::{names, ScriptedDirectory};

// ============================================================================
// Aborting errors
// ============================================================================

#[tokio::test]
async fn test_no_roster_anywhere() {
    let dir = RosterDir::new();
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::new(3));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = orchestrator
        .run(&RunRequest::new(dir.roster_path(), 2), &mut rng)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoRosterAvailable));
    assert_eq!(err.exit_status(), EXIT_NO_STUDENTS);
    assert_eq!(website.student_calls(), 3);
    assert!(!dir.roster_path().exists());
}

#[tokio::test]
async fn test_pick_more_than_available() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Bob", "Carol"]);
    let before = std::fs::read_to_string(&path).unwrap();
    // Too short for 5, so the website is asked and returns the same three
    let website = ScriptedDirectory::always(&["Alice", "Bob", "Carol"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = orchestrator
        .run(&RunRequest::new(&path, 5), &mut rng)
        .await
        .unwrap_err();

    match &err {
        Error::InsufficientPool { requested, available } => {
            assert_eq!(*requested, 5);
            assert_eq!(*available, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_status(), EXIT_FAILURE);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_everyone_excluded() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Bob"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 1).exclude_names(names(&["Alice", "Bob"]));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = orchestrator.run(&request, &mut rng).await.unwrap_err();

    assert!(matches!(err, Error::InsufficientPool { available: 0, .. }));
    assert_eq!(dir.read_roster(), vec!["Alice", "Bob"]);
}

// ============================================================================
// Logged failures
// ============================================================================

#[tokio::test]
async fn test_unreadable_exclusion_file_is_ignored() {
    let dir = RosterDir::new();
    let path = dir.write_roster(FOUR_STUDENTS);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 2).exclude_file(dir.dir.path().join("missing.txt"));
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert_eq!(outcome.picked.len(), 2);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.remaining.len(), 2);
}

#[tokio::test]
async fn test_unwritable_roster_does_not_abort() {
    let dir = RosterDir::new();
    let path = dir.dir.path().join("no-such-dir").join("students.txt");
    let website = ScriptedDirectory::always(&["Henk Slaaf", "Jarno Jaapsen", "Piet Paulusma"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let outcome = orchestrator.run(&RunRequest::new(&path, 2), &mut rng).await.unwrap();

    assert_eq!(outcome.picked.len(), 2);
    assert!(!outcome.written);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_retries_exhausted_with_partial_file() {
    let dir = RosterDir::new();
    // One name is too few for two picks and the website stays empty
    dir.write_roster(&["Alice"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::new(2));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = orchestrator
        .run(&RunRequest::new(dir.roster_path(), 2), &mut rng)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoRosterAvailable));
    assert_eq!(website.student_calls(), 2);
    assert_eq!(dir.read_roster(), vec!["Alice"]);
}
