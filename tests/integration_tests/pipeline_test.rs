//! End-to-end run pipeline tests
//!
//! Covers the complete flow:
//! 1. Obtain the roster from file or website
//! 2. Apply exclusions
//! 3. Pick and remove students
//! 4. Persist the remaining roster

use cleaning_schedule::error::Error;
use cleaning_schedule::notifications::{NotificationContext, TemplateRenderer};
use cleaning_schedule::roster::SourceOrigin;
use cleaning_schedule::scheduler::{
    fetch_cleaning_tasks, FailureReason, RunRequest, ScheduleOrchestrator,
};
use cleaning_schedule::utils::retry::RetryPolicy;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::fixtures::{RosterDir, FOUR_STUDENTS};
use crate::common::{names, ScriptedDirectory};

// ============================================================================
// Roster from file
// ============================================================================

#[tokio::test]
async fn test_pick_from_file_rewrites_remaining() {
    let dir = RosterDir::new();
    let path = dir.write_roster(FOUR_STUDENTS);
    let website = ScriptedDirectory::always(&["Nobody"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert_eq!(outcome.picked.len(), 2);
    assert_ne!(outcome.picked[0], outcome.picked[1]);
    assert_eq!(outcome.origin, SourceOrigin::FromFile);
    assert!(outcome.written);
    assert!(outcome.failures.is_empty());
    assert_eq!(website.student_calls(), 0);

    let on_disk = dir.read_roster();
    assert_eq!(on_disk.len(), 2);
    for name in &outcome.picked {
        assert!(!on_disk.contains(name));
    }
    // Remaining students keep their file order
    let expected: Vec<String> = names(FOUR_STUDENTS)
        .into_iter()
        .filter(|n| !outcome.picked.contains(n))
        .collect();
    assert_eq!(on_disk, expected);
    assert_eq!(outcome.remaining.names(), expected.as_slice());
}

#[tokio::test]
async fn test_keep_picked_leaves_file_untouched() {
    let dir = RosterDir::new();
    let path = dir.write_roster(FOUR_STUDENTS);
    let before = std::fs::read_to_string(&path).unwrap();
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 2).keep_picked(true);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert_eq!(outcome.picked.len(), 2);
    assert!(!outcome.written);
    assert_eq!(outcome.remaining.len(), 4);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_same_seed_same_pick() {
    let first_dir = RosterDir::new();
    let second_dir = RosterDir::new();
    let website = ScriptedDirectory::always(&[]);
    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());

    let first = orchestrator
        .run(
            &RunRequest::new(first_dir.write_roster(FOUR_STUDENTS), 2),
            &mut ChaCha8Rng::seed_from_u64(42),
        )
        .await
        .unwrap();
    let second = orchestrator
        .run(
            &RunRequest::new(second_dir.write_roster(FOUR_STUDENTS), 2),
            &mut ChaCha8Rng::seed_from_u64(42),
        )
        .await
        .unwrap();

    assert_eq!(first.picked, second.picked);
}

// ============================================================================
// Roster from website
// ============================================================================

#[tokio::test]
async fn test_missing_file_rebuilt_from_website() {
    let dir = RosterDir::new();
    let website = ScriptedDirectory::always(&["Henk Slaaf", "Jarno Jaapsen", "Piet Paulusma"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(dir.roster_path(), 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert_eq!(outcome.origin, SourceOrigin::FromRemote);
    assert!(outcome.list_rotated());
    assert!(outcome.written);
    assert_eq!(website.student_calls(), 1);
    assert_eq!(dir.read_roster().len(), 1);
}

#[tokio::test]
async fn test_short_file_rebuilt_from_website() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice"]);
    let website = ScriptedDirectory::always(&["Henk Slaaf", "Jarno Jaapsen"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let outcome = orchestrator.run(&RunRequest::new(&path, 2), &mut rng).await.unwrap();

    assert_eq!(outcome.origin, SourceOrigin::FromRemote);
    let mut picked = outcome.picked.clone();
    picked.sort();
    assert_eq!(picked, vec!["Henk Slaaf", "Jarno Jaapsen"]);
    // Remote roster is written even when it ends up empty
    assert!(outcome.written);
    assert!(outcome.remaining.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn test_remote_roster_written_with_keep_picked() {
    let dir = RosterDir::new();
    let website = ScriptedDirectory::always(&["Henk Slaaf", "Jarno Jaapsen"]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(dir.roster_path(), 1).keep_picked(true);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert!(outcome.written);
    assert_eq!(dir.read_roster(), vec!["Henk Slaaf", "Jarno Jaapsen"]);
}

#[tokio::test]
async fn test_website_retried_until_students_found() {
    let dir = RosterDir::new();
    let website = ScriptedDirectory::scripted(vec![vec![], vec![], vec!["Henk Slaaf"]]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::new(3));
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let outcome = orchestrator
        .run(&RunRequest::new(dir.roster_path(), 1), &mut rng)
        .await
        .unwrap();

    assert_eq!(outcome.picked, vec!["Henk Slaaf"]);
    assert_eq!(website.student_calls(), 3);
}

// ============================================================================
// Exclusions
// ============================================================================

#[tokio::test]
async fn test_excluded_names_never_picked() {
    let dir = RosterDir::new();
    let path = dir.write_roster(FOUR_STUDENTS);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 2).exclude_names(names(&["Alice", "Bob"]));
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    let mut picked = outcome.picked.clone();
    picked.sort();
    assert_eq!(picked, vec!["Carol", "Dave"]);
    assert!(outcome.remaining.is_empty());
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn test_exclusion_file_with_unknown_name() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Bob"]);
    let exclusions = dir.write_exclusions(&["Eve"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 1).exclude_file(&exclusions);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].name, "Eve");
    assert_eq!(outcome.failures[0].reason, FailureReason::NotInRoster);
    assert_eq!(outcome.picked.len(), 1);
    assert_eq!(outcome.remaining.len(), 1);
}

// ============================================================================
// Repeated roster entries
// ============================================================================

#[tokio::test]
async fn test_repeated_entry_never_picked_twice() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Alice", "Bob"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let outcome = orchestrator.run(&RunRequest::new(&path, 2), &mut rng).await.unwrap();

    let mut picked = outcome.picked.clone();
    picked.sort();
    assert_eq!(picked, vec!["Alice", "Bob"]);
    assert!(outcome.remaining.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn test_only_repeats_of_one_student_is_too_small() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Alice"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = orchestrator
        .run(&RunRequest::new(&path, 2), &mut rng)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InsufficientPool { requested: 2, available: 1 }));
    assert_eq!(dir.read_roster(), vec!["Alice", "Alice"]);
}

#[tokio::test]
async fn test_excluded_student_listed_twice_is_never_picked() {
    let dir = RosterDir::new();
    let path = dir.write_roster(&["Alice", "Bob", "Alice", "Carol"]);
    let website = ScriptedDirectory::always(&[]);

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let request = RunRequest::new(&path, 2)
        .keep_picked(true)
        .exclude_names(names(&["Alice"]));

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outcome = orchestrator.run(&request, &mut rng).await.unwrap();

        let mut picked = outcome.picked.clone();
        picked.sort();
        assert_eq!(picked, vec!["Bob", "Carol"]);
        assert_eq!(outcome.remaining.names(), ["Bob", "Carol"]);
    }
}

// ============================================================================
// Rendering the outcome
// ============================================================================

#[tokio::test]
async fn test_outcome_renders_into_email() {
    let dir = RosterDir::new();
    let path = dir.write_roster(FOUR_STUDENTS);
    let website = ScriptedDirectory::always(&[]).with_tasks(&["Clean the coffee machine"]);
    let cleaning_url = "https://www.os3.nl/2018-2019/students/playground/cleaning";

    let orchestrator = ScheduleOrchestrator::new(&website, RetryPolicy::default());
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let outcome = orchestrator.run(&RunRequest::new(&path, 2), &mut rng).await.unwrap();
    let tasks =
        fetch_cleaning_tasks(&website, &RetryPolicy::default(), cleaning_url, "li.level1").await;

    let context = NotificationContext::from_outcome(
        &outcome,
        NaiveDate::from_ymd_opt(2019, 3, 4).unwrap(),
        cleaning_url,
        tasks,
    );
    let body = TemplateRenderer::new().unwrap().render(&context).unwrap();

    for name in &outcome.picked {
        assert!(body.contains(name.as_str()));
    }
    assert!(body.contains("04-03-2019"));
    assert!(body.contains("Clean the coffee machine"));
    assert!(body.contains("2 students are left"));
}
