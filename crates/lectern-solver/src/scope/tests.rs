//! Tests for the solver scope.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use lectern_config::PenaltyWeights;
use lectern_core::{Assignment, Penalty, RoomId, SectionId, Solution, TimeslotId};
use lectern_scoring::Evaluator;
use lectern_test::{snapshot_of, two_day_catalog};
use rand::Rng;

use super::*;

fn solution(start: u32) -> Solution {
    Solution::new(vec![Assignment::new(
        SectionId(1),
        RoomId(1),
        TimeslotId(start),
    )])
}

#[test]
fn test_update_best_keeps_strictly_lower() {
    let snapshot = snapshot_of(two_day_catalog());
    let mut scope = SolverScope::with_seed(Evaluator::new(&snapshot, PenaltyWeights::default()), 1);

    assert!(scope.best_score().is_none());
    assert!(scope.update_best(&solution(1), Penalty::of(10)));
    assert!(!scope.update_best(&solution(2), Penalty::of(20)));
    assert!(!scope.update_best(&solution(3), Penalty::of(10)));
    assert_eq!(scope.best_solution(), Some(&solution(1)));

    assert!(scope.update_best(&solution(4), Penalty::of(5)));
    assert_eq!(scope.best_score(), Some(Penalty::of(5)));
    assert_eq!(scope.stats().improvements, 1);
}

#[test]
fn test_seeded_scopes_are_reproducible() {
    let snapshot = snapshot_of(two_day_catalog());
    let evaluator = Evaluator::new(&snapshot, PenaltyWeights::default());
    let mut a = SolverScope::with_seed(evaluator.clone(), 42);
    let mut b = SolverScope::with_seed(evaluator, 42);

    let xs: Vec<u64> = (0..8).map(|_| a.rng().random()).collect();
    let ys: Vec<u64> = (0..8).map(|_| b.rng().random()).collect();
    assert_eq!(xs, ys);
}

#[test]
fn test_calculate_scores_counts_every_individual() {
    let snapshot = snapshot_of(two_day_catalog());
    let mut scope = SolverScope::with_seed(Evaluator::new(&snapshot, PenaltyWeights::default()), 1);

    let population = vec![solution(1), solution(2), solution(3)];
    let scores = scope.calculate_scores(&population);
    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0], scope.evaluator().score(&population[0]));
    assert_eq!(scope.stats().score_calculations, 3);

    scope.calculate_score(&population[0]);
    assert_eq!(scope.stats().score_calculations, 4);
}

#[test]
fn test_checkpoint_reports_cancellation() {
    let snapshot = snapshot_of(two_day_catalog());
    let flag = Arc::new(AtomicBool::new(false));
    let scope = SolverScope::with_seed(Evaluator::new(&snapshot, PenaltyWeights::default()), 1)
        .with_terminate_flag(Arc::clone(&flag));

    assert!(matches!(scope.checkpoint(), Ok(false)));
    flag.store(true, std::sync::atomic::Ordering::SeqCst);
    assert!(matches!(scope.checkpoint(), Err(SolverError::Cancelled)));
}

#[test]
fn test_checkpoint_reports_time_limit() {
    let snapshot = snapshot_of(two_day_catalog());
    let mut scope = SolverScope::with_seed(Evaluator::new(&snapshot, PenaltyWeights::default()), 1)
        .with_time_limit(Duration::ZERO);

    // Not started yet, so no time has elapsed.
    assert!(matches!(scope.checkpoint(), Ok(false)));
    scope.start_solving();
    assert!(matches!(scope.checkpoint(), Ok(true)));
}

#[test]
fn test_into_result_without_best_is_empty() {
    let snapshot = snapshot_of(two_day_catalog());
    let scope = SolverScope::with_seed(Evaluator::new(&snapshot, PenaltyWeights::default()), 1);

    let (solution, score, stats) = scope.into_result();
    assert!(solution.is_empty());
    assert_eq!(score, Penalty::ZERO);
    assert_eq!(stats.score_calculations, 0);
}
