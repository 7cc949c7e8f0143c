//! Integration tests for move selection
//!
//! Drives the statistical selector, its engine fallback and both
//! heuristics against stub explorer and engine services.

mod common;

use common::{fen, play, response, StubEngine, StubExplorer};
use opening_explorer::{CachedExplorer, ExplorerSource};
use repertoire::core::RepertoireConfig;
use repertoire::heuristic::{EngineHeuristic, ExplorerHeuristic, Heuristic, WdlMetric};
use repertoire::rules;
use repertoire::selector::{FallbackTrigger, StatisticalSelector};
use shakmaty::Color;
use std::sync::atomic::Ordering;
use uci_analysis::WdlModel;

const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

fn selector<'a>(
    explorer: &'a CachedExplorer,
    engine: &'a StubEngine,
    config: &RepertoireConfig,
) -> StatisticalSelector<'a> {
    let fallback = EngineHeuristic::at_depth(
        engine,
        config.fallback.depth,
        WdlModel::Lichess,
        WdlMetric::Winning,
    );
    StatisticalSelector::new(explorer, ExplorerSource::Masters, config, fallback)
}

/// Explorer where 1.e4 is popular and clearly good for White
fn trusted_explorer() -> StubExplorer {
    StubExplorer::new()
        .with(
            &[],
            response(400, 300, 300, &[("e2e4", 400), ("d2d4", 350), ("c2c4", 250)]),
        )
        .with(&["e2e4"], response(300, 100, 100, &[]))
        .with(&["d2d4"], response(140, 110, 100, &[]))
        .with(&["c2c4"], response(100, 80, 70, &[]))
}

#[test]
fn test_single_thin_move_triggers_engine_fallback() {
    //! One move at 10% share over two games is not enough to choose from
    //!
    //! The selector must fall back to the engine and score every legal
    //! move of the start position at the fallback depth.

    let mut config = RepertoireConfig::default();
    config.build.min_reliable_games = 0;

    let explorer = CachedExplorer::new(
        StubExplorer::new().with(&[], response(10, 0, 10, &[("e2e4", 2)])),
    );
    let engine = StubEngine::favouring(&["d2d4"], 200);
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);

    let choice = selector(&explorer, &engine, &config)
        .best_move(&rules::initial_position(), &heuristic)
        .unwrap()
        .unwrap();

    assert!(
        choice.triggers.contains(&FallbackTrigger::InsufficientCandidates),
        "fallback should fire, got {:?}",
        choice.triggers
    );
    assert_eq!(choice.best.uci, "d2d4");
    assert_eq!(choice.evaluated, 1 + 20);

    let calls = engine.calls();
    assert_eq!(calls.len(), 20, "every legal move should be searched");
    assert!(calls.iter().all(|(_, depth)| *depth == config.fallback.depth));
}

#[test]
fn test_unreliable_position_also_falls_back() {
    //! Below the reliability threshold the move table is empty

    let explorer = CachedExplorer::new(
        StubExplorer::new().with(&[], response(1, 0, 1, &[("e2e4", 2)])),
    );
    let engine = StubEngine::level();
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let config = RepertoireConfig::default();

    let choice = selector(&explorer, &engine, &config)
        .best_move(&rules::initial_position(), &heuristic)
        .unwrap()
        .unwrap();

    assert_eq!(choice.triggers[0], FallbackTrigger::InsufficientCandidates);
    assert_eq!(choice.evaluated, 20);
    assert_eq!(engine.calls().len(), 20);
}

#[test]
fn test_trusted_statistics_skip_engine() {
    //! A well sampled, clearly good shortlist is used as is

    let explorer = CachedExplorer::new(trusted_explorer());
    let engine = StubEngine::failing();
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let config = RepertoireConfig::default();

    let choice = selector(&explorer, &engine, &config)
        .best_move(&rules::initial_position(), &heuristic)
        .unwrap()
        .unwrap();

    assert!(choice.triggers.is_empty(), "got {:?}", choice.triggers);
    assert_eq!(choice.best.uci, "e2e4");
    assert_eq!(choice.evaluated, 3);
    assert!(engine.calls().is_empty());
}

#[test]
fn test_best_move_is_deterministic() {
    //! Repeated calls on the same data agree and reuse cached lookups

    let stub = trusted_explorer();
    let lookups = stub.lookups();
    let explorer = CachedExplorer::new(stub);
    let engine = StubEngine::level();
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let config = RepertoireConfig::default();
    let selector = selector(&explorer, &engine, &config);
    let start = rules::initial_position();

    let first = selector.best_move(&start, &heuristic).unwrap();
    let after_first = lookups.load(Ordering::SeqCst);
    let second = selector.best_move(&start, &heuristic).unwrap();

    assert_eq!(first, second);
    assert_eq!(lookups.load(Ordering::SeqCst), after_first);
}

#[test]
fn test_engine_failure_during_fallback_is_an_error() {
    let explorer = CachedExplorer::new(StubExplorer::new());
    let engine = StubEngine::failing();
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let config = RepertoireConfig::default();

    let result = selector(&explorer, &engine, &config)
        .best_move(&rules::initial_position(), &heuristic);
    assert!(result.is_err());
}

#[test]
fn test_checkmated_position_has_no_best_move() {
    let explorer = CachedExplorer::new(StubExplorer::new());
    let engine = StubEngine::level();
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let config = RepertoireConfig::default();
    let mated = rules::from_fen(FOOLS_MATE).unwrap();

    let choice = selector(&explorer, &engine, &config)
        .best_move(&mated, &heuristic)
        .unwrap();
    assert!(choice.is_none());
}

#[test]
fn test_zero_total_position_scores_zero() {
    //! A position nobody has played is zero evidence, not an error

    let explorer = CachedExplorer::new(
        StubExplorer::new().with(&["h2h4"], response(0, 0, 0, &[])),
    );
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);

    let score = heuristic.evaluate(&play(&["h2h4"]), Color::White).unwrap();
    assert_eq!(score, 0.0);
    assert!(
        explorer
            .response(&fen(&["h2h4"]), &ExplorerSource::Masters)
            .moves
            .is_empty()
    );
}

#[test]
fn test_checkmate_scores_by_who_delivered_it() {
    //! Black has mated White: worthless for White, certain for Black

    let explorer = CachedExplorer::new(StubExplorer::new());
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);
    let mated = rules::from_fen(FOOLS_MATE).unwrap();

    assert_eq!(heuristic.evaluate(&mated, Color::White).unwrap(), 0.0);
    assert_eq!(heuristic.evaluate(&mated, Color::Black).unwrap(), 1.0);
}

#[test]
fn test_small_samples_rank_below_large_ones() {
    //! Two wins from two games must not beat 60% over fifty thousand

    let explorer = CachedExplorer::new(
        StubExplorer::new()
            .with(&["a2a3"], response(2, 0, 0, &[]))
            .with(&["e2e4"], response(30_000, 5_000, 15_000, &[])),
    );
    let heuristic = ExplorerHeuristic::new(&explorer, ExplorerSource::Masters);

    let lucky = heuristic.evaluate(&play(&["a2a3"]), Color::White).unwrap();
    let proven = heuristic.evaluate(&play(&["e2e4"]), Color::White).unwrap();
    assert!(lucky < proven, "{} should rank below {}", lucky, proven);
}
