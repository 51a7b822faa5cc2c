//! Round flow integration tests
//!
//! Plays complete rounds through `GameSession` and checks what ends up in the
//! persisted profile.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use minesweep::abilities::AbilityKey;
use minesweep::board::{BoardConfig, Grid, Pos};
use minesweep::progression::{
    JsonFileBackend, MemoryBackend, PlayerProfile, ProfileBackend, ProgressionStore,
};
use minesweep::session::{CellContent, GameEvent, GameSession, RoundStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn temp_profile_path() -> PathBuf {
    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);
    let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("minesweep-flow-{}-{}", std::process::id(), test_id))
        .join("profile.json")
}

fn unshielded_profile() -> PlayerProfile {
    let mut profile = PlayerProfile::new("flow".to_string(), 0);
    if let Some(state) = profile.ability_mut(AbilityKey::Shield) {
        state.uses = 0;
    }
    profile
}

/// Reveal every safe cell, stopping once the round ends.
fn clear_board<B: ProfileBackend>(session: &mut GameSession<B, StdRng>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let cells: Vec<Pos> = session
        .grid()
        .iter_cells()
        .filter(|(_, c)| !c.is_mine)
        .map(|(pos, _)| pos)
        .collect();
    for (row, col) in cells {
        if session.status().is_over() {
            break;
        }
        events.extend(session.primary_activate(row, col));
    }
    events
}

// ============================================================================
// Full rounds
// ============================================================================

#[test]
fn test_random_board_can_be_cleared() {
    for seed in 0..10 {
        let store = ProgressionStore::load(MemoryBackend::new());
        let mut session =
            GameSession::new(BoardConfig::default(), store, StdRng::seed_from_u64(seed));

        let mut events = session.primary_activate(0, 0);
        events.extend(clear_board(&mut session));

        assert_eq!(session.status(), RoundStatus::Won, "seed {}", seed);
        assert_eq!(session.grid().revealed_count(), 90);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GameEnded { won: true, .. })));
        // No time passed, so the round scores the maximum.
        assert_eq!(session.profile().total_score, 200);
    }
}

#[test]
fn test_revealed_events_match_board() {
    let grid = Grid::from_mines(3, 3, &[(1, 1)]).unwrap();
    let store = ProgressionStore::load(MemoryBackend::with_profile(unshielded_profile()));
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));

    let events = session.primary_activate(0, 0);

    assert_eq!(
        events[0],
        GameEvent::CellRevealed {
            row: 0,
            col: 0,
            content: CellContent::Number(1),
        }
    );
    assert_eq!(session.status(), RoundStatus::InProgress);
}

#[test]
fn test_loss_is_persisted_with_zero_score() {
    let path = temp_profile_path();
    let grid = Grid::from_mines(4, 4, &[(0, 0), (3, 3)]).unwrap();
    let mut backend = JsonFileBackend::with_path(&path);
    backend.save(&unshielded_profile()).unwrap();

    let store = ProgressionStore::load(backend);
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));

    session.primary_activate(1, 1);
    session.tick(Duration::from_secs(30));
    let events = session.primary_activate(3, 3);

    assert_eq!(session.status(), RoundStatus::Lost);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GameEnded { won: false, stats } if stats.round_score == 0)));

    let reloaded = JsonFileBackend::with_path(&path).load().unwrap();
    assert_eq!(reloaded.games_played, 1);
    assert_eq!(reloaded.games_won, 0);
    assert_eq!(reloaded.total_score, 0);
    assert_eq!(reloaded.best_time_seconds, None);
    // 10 + 30/10 + 1/2
    assert_eq!(reloaded.xp, 13);

    JsonFileBackend::with_path(&path).delete().unwrap();
}

#[test]
fn test_win_after_fifty_seconds() {
    let grid = Grid::from_mines(3, 3, &[(0, 0), (0, 2)]).unwrap();
    let store = ProgressionStore::load(MemoryBackend::new());
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));

    session.primary_activate(0, 1);
    for _ in 0..500 {
        session.tick(Duration::from_millis(100));
    }
    assert_eq!(session.elapsed_seconds(), 50);

    let events = clear_board(&mut session);

    let stats = events
        .iter()
        .find_map(|e| match e {
            GameEvent::GameEnded { stats, .. } => Some(*stats),
            _ => None,
        })
        .unwrap();
    assert!(stats.won);
    assert_eq!(stats.time_seconds, 50);
    assert_eq!(stats.round_score, 150);
    assert_eq!(stats.total_score, 150);
    assert!(stats.new_best_time);
    assert_eq!(session.profile().best_time_seconds, Some(50));
}

#[test]
fn test_progress_carries_over_between_sessions() {
    let path = temp_profile_path();

    {
        let store = ProgressionStore::load(JsonFileBackend::with_path(&path));
        let grid = Grid::from_mines(2, 2, &[(0, 0)]).unwrap();
        let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));
        clear_board(&mut session);
        assert_eq!(session.status(), RoundStatus::Won);
    }

    let store = ProgressionStore::load(JsonFileBackend::with_path(&path));
    assert_eq!(store.profile().games_won, 1);
    assert_eq!(store.profile().total_score, 200);
    // 50 + 100 + 20 XP at level 1.
    assert_eq!(store.profile().level, 2);
    assert_eq!(store.profile().xp, 70);

    JsonFileBackend::with_path(&path).delete().unwrap();
}

// ============================================================================
// Abilities during a round
// ============================================================================

#[test]
fn test_shield_is_spent_across_rounds() {
    let store = ProgressionStore::load(MemoryBackend::new());
    let grid = Grid::from_mines(3, 3, &[(0, 0), (2, 2)]).unwrap();
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));

    session.primary_activate(0, 2);
    let events = session.primary_activate(2, 2);
    assert!(events.contains(&GameEvent::ShieldAbsorbed { row: 2, col: 2 }));
    assert_eq!(session.status(), RoundStatus::InProgress);

    // Uses belong to the profile, not the round.
    session.reset();
    assert_eq!(session.profile().uses(AbilityKey::Shield), 0);
    assert_eq!(
        session.invoke_ability(AbilityKey::Shield),
        vec![GameEvent::Message(
            "Ability unavailable: no uses left".to_string()
        )]
    );
}

#[test]
fn test_hint_points_at_safe_cell() {
    let grid = Grid::from_mines(4, 4, &[(0, 0), (3, 3)]).unwrap();
    let store = ProgressionStore::load(MemoryBackend::with_profile(unshielded_profile()));
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(9));

    session.primary_activate(1, 1);
    let events = session.invoke_ability(AbilityKey::Hint);

    let cells = events
        .iter()
        .find_map(|e| match e {
            GameEvent::HighlightCells { cells, .. } => Some(cells.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(cells.len(), 1);
    let (row, col) = cells[0];
    assert!(!session.grid().is_mine(row, col));
    assert!(!session.grid().cell(row, col).unwrap().is_revealed);
    assert_eq!(session.profile().uses(AbilityKey::Hint), 2);
}

#[test]
fn test_abilities_rejected_after_round_ends() {
    let grid = Grid::from_mines(2, 2, &[(0, 0)]).unwrap();
    let store = ProgressionStore::load(MemoryBackend::with_profile(unshielded_profile()));
    let mut session = GameSession::with_grid(grid, store, StdRng::seed_from_u64(0));
    session.primary_activate(0, 0);

    assert_eq!(
        session.invoke_ability(AbilityKey::Scanner),
        vec![GameEvent::Message(
            "Ability unavailable: the round is over".to_string()
        )]
    );
    assert_eq!(session.profile().uses(AbilityKey::Scanner), 1);
}
