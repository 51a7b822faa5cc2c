//! Front-end state around a [`GameSession`]: cursor, timed overlays and
//! key handling.
//!
//! Binary-only: it turns session [`GameEvent`]s into things the terminal
//! scene draws.

use std::time::Duration;

use crossterm::event::KeyCode;
use rand::Rng;

use minesweep::abilities::{AbilityKey, HighlightKind};
use minesweep::board::Pos;
use minesweep::core::constants::MESSAGE_DURATION_MS;
use minesweep::progression::ProfileBackend;
use minesweep::session::{GameEvent, GameSession, RoundStats};

/// Cells temporarily marked by an ability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub cells: Vec<Pos>,
    pub kind: HighlightKind,
    pub remaining: Duration,
}

/// Banner text that fades after a fixed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub remaining: Duration,
}

/// Keys that level up the ability in the same slot as `1`..`6`.
const LEVEL_UP_KEYS: [char; 6] = ['!', '@', '#', '$', '%', '^'];

pub struct App<B: ProfileBackend, R: Rng> {
    pub session: GameSession<B, R>,
    pub cursor: Pos,
    pub highlights: Vec<Highlight>,
    pub banner: Option<Banner>,
    /// Round summary overlay, shown until dismissed.
    pub summary: Option<RoundStats>,
}

impl<B: ProfileBackend, R: Rng> App<B, R> {
    pub fn new(session: GameSession<B, R>) -> Self {
        let grid = session.grid();
        let cursor = (grid.height() / 2, grid.width() / 2);
        Self {
            session,
            cursor,
            highlights: Vec::new(),
            banner: None,
            summary: None,
        }
    }

    /// Handle one key press. Returns false when the player quits.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            return false;
        }

        if self.summary.is_some() {
            self.summary = None;
            if matches!(code, KeyCode::Char('r') | KeyCode::Char('R')) {
                self.new_round();
            }
            return true;
        }

        match code {
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let (row, col) = self.cursor;
                let events = self.session.primary_activate(row, col);
                self.apply_events(events);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                let (row, col) = self.cursor;
                let events = self.session.secondary_activate(row, col);
                self.apply_events(events);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.new_round(),
            KeyCode::Char(c @ '1'..='6') => {
                if let Some(key) = self.ability_in_slot(c as usize - '1' as usize) {
                    let events = self.session.invoke_ability(key);
                    self.apply_events(events);
                }
            }
            KeyCode::Char(c) => {
                if let Some(slot) = LEVEL_UP_KEYS.iter().position(|&k| k == c) {
                    if let Some(key) = self.ability_in_slot(slot) {
                        let events = self.session.level_up_ability(key);
                        self.apply_events(events);
                    }
                }
            }
            _ => {}
        }
        true
    }

    /// Advance clocks: the round timer and overlay expiry.
    pub fn update(&mut self, delta: Duration) {
        let events = self.session.tick(delta);
        self.apply_events(events);

        for highlight in &mut self.highlights {
            highlight.remaining = highlight.remaining.saturating_sub(delta);
        }
        self.highlights.retain(|h| !h.remaining.is_zero());

        if let Some(banner) = &mut self.banner {
            banner.remaining = banner.remaining.saturating_sub(delta);
            if banner.remaining.is_zero() {
                self.banner = None;
            }
        }
    }

    pub fn apply_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::HighlightCells {
                    cells,
                    duration_ms,
                    kind,
                } => self.highlights.push(Highlight {
                    cells,
                    kind,
                    remaining: Duration::from_millis(duration_ms),
                }),
                GameEvent::Message(text) => self.show_banner(text),
                GameEvent::LevelUp { level, unlocked } => {
                    let mut text = format!("Level up! You are now level {}", level);
                    for key in unlocked {
                        text.push_str(&format!(" | Unlocked {}", key.def().name));
                    }
                    self.show_banner(text);
                }
                GameEvent::GameEnded { stats, .. } => {
                    self.highlights.clear();
                    self.summary = Some(stats);
                }
                // The scene reads board, timer and ability state directly.
                GameEvent::CellRevealed { .. }
                | GameEvent::CellFlagged { .. }
                | GameEvent::ShieldAbsorbed { .. }
                | GameEvent::TimerTick { .. }
                | GameEvent::AbilitiesChanged => {}
            }
        }
    }

    pub fn is_highlighted(&self, pos: Pos) -> Option<HighlightKind> {
        self.highlights
            .iter()
            .rev()
            .find(|h| h.cells.contains(&pos))
            .map(|h| h.kind)
    }

    fn new_round(&mut self) {
        self.highlights.clear();
        self.summary = None;
        let events = self.session.reset();
        self.apply_events(events);
    }

    fn show_banner(&mut self, text: String) {
        self.banner = Some(Banner {
            text,
            remaining: Duration::from_millis(MESSAGE_DURATION_MS),
        });
    }

    fn ability_in_slot(&self, slot: usize) -> Option<AbilityKey> {
        self.session.profile().unlocked_abilities.get(slot).copied()
    }

    fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        let grid = self.session.grid();
        let max_row = grid.height() as i32 - 1;
        let max_col = grid.width() as i32 - 1;
        let row = (self.cursor.0 as i32 + d_row).clamp(0, max_row);
        let col = (self.cursor.1 as i32 + d_col).clamp(0, max_col);
        self.cursor = (row as usize, col as usize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweep::board::Grid;
    use minesweep::progression::{MemoryBackend, PlayerProfile, ProgressionStore};
    use minesweep::session::RoundStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn app_with(mines: &[Pos]) -> App<MemoryBackend, StdRng> {
        let grid = Grid::from_mines(4, 4, mines).unwrap();
        let store = ProgressionStore::load(MemoryBackend::with_profile(PlayerProfile::new(
            "app".to_string(),
            0,
        )));
        App::new(GameSession::with_grid(grid, store, StdRng::seed_from_u64(3)))
    }

    #[test]
    fn test_cursor_starts_centered_and_clamps() {
        let mut app = app_with(&[(0, 0)]);
        assert_eq!(app.cursor, (2, 2));

        for _ in 0..10 {
            app.handle_key(KeyCode::Up);
            app.handle_key(KeyCode::Left);
        }
        assert_eq!(app.cursor, (0, 0));

        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.cursor, (3, 3));
    }

    #[test]
    fn test_quit_key() {
        let mut app = app_with(&[(0, 0)]);
        assert!(app.handle_key(KeyCode::Left));
        assert!(!app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn test_flag_and_reveal_keys() {
        let mut app = app_with(&[(0, 0), (3, 3)]);
        app.handle_key(KeyCode::Char('f'));
        assert!(app.session.grid().cell(2, 2).unwrap().is_flagged);
        app.handle_key(KeyCode::Char('f'));

        app.handle_key(KeyCode::Enter);
        assert!(app.session.grid().cell(2, 2).unwrap().is_revealed);
        assert_eq!(app.session.status(), RoundStatus::InProgress);
    }

    #[test]
    fn test_ability_highlight_expires() {
        let mut app = app_with(&[(0, 0), (3, 3)]);
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('1'));

        assert_eq!(app.is_highlighted((0, 0)), Some(HighlightKind::Mine));
        assert!(app.banner.is_some());

        app.update(Duration::from_millis(2_000));
        assert!(app.banner.is_none());
        assert!(app.is_highlighted((0, 0)).is_some());

        app.update(Duration::from_millis(1_000));
        assert!(app.is_highlighted((0, 0)).is_none());
    }

    #[test]
    fn test_level_up_key_without_score_shows_message() {
        let mut app = app_with(&[(0, 0)]);
        app.handle_key(KeyCode::Char('#'));
        let banner = app.banner.as_ref().unwrap();
        assert_eq!(banner.text, "Not enough score: need 30, have 0");
    }

    #[test]
    fn test_summary_shown_then_new_round() {
        let mut app = app_with(&[(0, 0)]);
        app.cursor = (3, 3);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.session.status(), RoundStatus::Won);
        assert!(app.summary.unwrap().won);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.summary.is_none());
        assert_eq!(app.session.status(), RoundStatus::Fresh);
    }
}
