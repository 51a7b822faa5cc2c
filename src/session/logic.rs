//! Round state machine: `Fresh -> InProgress -> Won | Lost`.
//!
//! A session owns one board at a time plus the progression store. Every
//! operation returns the [`GameEvent`]s the renderer needs to apply.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;

use crate::abilities::{self, AbilityEffect, AbilityKey, AbilityView};
use crate::board::{
    check_win, reveal, reveal_all_mines, toggle_flag, BoardConfig, FlagOutcome, Grid, Pos,
    RevealOutcome,
};
use crate::progression::{
    unlocked_abilities_view, level_info, win_round_score, LevelInfo, PlayerProfile, ProfileBackend,
    ProgressionStore, RoundResult,
};

use super::events::{CellContent, GameEvent, RoundStats};
use super::timer::RoundTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// No cell revealed yet; mines may still be unplaced.
    Fresh,
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    pub fn is_over(self) -> bool {
        matches!(self, RoundStatus::Won | RoundStatus::Lost)
    }
}

pub struct GameSession<B: ProfileBackend, R: Rng> {
    config: BoardConfig,
    grid: Grid,
    status: RoundStatus,
    timer: RoundTimer,
    /// Mines neutralised by a shield. Clicks on them are ignored.
    shielded: HashSet<Pos>,
    store: ProgressionStore<B>,
    rng: R,
    last_round: Option<RoundStats>,
}

impl<B: ProfileBackend, R: Rng> GameSession<B, R> {
    /// Start with an empty board; mines are placed on the first reveal.
    pub fn new(config: BoardConfig, store: ProgressionStore<B>, rng: R) -> Self {
        Self {
            config,
            grid: Grid::new(config),
            status: RoundStatus::Fresh,
            timer: RoundTimer::new(),
            shielded: HashSet::new(),
            store,
            rng,
            last_round: None,
        }
    }

    /// Start with a board whose mines are already laid out.
    ///
    /// Later rounds after [`GameSession::reset`] use random placement with
    /// the same dimensions.
    pub fn with_grid(grid: Grid, store: ProgressionStore<B>, rng: R) -> Self {
        let config = BoardConfig::new(grid.width(), grid.height(), grid.mine_count());
        Self {
            config,
            grid,
            status: RoundStatus::Fresh,
            timer: RoundTimer::new(),
            shielded: HashSet::new(),
            store,
            rng,
            last_round: None,
        }
    }

    /// Reveal a cell (left click / Enter).
    pub fn primary_activate(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        if self.status.is_over() || self.shielded.contains(&(row, col)) {
            return Vec::new();
        }
        match self.grid.cell(row, col) {
            Some(cell) if !cell.is_revealed && !cell.is_flagged => {}
            _ => return Vec::new(),
        }

        if self.status == RoundStatus::Fresh {
            if !self.grid.mines_placed() {
                if let Err(e) = self.grid.place_mines(row, col, &mut self.rng) {
                    log::warn!("could not place mines: {}", e);
                    return Vec::new();
                }
            }
            self.timer.start();
            self.status = RoundStatus::InProgress;
            log::debug!("round started at ({}, {})", row, col);
        }

        if self.grid.is_mine(row, col) && self.store.check_uses(AbilityKey::Shield).is_ok() {
            return self.absorb_with_shield(row, col);
        }

        match reveal(&mut self.grid, row, col) {
            RevealOutcome::NoChange => Vec::new(),
            RevealOutcome::HitMine => self.lose(row, col),
            RevealOutcome::Revealed(cells) => {
                let mut events = self.revealed_events(&cells);
                if check_win(&self.grid) {
                    events.extend(self.finish(true));
                }
                events
            }
        }
    }

    /// Toggle a flag (right click / `f`).
    pub fn secondary_activate(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        if self.status.is_over() {
            return Vec::new();
        }
        match toggle_flag(&mut self.grid, row, col) {
            FlagOutcome::NoChange => Vec::new(),
            FlagOutcome::Flagged => vec![GameEvent::CellFlagged {
                row,
                col,
                flagged: true,
            }],
            FlagOutcome::Unflagged => vec![GameEvent::CellFlagged {
                row,
                col,
                flagged: false,
            }],
        }
    }

    /// Use an ability from the panel.
    pub fn invoke_ability(&mut self, key: AbilityKey) -> Vec<GameEvent> {
        let effect = match abilities::use_ability(
            key,
            self.status,
            &mut self.grid,
            &mut self.store,
            &mut self.rng,
        ) {
            Ok(effect) => effect,
            Err(e) => return vec![GameEvent::Message(e.to_string())],
        };

        let name = key.def().name;
        let mut events = Vec::new();
        match effect {
            AbilityEffect::Highlight {
                cells,
                duration_ms,
                kind,
            } => {
                events.push(GameEvent::HighlightCells {
                    cells,
                    duration_ms,
                    kind,
                });
                events.push(GameEvent::Message(format!("{} activated", name)));
            }
            AbilityEffect::FreezeTimer { seconds } => {
                self.timer.freeze(Duration::from_secs(seconds));
                events.push(GameEvent::Message(format!(
                    "Timer frozen for {} seconds",
                    seconds
                )));
            }
            AbilityEffect::Revealed(cells) => {
                events.extend(self.revealed_events(&cells));
                events.push(GameEvent::Message(format!(
                    "{} opened {} cells",
                    name,
                    cells.len()
                )));
            }
        }
        events.push(GameEvent::AbilitiesChanged);

        if self.status == RoundStatus::InProgress && check_win(&self.grid) {
            events.extend(self.finish(true));
        }
        events
    }

    /// Spend score on an ability level. Allowed at any point in the round.
    pub fn level_up_ability(&mut self, key: AbilityKey) -> Vec<GameEvent> {
        match self.store.level_up_ability(key) {
            Ok(cost) => {
                let level = self.store.profile().ability(key).map_or(1, |s| s.level);
                vec![
                    GameEvent::AbilitiesChanged,
                    GameEvent::Message(format!(
                        "{} upgraded to level {} (-{} score)",
                        key.def().name,
                        level,
                        cost
                    )),
                ]
            }
            Err(e) => vec![GameEvent::Message(e.to_string())],
        }
    }

    /// Advance the round clock.
    pub fn tick(&mut self, delta: Duration) -> Vec<GameEvent> {
        if self.status != RoundStatus::InProgress {
            return Vec::new();
        }
        match self.timer.tick(delta) {
            Some(elapsed) => vec![GameEvent::TimerTick { elapsed }],
            None => Vec::new(),
        }
    }

    /// Throw away the current board and start a fresh round.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.timer.stop();
        self.timer = RoundTimer::new();
        self.grid = Grid::new(self.config);
        self.status = RoundStatus::Fresh;
        self.shielded.clear();
        vec![GameEvent::TimerTick { elapsed: 0 }, GameEvent::AbilitiesChanged]
    }

    fn absorb_with_shield(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        match self.store.consume_use(AbilityKey::Shield) {
            Ok(left) => {
                self.shielded.insert((row, col));
                log::info!("shield absorbed mine at ({}, {}), {} left", row, col, left);
                vec![
                    GameEvent::ShieldAbsorbed { row, col },
                    GameEvent::AbilitiesChanged,
                    GameEvent::Message("Shield absorbed the explosion!".to_string()),
                ]
            }
            Err(e) => vec![GameEvent::Message(e.to_string())],
        }
    }

    fn lose(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::CellRevealed {
            row,
            col,
            content: CellContent::Mine,
        }];
        for (r, c) in reveal_all_mines(&mut self.grid) {
            events.push(GameEvent::CellRevealed {
                row: r,
                col: c,
                content: CellContent::Mine,
            });
        }
        events.extend(self.finish(false));
        events
    }

    /// Stop the clock, settle the round and report the outcome.
    fn finish(&mut self, won: bool) -> Vec<GameEvent> {
        self.timer.stop();
        self.status = if won {
            RoundStatus::Won
        } else {
            RoundStatus::Lost
        };

        let time_seconds = self.timer.elapsed_seconds();
        let round_score = if won { win_round_score(time_seconds) } else { 0 };
        let report = self.store.settle_round(RoundResult {
            won,
            time_seconds,
            round_score,
            revealed_cells: self.grid.revealed_count() as u32,
        });

        let profile = self.store.profile();
        let stats = RoundStats {
            won,
            time_seconds,
            round_score,
            total_score: profile.total_score,
            xp_gained: report.xp_gained,
            level: profile.level,
            xp: profile.xp,
            xp_to_next_level: profile.xp_to_next_level,
            new_best_time: report.new_best_time,
        };
        self.last_round = Some(stats);

        let mut events = Vec::new();
        if report.level_up.levels_gained > 0 {
            events.push(GameEvent::LevelUp {
                level: profile.level,
                unlocked: report.level_up.unlocked,
            });
        }
        events.push(GameEvent::AbilitiesChanged);
        events.push(GameEvent::GameEnded { won, stats });
        events
    }

    fn revealed_events(&self, cells: &[Pos]) -> Vec<GameEvent> {
        cells
            .iter()
            .filter_map(|&(row, col)| {
                self.grid.cell(row, col).map(|cell| GameEvent::CellRevealed {
                    row,
                    col,
                    content: CellContent::Number(cell.neighbor_mines),
                })
            })
            .collect()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.timer.elapsed_seconds()
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    pub fn mines_remaining(&self) -> i32 {
        self.grid.mines_remaining()
    }

    pub fn is_shielded(&self, row: usize, col: usize) -> bool {
        self.shielded.contains(&(row, col))
    }

    pub fn profile(&self) -> &PlayerProfile {
        self.store.profile()
    }

    pub fn store(&self) -> &ProgressionStore<B> {
        &self.store
    }

    pub fn ability_views(&self) -> Vec<AbilityView> {
        unlocked_abilities_view(self.store.profile())
    }

    pub fn level_info(&self) -> LevelInfo {
        level_info(self.store.profile())
    }

    /// Summary of the most recently finished round.
    pub fn last_round(&self) -> Option<&RoundStats> {
        self.last_round.as_ref()
    }
}
