//! XP awards, level thresholds, ability unlocks and the ability upgrade economy.
//!
//! Everything here is a pure transformation of a [`PlayerProfile`];
//! persisting the result is the job of [`super::ProgressionStore`].

use crate::abilities::{unlocks_at_level, AbilityKey, AbilityView};
use crate::core::constants::*;
use crate::error::AbilityError;

use super::types::PlayerProfile;

/// Facts about a finished round needed for settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub won: bool,
    pub time_seconds: u32,
    pub round_score: u32,
    /// Safe cells revealed during the round.
    pub revealed_cells: u32,
}

/// Level-ups caused by a single XP award.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelUpReport {
    pub levels_gained: u32,
    pub unlocked: Vec<AbilityKey>,
}

/// Everything that changed when a round was settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementReport {
    pub xp_gained: u32,
    pub level_up: LevelUpReport,
    pub new_best_time: bool,
}

/// Snapshot of level progress for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub progress_percent: u32,
}

/// XP for a win: base + fast-finish bonus + a tenth of the round score.
pub fn xp_for_win(time_seconds: u32, round_score: u32) -> u32 {
    XP_WIN_BASE + XP_WIN_TIME_BONUS_CAP.saturating_sub(time_seconds) + round_score / XP_WIN_SCORE_DIVISOR
}

/// XP for a loss: participation base + time played + half the cells opened.
pub fn xp_for_loss(time_seconds: u32, revealed_cells: u32) -> u32 {
    XP_LOSS_BASE + time_seconds / XP_LOSS_TIME_DIVISOR + revealed_cells / XP_LOSS_CELLS_DIVISOR
}

/// Threshold after a level-up: floor(current * 1.5), always growing.
pub fn next_threshold(current: u32) -> u32 {
    current.saturating_add((current / 2).max(1))
}

/// Round score for a win; losses always score zero.
pub fn win_round_score(elapsed_seconds: u32) -> u32 {
    WIN_SCORE_BASE
        .saturating_sub(elapsed_seconds)
        .max(WIN_SCORE_FLOOR)
}

/// Add XP and process any level-ups, possibly several at once.
///
/// Each new level is checked against the unlock table.
pub fn apply_xp(profile: &mut PlayerProfile, xp_gained: u32) -> LevelUpReport {
    let mut report = LevelUpReport::default();
    profile.xp = profile.xp.saturating_add(xp_gained);
    profile.xp_to_next_level = profile.xp_to_next_level.max(1);

    while profile.xp >= profile.xp_to_next_level {
        profile.xp -= profile.xp_to_next_level;
        profile.level = profile.level.saturating_add(1);
        profile.xp_to_next_level = next_threshold(profile.xp_to_next_level);
        report.levels_gained += 1;

        for key in unlocks_at_level(profile.level) {
            if profile.unlock(key) {
                log::info!("level {} unlocked {}", profile.level, key.as_str());
                report.unlocked.push(key);
            }
        }
    }

    report
}

/// Fold a finished round into the profile: counters, XP, best time, score.
pub fn settle_round(profile: &mut PlayerProfile, result: RoundResult, now: i64) -> SettlementReport {
    profile.games_played += 1;

    let xp_gained = if result.won {
        profile.games_won += 1;
        xp_for_win(result.time_seconds, result.round_score)
    } else {
        xp_for_loss(result.time_seconds, result.revealed_cells)
    };

    let level_up = apply_xp(profile, xp_gained);

    let mut new_best_time = false;
    if result.won {
        let is_better = profile
            .best_time_seconds
            .map_or(true, |best| result.time_seconds < best);
        if is_better {
            profile.best_time_seconds = Some(result.time_seconds);
            new_best_time = true;
        }
    }

    profile.total_score = profile.total_score.saturating_add(result.round_score);
    profile.last_played = now;

    SettlementReport {
        xp_gained,
        level_up,
        new_best_time,
    }
}

/// Unlocked abilities in unlock order, joined with catalog data.
pub fn unlocked_abilities_view(profile: &PlayerProfile) -> Vec<AbilityView> {
    profile
        .unlocked_abilities
        .iter()
        .map(|&key| {
            let state = profile.ability(key).unwrap_or_else(|| key.starting_state());
            AbilityView::new(key.def(), state)
        })
        .collect()
}

/// Score cost of the next level for an ability, saturating at `u32::MAX`.
pub fn ability_level_up_cost(profile: &PlayerProfile, key: AbilityKey) -> Option<u32> {
    profile
        .ability(key)
        .map(|state| key.def().base_cost.saturating_mul(state.level))
}

/// Spend score to raise an ability's level, granting one extra use.
/// Returns the score spent; on failure the profile is untouched.
pub fn level_up_ability(profile: &mut PlayerProfile, key: AbilityKey) -> Result<u32, AbilityError> {
    if !profile.is_unlocked(key) {
        return Err(AbilityError::Locked);
    }
    let state = profile.ability(key).ok_or(AbilityError::Locked)?;
    let cost = match key.def().base_cost.checked_mul(state.level) {
        Some(cost) if cost <= profile.total_score => cost,
        cost => {
            return Err(AbilityError::InsufficientScore {
                cost: cost.unwrap_or(u32::MAX),
                available: profile.total_score,
            })
        }
    };

    let state = profile.ability_mut(key).ok_or(AbilityError::Locked)?;
    state.level = state.level.saturating_add(1);
    state.uses = state.uses.saturating_add(1);
    profile.total_score -= cost;
    Ok(cost)
}

pub fn level_info(profile: &PlayerProfile) -> LevelInfo {
    let next = profile.xp_to_next_level.max(1);
    let progress = (profile.xp as u64 * 100 / next as u64).min(100) as u32;
    LevelInfo {
        level: profile.level,
        xp: profile.xp,
        xp_to_next_level: profile.xp_to_next_level,
        progress_percent: progress,
    }
}
