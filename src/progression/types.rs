//! Persisted player profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::abilities::{AbilityKey, AbilityState};
use crate::core::constants::{MAX_ABILITY_LEVEL, MAX_ABILITY_USES, STARTING_XP_TO_NEXT_LEVEL};

/// Cross-round player progression. Serialized as the profile save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    /// Spendable score, also the currency for ability level-ups.
    pub total_score: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub best_time_seconds: Option<u32>,
    pub abilities: BTreeMap<AbilityKey, AbilityState>,
    /// Unlock order; only ever grows.
    pub unlocked_abilities: Vec<AbilityKey>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_played: i64,
}

impl PlayerProfile {
    /// Fresh level 1 profile with the starting ability set.
    pub fn new(id: String, now: i64) -> Self {
        let mut profile = Self {
            id,
            level: 1,
            xp: 0,
            xp_to_next_level: STARTING_XP_TO_NEXT_LEVEL,
            total_score: 0,
            games_played: 0,
            games_won: 0,
            best_time_seconds: None,
            abilities: BTreeMap::new(),
            unlocked_abilities: Vec::new(),
            created_at: now,
            last_played: now,
        };
        for key in AbilityKey::STARTING {
            profile.unlock(key);
        }
        profile
    }

    pub fn is_unlocked(&self, key: AbilityKey) -> bool {
        self.unlocked_abilities.contains(&key)
    }

    pub fn ability(&self, key: AbilityKey) -> Option<AbilityState> {
        self.abilities.get(&key).copied()
    }

    pub fn ability_mut(&mut self, key: AbilityKey) -> Option<&mut AbilityState> {
        self.abilities.get_mut(&key)
    }

    /// Remaining uses, zero when locked.
    pub fn uses(&self, key: AbilityKey) -> u32 {
        self.ability(key).map_or(0, |s| s.uses)
    }

    /// Unlock an ability with its catalog starting state.
    /// Returns false if it was already unlocked.
    pub fn unlock(&mut self, key: AbilityKey) -> bool {
        if self.is_unlocked(key) {
            return false;
        }
        self.unlocked_abilities.push(key);
        self.abilities
            .entry(key)
            .or_insert_with(|| key.starting_state());
        true
    }

    /// Repair a loaded profile so the invariants hold.
    ///
    /// XP above the threshold is left for [`super::levels::apply_xp`] to roll over.
    pub fn normalize(&mut self) {
        self.level = self.level.max(1);
        self.xp_to_next_level = self.xp_to_next_level.max(1);

        let mut seen = Vec::with_capacity(self.unlocked_abilities.len());
        self.unlocked_abilities.retain(|key| {
            if seen.contains(key) {
                false
            } else {
                seen.push(*key);
                true
            }
        });

        for key in &self.unlocked_abilities {
            self.abilities
                .entry(*key)
                .or_insert_with(|| key.starting_state());
        }

        for state in self.abilities.values_mut() {
            state.level = state.level.clamp(1, MAX_ABILITY_LEVEL);
            state.uses = state.uses.min(MAX_ABILITY_USES);
        }
    }

    /// Percentage of games won, 0.0 before the first game.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 * 100.0 / self.games_played as f64
        }
    }
}
