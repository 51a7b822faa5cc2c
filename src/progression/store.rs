//! Owns the live profile and writes it through to a backend after every change.

use chrono::Utc;
use uuid::Uuid;

use crate::abilities::AbilityKey;
use crate::error::AbilityError;

use super::levels::{self, RoundResult, SettlementReport};
use super::persistence::ProfileBackend;
use super::types::PlayerProfile;

/// Opaque, collision-resistant player identifier.
pub fn generate_player_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct ProgressionStore<B: ProfileBackend> {
    backend: B,
    profile: PlayerProfile,
}

impl<B: ProfileBackend> ProgressionStore<B> {
    /// Load the stored profile, or create and persist a default one.
    ///
    /// A loaded profile is repaired and any banked XP is rolled into levels;
    /// it is only written back when that changed something.
    pub fn load(backend: B) -> Self {
        match backend.load() {
            Some(mut profile) => {
                profile.normalize();
                let report = levels::apply_xp(&mut profile, 0);
                let mut store = Self { backend, profile };
                if report.levels_gained > 0 {
                    log::info!(
                        "loaded profile had banked xp, now level {}",
                        store.profile.level
                    );
                    store.save();
                }
                store
            }
            None => {
                let profile = PlayerProfile::new(generate_player_id(), Utc::now().timestamp());
                log::info!("created new profile {}", profile.id);
                let mut store = Self { backend, profile };
                store.save();
                store
            }
        }
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist the current snapshot. Failures are logged, never fatal.
    pub fn save(&mut self) -> bool {
        match self.backend.save(&self.profile) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("failed to save profile {}: {}", self.profile.id, e);
                false
            }
        }
    }

    /// Settle a finished round and persist.
    pub fn settle_round(&mut self, result: RoundResult) -> SettlementReport {
        let report = levels::settle_round(&mut self.profile, result, Utc::now().timestamp());
        log::info!(
            "round settled: won={} time={}s score={} xp=+{} level={}",
            result.won,
            result.time_seconds,
            result.round_score,
            report.xp_gained,
            self.profile.level
        );
        self.save();
        report
    }

    /// Spend score on an ability level; persists only on success.
    pub fn level_up_ability(&mut self, key: AbilityKey) -> Result<u32, AbilityError> {
        let cost = levels::level_up_ability(&mut self.profile, key)?;
        self.save();
        Ok(cost)
    }

    /// Check that an ability can be used right now.
    pub fn check_uses(&self, key: AbilityKey) -> Result<(), AbilityError> {
        if !self.profile.is_unlocked(key) {
            return Err(AbilityError::Locked);
        }
        if self.profile.uses(key) == 0 {
            return Err(AbilityError::NoUsesLeft);
        }
        Ok(())
    }

    /// Spend one use of an ability and persist. Returns the uses left.
    pub fn consume_use(&mut self, key: AbilityKey) -> Result<u32, AbilityError> {
        self.check_uses(key)?;
        let state = self
            .profile
            .ability_mut(key)
            .ok_or(AbilityError::Locked)?;
        state.uses -= 1;
        let remaining = state.uses;
        self.save();
        Ok(remaining)
    }

    /// Replace the profile with a brand new one and persist it.
    pub fn reset_profile(&mut self) {
        self.profile = PlayerProfile::new(generate_player_id(), Utc::now().timestamp());
        log::info!("profile reset, new id {}", self.profile.id);
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_ABILITY_LEVEL;
    use crate::progression::MemoryBackend;

    #[test]
    fn test_load_creates_and_saves_default() {
        let store = ProgressionStore::load(MemoryBackend::new());
        assert_eq!(store.profile().level, 1);
        assert_eq!(store.backend().save_count(), 1);
        assert!(!store.profile().id.is_empty());
    }

    #[test]
    fn test_load_existing_profile() {
        let mut profile = PlayerProfile::new("keep-me".to_string(), 0);
        profile.total_score = 77;
        let store = ProgressionStore::load(MemoryBackend::with_profile(profile));

        assert_eq!(store.profile().id, "keep-me");
        assert_eq!(store.profile().total_score, 77);
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn test_load_rolls_over_banked_xp() {
        let mut profile = PlayerProfile::new("banked".to_string(), 0);
        profile.xp = 500;

        let store = ProgressionStore::load(MemoryBackend::with_profile(profile));

        // 100 + 150 + 225 = 475, leaving 25 towards 337.
        assert_eq!(store.profile().level, 4);
        assert_eq!(store.profile().xp, 25);
        assert_eq!(store.profile().xp_to_next_level, 337);
        assert!(store.profile().xp < store.profile().xp_to_next_level);
        assert_eq!(store.backend().save_count(), 1);
        assert_eq!(store.backend().stored().unwrap().level, 4);
    }

    #[test]
    fn test_load_huge_ability_level() {
        let mut profile = PlayerProfile::new("huge".to_string(), 0);
        profile.total_score = u32::MAX;
        profile.ability_mut(AbilityKey::Scanner).unwrap().level = 100_000_000;
        let mut store = ProgressionStore::load(MemoryBackend::with_profile(profile));

        let view = levels::unlocked_abilities_view(store.profile());
        assert_eq!(view[0].level, MAX_ABILITY_LEVEL);
        assert_eq!(view[0].level_up_cost, 50 * MAX_ABILITY_LEVEL);

        assert_eq!(
            store.level_up_ability(AbilityKey::Scanner),
            Ok(50 * MAX_ABILITY_LEVEL)
        );
    }

    #[test]
    fn test_player_ids_are_unique() {
        assert_ne!(generate_player_id(), generate_player_id());
    }

    #[test]
    fn test_consume_use_persists() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        assert_eq!(store.consume_use(AbilityKey::Hint), Ok(2));
        assert_eq!(store.backend().save_count(), 2);
        assert_eq!(
            store.backend().stored().unwrap().uses(AbilityKey::Hint),
            2
        );
    }

    #[test]
    fn test_consume_use_errors() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        assert_eq!(store.consume_use(AbilityKey::Scanner), Ok(0));
        assert_eq!(
            store.consume_use(AbilityKey::Scanner),
            Err(AbilityError::NoUsesLeft)
        );
        assert_eq!(
            store.consume_use(AbilityKey::Telepathy),
            Err(AbilityError::Locked)
        );
        assert_eq!(store.backend().save_count(), 2);
    }

    #[test]
    fn test_level_up_persists_only_on_success() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        assert!(store.level_up_ability(AbilityKey::Hint).is_err());
        assert_eq!(store.backend().save_count(), 1);

        store.settle_round(RoundResult {
            won: true,
            time_seconds: 10,
            round_score: 190,
            revealed_cells: 90,
        });
        assert_eq!(store.backend().save_count(), 2);

        assert_eq!(store.level_up_ability(AbilityKey::Hint), Ok(30));
        assert_eq!(store.profile().total_score, 160);
        assert_eq!(store.backend().save_count(), 3);
    }

    #[test]
    fn test_reset_profile() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        let old_id = store.profile().id.clone();
        store.settle_round(RoundResult {
            won: false,
            time_seconds: 5,
            round_score: 0,
            revealed_cells: 3,
        });

        store.reset_profile();

        assert_ne!(store.profile().id, old_id);
        assert_eq!(store.profile().games_played, 0);
        assert_eq!(store.backend().stored().unwrap().games_played, 0);
    }
}
