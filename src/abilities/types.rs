//! Ability identifiers, static definitions and runtime state.

use serde::{Deserialize, Serialize};

use super::data::ALL_ABILITIES;

/// Unique identifier for each ability.
///
/// Discriminants match the order of [`ALL_ABILITIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbilityKey {
    Scanner = 0,
    Shield = 1,
    Hint = 2,
    Telepathy = 3,
    TimeShield = 4,
    Magnetism = 5,
}

impl AbilityKey {
    /// All abilities in catalog order.
    pub const ALL: [AbilityKey; 6] = [
        AbilityKey::Scanner,
        AbilityKey::Shield,
        AbilityKey::Hint,
        AbilityKey::Telepathy,
        AbilityKey::TimeShield,
        AbilityKey::Magnetism,
    ];

    /// Abilities every new profile starts with.
    pub const STARTING: [AbilityKey; 3] =
        [AbilityKey::Scanner, AbilityKey::Shield, AbilityKey::Hint];

    /// Static catalog entry.
    pub fn def(self) -> &'static AbilityDef {
        &ALL_ABILITIES[self as usize]
    }

    /// Stable identifier used in save files.
    pub fn as_str(self) -> &'static str {
        match self {
            AbilityKey::Scanner => "scanner",
            AbilityKey::Shield => "shield",
            AbilityKey::Hint => "hint",
            AbilityKey::Telepathy => "telepathy",
            AbilityKey::TimeShield => "timeShield",
            AbilityKey::Magnetism => "magnetism",
        }
    }

    /// Runtime state a freshly unlocked ability starts with.
    pub fn starting_state(self) -> AbilityState {
        AbilityState {
            level: 1,
            uses: self.def().base_uses,
        }
    }
}

/// Immutable catalog data for an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityDef {
    pub key: AbilityKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// What a level-up improves.
    pub level_up_text: &'static str,
    /// Score cost per current ability level.
    pub base_cost: u32,
    pub base_uses: u32,
    /// Player level at which the ability unlocks.
    pub unlock_level: u32,
}

/// Per-profile mutable ability counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityState {
    pub level: u32,
    pub uses: u32,
}

/// Catalog data joined with a profile's runtime counters, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityView {
    pub key: AbilityKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub level_up_text: &'static str,
    pub level: u32,
    pub uses: u32,
    /// Score needed for the next ability level.
    pub level_up_cost: u32,
}

impl AbilityView {
    pub fn new(def: &'static AbilityDef, state: AbilityState) -> Self {
        Self {
            key: def.key,
            name: def.name,
            icon: def.icon,
            description: def.description,
            level_up_text: def.level_up_text,
            level: state.level,
            uses: state.uses,
            level_up_cost: def.base_cost.saturating_mul(state.level),
        }
    }

    /// Whether the ability button should be enabled.
    pub fn available(&self, round_over: bool) -> bool {
        self.uses > 0 && !round_over
    }
}
