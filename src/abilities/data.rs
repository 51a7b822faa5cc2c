//! Static ability definitions.

use super::types::{AbilityDef, AbilityKey};

/// All ability definitions in catalog order.
pub const ALL_ABILITIES: &[AbilityDef] = &[
    AbilityDef {
        key: AbilityKey::Scanner,
        name: "Scanner",
        icon: "🔍",
        description: "Briefly shows 3 mines",
        level_up_text: "More scans per round",
        base_cost: 50,
        base_uses: 1,
        unlock_level: 1,
    },
    AbilityDef {
        key: AbilityKey::Shield,
        name: "Shield",
        icon: "🛡️",
        description: "Protects you from one explosion",
        level_up_text: "More shield charges",
        base_cost: 100,
        base_uses: 1,
        unlock_level: 1,
    },
    AbilityDef {
        key: AbilityKey::Hint,
        name: "Hint",
        icon: "💡",
        description: "Points out a safe cell",
        level_up_text: "More hints",
        base_cost: 30,
        base_uses: 3,
        unlock_level: 1,
    },
    AbilityDef {
        key: AbilityKey::Telepathy,
        name: "Telepathy",
        icon: "🧠",
        description: "Shows every mine for 5 seconds",
        level_up_text: "More telepathy charges",
        base_cost: 200,
        base_uses: 1,
        unlock_level: 5,
    },
    AbilityDef {
        key: AbilityKey::TimeShield,
        name: "Time Shield",
        icon: "⏳",
        description: "Stops the clock for 10 seconds",
        level_up_text: "More time shield charges",
        base_cost: 150,
        base_uses: 2,
        unlock_level: 10,
    },
    AbilityDef {
        key: AbilityKey::Magnetism,
        name: "Magnetism",
        icon: "🧲",
        description: "Opens 3 safe cells",
        level_up_text: "More magnetism charges",
        base_cost: 180,
        base_uses: 1,
        unlock_level: 15,
    },
];

/// Abilities that unlock when the player reaches exactly `level`.
pub fn unlocks_at_level(level: u32) -> impl Iterator<Item = AbilityKey> {
    ALL_ABILITIES
        .iter()
        .filter(move |def| def.unlock_level == level)
        .map(|def| def.key)
}
