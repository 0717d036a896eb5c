use serde::{Deserialize, Serialize};

use crate::*;

/// Tag vocabulary understood by the engine. Anything else in a config is
/// carried along and ignored.
pub mod tag {
    pub const EMPTY: &str = "empty";
    pub const ENEMY: &str = "enemy";
    pub const TREASURE: &str = "treasure";
    pub const ITEM: &str = "item";
    pub const TRAP: &str = "trap";
    pub const INDESTRUCTIBLE: &str = "indestructible";
    pub const NO_EXPERIENCE: &str = "no-experience";
    pub const MONOLITH: &str = "monolith";
    pub const WIN_GAME: &str = "trigger-win-game";

    pub const HIDDEN_CLICK_FIGHT: &str = "hidden-click-fight";
    pub const HIDDEN_CLICK_REVEAL: &str = "hidden-click-reveal";
    pub const REVEALED_CLICK_FIGHT: &str = "revealed-click-fight";
    pub const REVEALED_CLICK_CLAIM: &str = "revealed-click-claim";
    pub const REVEALED_CLICK_TRIGGER: &str = "revealed-click-trigger";
    pub const ON_REVEAL_HOSTILE: &str = "onReveal-hostile";
    pub const ON_REVEAL_NEUTRAL: &str = "onReveal-neutral";

    pub const REVEAL_AREA_3X3: &str = "trigger-reveal-square-3x3-random";
    pub const REVEAL_RANDOM_SINGLE: &str = "trigger-reveal-random-single";
    pub const REVEAL_ALL_RATS: &str = "trigger-E1-reveal";
    pub const WEAKEN_MINES: &str = "trigger-E7-weakening";

    /// Older spyglass content only carries one of these.
    pub const SPYGLASS_ALIASES: [&str; 4] = ["skyglass", "eyeglass", "telescope", "reveal-area"];

    pub const REWARD_EXPERIENCE_PREFIX: &str = "reward-experience=";
}

/// Sprite variant whose presence marks a mimic.
pub const MIMIC_SPRITE: &str = "revealed-hostile";

const MONOLITH_NAME: &str = "Onyx Monolith";
const CRYSTAL_NAME: &str = "Crystals";
const SPYGLASS_NAMES: [&str; 3] = ["skyglass", "spy glass", "telescope"];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiddenClickBehavior {
    Fight,
    Reveal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealedClickBehavior {
    Fight,
    Claim,
    Trigger,
    None,
}

/// Classifies entities by their tags and by the configured special ids.
/// Every function is total: unknown tag sets land on a documented default.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TagRules {
    special: SpecialIds,
}

impl TagRules {
    pub const fn new(special: SpecialIds) -> Self {
        Self { special }
    }

    pub const fn special(&self) -> &SpecialIds {
        &self.special
    }

    pub fn hidden_click_behavior(&self, entity: &EntityDefinition) -> HiddenClickBehavior {
        use HiddenClickBehavior::*;

        if entity.has_tag(tag::HIDDEN_CLICK_FIGHT) {
            Fight
        } else if entity.has_tag(tag::HIDDEN_CLICK_REVEAL) {
            Reveal
        } else if entity.has_tag(tag::ON_REVEAL_HOSTILE) {
            Fight
        } else {
            // onReveal-neutral and untagged entities both reveal
            Reveal
        }
    }

    pub fn revealed_click_behavior(&self, entity: &EntityDefinition) -> RevealedClickBehavior {
        use RevealedClickBehavior::*;

        if entity.has_tag(tag::EMPTY) || entity.has_tag(tag::INDESTRUCTIBLE) {
            None
        } else if entity.has_tag(tag::REVEALED_CLICK_FIGHT) {
            Fight
        } else if entity.has_tag(tag::REVEALED_CLICK_CLAIM) {
            Claim
        } else if entity.has_tag(tag::REVEALED_CLICK_TRIGGER) {
            Trigger
        } else if self.is_enemy(entity) {
            Fight
        } else if self.is_treasure(entity) {
            Claim
        } else if self.is_vine_trap(entity) {
            Trigger
        } else {
            Claim
        }
    }

    pub fn is_enemy(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::ENEMY)
    }

    pub fn is_treasure(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::TREASURE)
    }

    pub fn is_item(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::ITEM)
    }

    pub fn has_no_experience(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::NO_EXPERIENCE)
    }

    pub fn is_indestructible(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::INDESTRUCTIBLE)
    }

    pub fn triggers_win(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::WIN_GAME)
    }

    pub fn is_vine_trap(&self, entity: &EntityDefinition) -> bool {
        self.special.vine_trap == Some(entity.id) || entity.has_tag(tag::TRAP)
    }

    pub fn is_rat(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.rat
    }

    pub fn is_firefly(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.firefly
    }

    pub fn is_ooze(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.ooze
    }

    pub fn is_mine(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.mine
    }

    pub fn is_chest(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.chest
    }

    pub fn is_healing_elixir(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.healing_elixir
    }

    pub fn is_crystal(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.crystal || entity.name == CRYSTAL_NAME
    }

    pub fn is_crystal_tome(&self, entity: &EntityDefinition) -> bool {
        entity.id == self.special.crystal_tome
    }

    pub fn is_monolith(&self, entity: &EntityDefinition) -> bool {
        self.special.monolith == Some(entity.id)
            || entity.has_tag(tag::MONOLITH)
            || entity.name == MONOLITH_NAME
    }

    pub fn is_spyglass(&self, entity: &EntityDefinition) -> bool {
        if entity.has_tag(tag::REVEAL_AREA_3X3)
            || tag::SPYGLASS_ALIASES.iter().any(|alias| entity.has_tag(alias))
        {
            return true;
        }
        let name = entity.name.to_lowercase();
        SPYGLASS_NAMES.iter().any(|needle| name.contains(needle))
    }

    pub fn reveals_random_single(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::REVEAL_RANDOM_SINGLE)
    }

    pub fn reveals_all_rats(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::REVEAL_ALL_RATS)
    }

    pub fn weakens_mines(&self, entity: &EntityDefinition) -> bool {
        entity.has_tag(tag::WEAKEN_MINES)
    }

    pub fn is_mimic(&self, entity: &EntityDefinition) -> bool {
        entity.has_sprite(MIMIC_SPRITE)
    }

    /// Sum of all `reward-experience=<N>` tags. Malformed values count as 0.
    pub fn reward_experience(&self, entity: &EntityDefinition) -> u32 {
        entity
            .tags
            .iter()
            .filter_map(|t| t.strip_prefix(tag::REWARD_EXPERIENCE_PREFIX))
            .map(|value| {
                value.trim().parse::<u32>().unwrap_or_else(|_| {
                    log::warn!("Ignoring malformed reward tag '{value}' on {}", entity.key());
                    0
                })
            })
            .fold(0, u32::saturating_add)
    }

    /// Whether the entity counts toward the full-clear tally.
    pub fn is_tallied(&self, entity: &EntityDefinition) -> bool {
        self.is_enemy(entity)
            || self.is_treasure(entity)
            || self.is_vine_trap(entity)
            || self.is_crystal(entity)
            || self.is_spyglass(entity)
            || self.is_monolith(entity)
    }
}
