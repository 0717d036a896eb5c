//! Wire types for the JSON configuration and solution files.
//!
//! These mirror the documents served next to the game verbatim and carry no
//! game logic; `mindsweeper-core` validates them into domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level configuration document (`config_v2.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfigDocument {
    /// Kept optional so a missing list can be reported as its own error
    /// instead of a generic parse failure.
    #[serde(default)]
    pub entities: Option<Vec<EntityRecord>>,
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeRecord>,
    #[serde(default)]
    pub default_theme: Option<String>,
    pub game_state: GameStateRecord,
    #[serde(default)]
    pub special_entities: Option<SpecialEntitiesRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStateRecord {
    pub starting_level: u32,
    pub starting_max_health: u32,
    pub starting_max_experience: u32,
    #[serde(default)]
    pub treasure_heal_amount: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Asset data consumed by the renderer only.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sprites: BTreeMap<String, Value>,
    #[serde(default)]
    pub theme_overrides: BTreeMap<String, ThemeOverrideRecord>,
    #[serde(default)]
    pub entity_transition: BTreeMap<String, TransitionRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOverrideRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Either `{"type": "random_choice", "choices": [...]}` or a direct
/// `{"entity_id": N}` target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionRecord {
    Weighted(WeightedTransitionRecord),
    Direct(TransitionTargetRecord),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    RandomChoice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedTransitionRecord {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    #[serde(default)]
    pub choices: Vec<WeightedChoiceRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionTargetRecord {
    pub entity_id: u32,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedChoiceRecord {
    pub entity_id: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
}

/// Overrides for the entity ids that carry hardcoded behavior. Any id left
/// out keeps the shipped default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialEntitiesRecord {
    #[serde(default)]
    pub rat: Option<u32>,
    #[serde(default)]
    pub firefly: Option<u32>,
    #[serde(default)]
    pub ooze: Option<u32>,
    #[serde(default)]
    pub mine: Option<u32>,
    #[serde(default)]
    pub weakened_mine: Option<u32>,
    #[serde(default)]
    pub chest: Option<u32>,
    #[serde(default)]
    pub healing_elixir: Option<u32>,
    #[serde(default)]
    pub crystal: Option<u32>,
    #[serde(default)]
    pub crystal_tome: Option<u32>,
    #[serde(default)]
    pub vine_trap: Option<u32>,
    #[serde(default)]
    pub monolith: Option<u32>,
}

/// One pre-generated board. Ids are signed on the wire so corrupt entries
/// survive parsing and can be replaced during decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub board: Vec<Vec<i64>>,
}

pub fn parse_config(json: &str) -> serde_json::Result<GameConfigDocument> {
    serde_json::from_str(json)
}

pub fn parse_solutions(json: &str) -> serde_json::Result<Vec<SolutionRecord>> {
    serde_json::from_str(json)
}
