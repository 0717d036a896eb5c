use std::sync::Arc;

use mindsweeper_protocol::{GameConfigDocument, SolutionRecord, SpecialEntitiesRecord};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Heal applied by generic treasures when the config leaves it unset.
pub const DEFAULT_TREASURE_HEAL: u32 = 8;

/// Entity ids that carry hardcoded behavior.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialIds {
    pub rat: EntityId,
    pub firefly: EntityId,
    pub ooze: EntityId,
    pub mine: EntityId,
    pub weakened_mine: EntityId,
    pub chest: EntityId,
    pub healing_elixir: EntityId,
    pub crystal: EntityId,
    pub crystal_tome: EntityId,
    pub vine_trap: Option<EntityId>,
    pub monolith: Option<EntityId>,
}

impl Default for SpecialIds {
    fn default() -> Self {
        Self {
            rat: 1,
            firefly: 2,
            ooze: 5,
            mine: 7,
            weakened_mine: 23,
            chest: 8,
            healing_elixir: 9,
            crystal: 15,
            crystal_tome: 18,
            vine_trap: None,
            monolith: None,
        }
    }
}

impl From<&SpecialEntitiesRecord> for SpecialIds {
    fn from(record: &SpecialEntitiesRecord) -> Self {
        let d = Self::default();
        Self {
            rat: record.rat.unwrap_or(d.rat),
            firefly: record.firefly.unwrap_or(d.firefly),
            ooze: record.ooze.unwrap_or(d.ooze),
            mine: record.mine.unwrap_or(d.mine),
            weakened_mine: record.weakened_mine.unwrap_or(d.weakened_mine),
            chest: record.chest.unwrap_or(d.chest),
            healing_elixir: record.healing_elixir.unwrap_or(d.healing_elixir),
            crystal: record.crystal.unwrap_or(d.crystal),
            crystal_tome: record.crystal_tome.unwrap_or(d.crystal_tome),
            vine_trap: record.vine_trap.or(d.vine_trap),
            monolith: record.monolith.or(d.monolith),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub starting_level: u32,
    pub starting_max_health: u32,
    pub starting_max_experience: u32,
}

impl PlayerSettings {
    pub const fn max_health_for(&self, level: u32) -> u32 {
        self.starting_max_health.saturating_add(level / 2)
    }

    pub const fn exp_requirement_for(&self, level: u32) -> u32 {
        self.starting_max_experience.saturating_add(level)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub player: PlayerSettings,
    pub treasure_heal_amount: u32,
    /// Known theme names, sorted.
    pub themes: Vec<String>,
    pub default_theme: Option<String>,
    pub special: SpecialIds,
}

impl GameSettings {
    pub fn from_document(doc: &GameConfigDocument) -> Self {
        let themes: Vec<String> = doc.themes.keys().cloned().collect();
        let default_theme = match &doc.default_theme {
            Some(name) if doc.themes.contains_key(name) => Some(name.clone()),
            requested => {
                let fallback = themes.first().cloned();
                if let Some(name) = requested {
                    log::warn!("Theme '{name}' not found in config, using {fallback:?}");
                }
                fallback
            }
        };
        let state = &doc.game_state;
        Self {
            player: PlayerSettings {
                starting_level: state.starting_level.max(1),
                starting_max_health: state.starting_max_health,
                starting_max_experience: state.starting_max_experience,
            },
            treasure_heal_amount: state
                .treasure_heal_amount
                .unwrap_or(DEFAULT_TREASURE_HEAL),
            themes,
            default_theme,
            special: doc
                .special_entities
                .as_ref()
                .map(SpecialIds::from)
                .unwrap_or_default(),
        }
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.iter().any(|theme| theme == name)
    }

    pub fn rules(&self) -> TagRules {
        TagRules::new(self.special)
    }
}

/// Validated configuration: the shared catalog plus session settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub catalog: Arc<EntityCatalog>,
    pub settings: GameSettings,
}

impl GameConfig {
    pub fn from_document(doc: GameConfigDocument) -> Result<Self> {
        let settings = GameSettings::from_document(&doc);
        let catalog = EntityCatalog::from_records(doc.entities)?;
        Ok(Self {
            catalog: Arc::new(catalog),
            settings,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(mindsweeper_protocol::parse_config(json)?)
    }

    /// Turns encoded entity ids into a board grid. Unknown or negative ids
    /// become the empty entity.
    pub fn decode_board(&self, encoded: &[Vec<i64>]) -> Result<Array2<EntityId>> {
        let rows = encoded.len();
        let cols = encoded.first().map_or(0, Vec::len);
        if rows == 0
            || cols == 0
            || rows > usize::from(Coord::MAX)
            || cols > usize::from(Coord::MAX)
            || encoded.iter().any(|row| row.len() != cols)
        {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board = Array2::from_elem((rows, cols), EMPTY_ENTITY_ID);
        for (r, row) in encoded.iter().enumerate() {
            for (c, &encoding) in row.iter().enumerate() {
                board[(r, c)] = match EntityId::try_from(encoding) {
                    Ok(id) if self.catalog.contains(id) => id,
                    _ => {
                        log::warn!(
                            "Unknown entity/encoding {encoding} at [{r}, {c}], defaulting to Empty"
                        );
                        EMPTY_ENTITY_ID
                    }
                };
            }
        }
        Ok(board)
    }
}

/// All pre-generated boards of a solutions file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolutionSet {
    solutions: Vec<SolutionRecord>,
}

impl SolutionSet {
    pub fn new(solutions: Vec<SolutionRecord>) -> Self {
        Self { solutions }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(mindsweeper_protocol::parse_solutions(json)?))
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn board(&self, config: &GameConfig, index: usize) -> Result<Array2<EntityId>> {
        let solution = self
            .solutions
            .get(index)
            .ok_or(GameError::UnknownSolution {
                index,
                available: self.solutions.len(),
            })?;
        config.decode_board(&solution.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn settings_fill_defaults() {
        let config = config();

        assert_eq!(config.settings.treasure_heal_amount, DEFAULT_TREASURE_HEAL);
        assert_eq!(config.settings.default_theme.as_deref(), Some("cats"));
        assert_eq!(config.settings.special, SpecialIds::default());
        assert!(config.settings.has_theme("dogs"));
    }

    #[test]
    fn unknown_default_theme_falls_back_to_first() {
        let json = CONFIG_JSON.replace(r#""default_theme": "cats""#, r#""default_theme": "birds""#);

        let config = GameConfig::from_json(&json).unwrap();

        assert_eq!(config.settings.default_theme.as_deref(), Some("cats"));
    }

    #[test]
    fn derived_player_maximums() {
        let player = config().settings.player;

        assert_eq!(player.max_health_for(1), 10);
        assert_eq!(player.max_health_for(4), 12);
        assert_eq!(player.exp_requirement_for(3), 7);

        let extreme = PlayerSettings {
            starting_level: 1,
            starting_max_health: u32::MAX,
            starting_max_experience: u32::MAX,
        };
        assert_eq!(extreme.max_health_for(u32::MAX), u32::MAX);
        assert_eq!(extreme.exp_requirement_for(7), u32::MAX);
    }

    #[test]
    fn decode_replaces_unknown_ids() {
        let config = config();

        let board = config.decode_board(&[vec![1, -4], vec![999, 3]]).unwrap();

        assert_eq!(board[(0, 0)], RAT);
        assert_eq!(board[(0, 1)], EMPTY_ENTITY_ID);
        assert_eq!(board[(1, 0)], EMPTY_ENTITY_ID);
        assert_eq!(board[(1, 1)], OGRE);
    }

    #[test]
    fn decode_rejects_ragged_boards() {
        let config = config();

        assert_eq!(
            config.decode_board(&[vec![0, 0], vec![0]]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(config.decode_board(&[]), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn solution_set_checks_index() {
        let config = config();
        let solutions = SolutionSet::from_json(r#"[{"board": [[0, 1], [3, 0]]}]"#).unwrap();

        assert_eq!(solutions.board(&config, 0).unwrap()[(1, 0)], OGRE);
        assert_eq!(
            solutions.board(&config, 3),
            Err(GameError::UnknownSolution {
                index: 3,
                available: 1
            })
        );
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"game_state": {"starting_level": 1, "starting_max_health": 9, "starting_max_experience": 4}}"#),
            Err(GameError::MissingEntities)
        ));
    }
}
