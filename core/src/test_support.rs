use std::sync::Arc;

use ndarray::Array2;
use rand::rngs::SmallRng;

use crate::*;

pub const RAT: EntityId = 1;
pub const FIREFLY: EntityId = 2;
pub const OGRE: EntityId = 3;
pub const OOZE: EntityId = 5;
pub const MIMIC: EntityId = 6;
pub const MINE: EntityId = 7;
pub const CHEST: EntityId = 8;
pub const ELIXIR: EntityId = 9;
pub const SPYGLASS: EntityId = 10;
pub const BAT_ECHO: EntityId = 11;
pub const VINE_TRAP: EntityId = 12;
pub const ESSENCE: EntityId = 13;
pub const MONOLITH: EntityId = 14;
pub const CRYSTAL: EntityId = 15;
pub const DRAGON: EntityId = 16;
pub const CROWN: EntityId = 17;
pub const TOME: EntityId = 18;
pub const RAT_SCROLL: EntityId = 19;
pub const MYSTERY_SCROLL: EntityId = 20;
pub const GEM: EntityId = 21;
pub const GHOST: EntityId = 22;
pub const WEAKENED_MINE: EntityId = 23;
pub const IDOL: EntityId = 24;

pub const CONFIG_JSON: &str = r##"{
    "default_theme": "cats",
    "themes": {
        "cats": {"name": "Cats", "sprite_sheets": {}},
        "dogs": {"name": "Dogs"}
    },
    "game_state": {
        "starting_level": 1,
        "starting_max_health": 10,
        "starting_max_experience": 4
    },
    "entities": [
        {"id": 0, "name": "Empty", "symbol": ".", "level": 0, "tags": ["empty"]},
        {"id": 1, "name": "Rat", "symbol": "r", "level": 1, "tags": ["enemy", "hidden-click-fight"]},
        {"id": 2, "name": "Firefly", "symbol": "f", "level": 1, "tags": ["enemy", "onReveal-neutral"]},
        {"id": 3, "name": "Ogre", "symbol": "O", "level": 3,
         "tags": ["enemy", "hidden-click-fight"],
         "theme_overrides": {"dogs": {"name": "Wolf", "level": 4, "description": "A hungry wolf"}}},
        {"id": 5, "name": "Ooze", "symbol": "z", "level": 2, "tags": ["enemy", "hidden-click-fight"]},
        {"id": 6, "name": "Mimic", "symbol": "m", "level": 4,
         "tags": ["enemy", "hidden-click-reveal"],
         "sprites": {"revealed": {"x": 1, "y": 2}, "revealed-hostile": {"x": 2, "y": 2}}},
        {"id": 7, "name": "Mine", "symbol": "M", "level": 5, "tags": ["enemy", "hidden-click-fight"]},
        {"id": 8, "name": "Chest", "symbol": "C", "level": 0, "tags": ["treasure"],
         "entity_transition": {"on_cleared": {"type": "random_choice", "choices": [
             {"entity_id": 19, "weight": 1},
             {"entity_id": 20, "weight": 3, "sound": "chest"}
         ]}}},
        {"id": 9, "name": "Elixir", "symbol": "e", "level": 0, "tags": ["treasure"]},
        {"id": 10, "name": "Spyglass", "symbol": "s", "level": 0,
         "tags": ["trigger-reveal-square-3x3-random", "revealed-click-trigger"],
         "entity_transition": {"on_cleared": {"entity_id": 0, "animation": "fade"}}},
        {"id": 11, "name": "Bat Echo", "symbol": "b", "level": 0,
         "tags": ["trigger-reveal-random-single", "revealed-click-trigger"]},
        {"id": 12, "name": "Vine Trap", "symbol": "v", "level": 3, "tags": ["trap"]},
        {"id": 13, "name": "Essence", "symbol": "x", "level": 0, "tags": ["trap"]},
        {"id": 14, "name": "Onyx Monolith", "symbol": "#", "level": 0,
         "tags": ["monolith", "indestructible", "no-experience"]},
        {"id": 15, "name": "Crystals", "symbol": "*", "level": 0, "tags": ["treasure", "revealed-click-claim"]},
        {"id": 16, "name": "Dragon", "symbol": "D", "level": 10,
         "tags": ["enemy", "hidden-click-fight", "trigger-win-game"]},
        {"id": 17, "name": "Crown", "symbol": "W", "level": 0,
         "tags": ["treasure", "trigger-win-game", "revealed-click-claim"]},
        {"id": 18, "name": "Tome", "symbol": "t", "level": 0, "tags": ["item", "revealed-click-claim"]},
        {"id": 19, "name": "Rat Scroll", "symbol": "1", "level": 0,
         "tags": ["item", "trigger-E1-reveal", "reward-experience=2"]},
        {"id": 20, "name": "Mystery Scroll", "symbol": "7", "level": 0, "tags": ["item", "trigger-E7-weakening"]},
        {"id": 21, "name": "Gem", "symbol": "g", "level": 0, "tags": ["treasure", "reward-experience=5"]},
        {"id": 22, "name": "Ghost", "symbol": "G", "level": 2, "tags": ["enemy", "no-experience"]},
        {"id": 23, "name": "Weakened Mine", "symbol": "w", "level": 1, "tags": ["enemy", "hidden-click-fight"]},
        {"id": 24, "name": "Cursed Idol", "symbol": "i", "level": 0, "tags": ["trap", "trigger-win-game"]}
    ]
}"##;

pub type TestSession = GameSession<SmallRng>;

pub fn config() -> GameConfig {
    GameConfig::from_json(CONFIG_JSON).expect("test config parses")
}

pub fn catalog() -> Arc<EntityCatalog> {
    config().catalog
}

pub fn grid(rows: &[&[EntityId]]) -> Array2<EntityId> {
    let cols = rows.first().map_or(0, |row| row.len());
    Array2::from_shape_fn((rows.len(), cols), |(r, c)| rows[r][c])
}

pub fn board(rows: &[&[EntityId]]) -> BoardState {
    BoardState::new(catalog(), &grid(rows))
}

pub fn session(rows: &[&[EntityId]]) -> TestSession {
    GameSession::with_seed(config(), &grid(rows), 7)
}
