use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hashbrown::HashMap;
use mindsweeper_protocol::{EntityRecord, TransitionRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::*;

pub type EntityId = u32;

/// The canonical empty entity. Every failed lookup resolves here.
pub const EMPTY_ENTITY_ID: EntityId = 0;

/// Symbol the board encoder uses for cells that never held anything.
pub const EMPTY_SYMBOL: &str = ".";

/// Stable display key of an entity, `E{id}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(pub EntityId);

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionTarget {
    pub entity_id: EntityId,
    pub sound: Option<String>,
    pub animation: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedChoice {
    pub target: TransitionTarget,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransitionSpec {
    Direct(TransitionTarget),
    RandomChoice(Vec<WeightedChoice>),
}

impl From<TransitionRecord> for TransitionSpec {
    fn from(record: TransitionRecord) -> Self {
        match record {
            TransitionRecord::Direct(target) => Self::Direct(TransitionTarget {
                entity_id: target.entity_id,
                sound: target.sound,
                animation: target.animation,
            }),
            TransitionRecord::Weighted(weighted) => Self::RandomChoice(
                weighted
                    .choices
                    .into_iter()
                    .map(|choice| WeightedChoice {
                        target: TransitionTarget {
                            entity_id: choice.entity_id,
                            sound: choice.sound,
                            animation: choice.animation,
                        },
                        weight: choice.weight,
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeOverride {
    pub name: Option<String>,
    pub level: Option<u32>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub id: EntityId,
    pub name: String,
    pub symbol: String,
    pub level: u32,
    pub description: Option<String>,
    pub tags: BTreeSet<String>,
    /// Opaque to the engine apart from the presence of named variants.
    pub sprites: BTreeMap<String, Value>,
    pub theme_overrides: BTreeMap<String, ThemeOverride>,
    pub entity_transition: BTreeMap<String, TransitionSpec>,
}

impl EntityDefinition {
    /// Stand-in used when a configuration ships without entity 0.
    pub fn empty() -> Self {
        Self {
            id: EMPTY_ENTITY_ID,
            name: "Empty".into(),
            symbol: EMPTY_SYMBOL.into(),
            level: 0,
            description: None,
            tags: BTreeSet::from([rules::tag::EMPTY.to_owned()]),
            sprites: BTreeMap::new(),
            theme_overrides: BTreeMap::new(),
            entity_transition: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey(self.id)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_sprite(&self, variant: &str) -> bool {
        self.sprites.contains_key(variant)
    }

    /// Whether this is the tile the board encoder writes for untouched ground.
    pub fn is_natural_empty(&self) -> bool {
        self.id == EMPTY_ENTITY_ID || self.symbol == EMPTY_SYMBOL
    }

    pub fn transition(&self, trigger: &str) -> Option<&TransitionSpec> {
        self.entity_transition.get(trigger)
    }

    pub fn themed_level(&self, theme: Option<&str>) -> u32 {
        theme
            .and_then(|theme| self.theme_overrides.get(theme))
            .and_then(|o| o.level)
            .unwrap_or(self.level)
    }

    pub fn themed_name(&self, theme: Option<&str>) -> &str {
        theme
            .and_then(|theme| self.theme_overrides.get(theme))
            .and_then(|o| o.name.as_deref())
            .unwrap_or(&self.name)
    }

    /// Applies the theme's name, level and description overrides. Sprites are
    /// left to the renderer.
    pub fn with_theme(&self, theme: Option<&str>) -> Cow<'_, EntityDefinition> {
        let Some(over) = theme.and_then(|theme| self.theme_overrides.get(theme)) else {
            return Cow::Borrowed(self);
        };
        let mut themed = self.clone();
        if let Some(name) = &over.name {
            themed.name = name.clone();
        }
        if let Some(level) = over.level {
            themed.level = level;
        }
        if over.description.is_some() {
            themed.description = over.description.clone();
        }
        Cow::Owned(themed)
    }
}

impl From<EntityRecord> for EntityDefinition {
    fn from(record: EntityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            symbol: record.symbol,
            level: record.level,
            description: record.description,
            tags: record.tags.into_iter().collect(),
            sprites: record.sprites,
            theme_overrides: record
                .theme_overrides
                .into_iter()
                .map(|(theme, o)| {
                    let over = ThemeOverride {
                        name: o.name,
                        level: o.level,
                        description: o.description,
                    };
                    (theme, over)
                })
                .collect(),
            entity_transition: record
                .entity_transition
                .into_iter()
                .map(|(trigger, spec)| (trigger, spec.into()))
                .collect(),
        }
    }
}

/// Immutable registry of entity definitions, shared by every board of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityCatalog {
    entities: HashMap<EntityId, EntityDefinition>,
}

impl EntityCatalog {
    pub fn new(definitions: impl IntoIterator<Item = EntityDefinition>) -> Self {
        let mut entities = HashMap::new();
        for definition in definitions {
            if let Some(previous) = entities.insert(definition.id, definition) {
                log::warn!(
                    "Duplicate definition for entity {}, keeping the last one",
                    previous.key()
                );
            }
        }
        if !entities.contains_key(&EMPTY_ENTITY_ID) {
            log::warn!("Config has no entity {EMPTY_ENTITY_ID}, adding a bare Empty entity");
            entities.insert(EMPTY_ENTITY_ID, EntityDefinition::empty());
        }
        log::info!("Entity catalog initialized with {} entities", entities.len());
        Self { entities }
    }

    /// Fails when the configuration carries no entity list at all.
    pub fn from_records(records: Option<Vec<EntityRecord>>) -> Result<Self> {
        let records = records.ok_or(GameError::MissingEntities)?;
        Ok(Self::new(records.into_iter().map(EntityDefinition::from)))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Looks up an entity, falling back to the empty entity for unknown ids.
    pub fn get(&self, id: EntityId) -> &EntityDefinition {
        match self.entities.get(&id) {
            Some(entity) => entity,
            None => {
                log::warn!("Entity with ID {id} not found, using Empty");
                &self.entities[&EMPTY_ENTITY_ID]
            }
        }
    }

    /// Normalises an id so that it always resolves, see [`Self::get`].
    pub fn resolve_id(&self, id: EntityId) -> EntityId {
        self.get(id).id
    }

    pub fn themed(&self, id: EntityId, theme: Option<&str>) -> Cow<'_, EntityDefinition> {
        self.get(id).with_theme(theme)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All definitions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &EntityDefinition> {
        let mut all: Vec<_> = self.entities.values().collect();
        all.sort_by_key(|entity| entity.id);
        all.into_iter()
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a EntityDefinition> + 'a {
        self.iter().filter(move |entity| entity.has_tag(tag))
    }
}
