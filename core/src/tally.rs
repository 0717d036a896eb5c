use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCount {
    pub total: u32,
    pub alive: u32,
}

/// Per-entity counts of everything the player is expected to deal with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTally {
    counts: BTreeMap<EntityKey, EntityCount>,
}

impl EntityTally {
    pub fn from_board(board: &BoardState, rules: &TagRules) -> Self {
        let mut counts: BTreeMap<EntityKey, EntityCount> = BTreeMap::new();
        for pos in board.iter_coords() {
            let entity = board.current_entity(pos);
            if rules.is_tallied(entity) {
                let count = counts.entry(entity.key()).or_default();
                count.total += 1;
                count.alive += 1;
            }
        }
        Self { counts }
    }

    /// Counts an entity that appeared through a transition, e.g. chest loot.
    pub fn record_spawned(&mut self, entity: &EntityDefinition, rules: &TagRules) {
        if rules.is_tallied(entity) {
            let count = self.counts.entry(entity.key()).or_default();
            count.total += 1;
            count.alive += 1;
        }
    }

    /// Records one cleared instance. Untracked entities are ignored.
    pub fn record_cleared(&mut self, entity: &EntityDefinition) {
        if let Some(count) = self.counts.get_mut(&entity.key()) {
            count.alive = count.alive.saturating_sub(1);
        }
    }

    pub fn get(&self, key: EntityKey) -> Option<EntityCount> {
        self.counts.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, EntityCount)> + '_ {
        self.counts.iter().map(|(&key, &count)| (key, count))
    }

    pub fn is_full_clear(&self) -> bool {
        self.counts.values().all(|count| count.alive == 0)
    }
}
