use serde::{Deserialize, Serialize};

use crate::*;

pub const INVENTORY_SLOTS: usize = 4;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: [Option<EntityId>; INVENTORY_SLOTS],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the item in the first empty slot, returning that slot. A full
    /// inventory drops the item.
    pub fn add(&mut self, item: EntityId) -> Option<usize> {
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(item);
                Some(slot)
            }
            None => {
                log::warn!("Inventory is full, dropping {}", EntityKey(item));
                None
            }
        }
    }

    pub fn remove(&mut self, slot: usize) -> Option<EntityId> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn contains(&self, item: EntityId) -> bool {
        self.slots.contains(&Some(item))
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn slots(&self) -> &[Option<EntityId>; INVENTORY_SLOTS] {
        &self.slots
    }
}
