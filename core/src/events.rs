use serde::{Deserialize, Serialize};

use crate::*;

/// Presentation cue attached to an entity transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub sound: Option<String>,
    pub animation: Option<String>,
}

impl Cue {
    pub fn from_target(target: &TransitionTarget) -> Self {
        Self {
            sound: target.sound.clone(),
            animation: target.animation.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.animation.is_none()
    }
}

/// What a mutating call did, in order. The renderer and audio layer consume
/// these; the engine never calls into them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CellRevealed {
        coords: Coord2,
    },
    ContentChanged {
        coords: Coord2,
        from: Content,
        to: Content,
    },
    EntityTransformed {
        coords: Coord2,
        from: EntityId,
        to: EntityId,
        cue: Cue,
    },
    CombatResolved {
        coords: Coord2,
        entity: EntityId,
        damage: u32,
        experience: u32,
    },
    Claimed {
        coords: Coord2,
        entity: EntityId,
        kind: ClaimKind,
        experience: u32,
    },
    TrapTriggered {
        coords: Coord2,
        entity: EntityId,
        damage: u32,
    },
    ItemStored {
        entity: EntityId,
        slot: usize,
    },
    ItemDropped {
        entity: EntityId,
    },
    CrystalCollected {
        coords: Coord2,
        color: CrystalColor,
        outcome: CollectionOutcome,
    },
    CrystalSequenceCompleted {
        spectral_monoliths: Vec<Coord2>,
        bonus_experience: u32,
    },
    CrystalTomeOpened {
        secret_order: [CrystalColor; 4],
        progress: u8,
    },
    AreaRevealed {
        area: Footprint,
        revealed: Vec<Coord2>,
    },
    RatsRevealed {
        revealed: Vec<Coord2>,
    },
    MinesWeakened {
        cells: Vec<Coord2>,
    },
    PlayerDied {
        killer: EntityId,
    },
    Victory {
        entity: EntityId,
    },
}
