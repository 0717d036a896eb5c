use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrystalColor {
    Red,
    Blue,
    Yellow,
    Green,
}

impl CrystalColor {
    pub const ALL: [CrystalColor; 4] = [Self::Red, Self::Blue, Self::Yellow, Self::Green];
}

/// Fixed positional mapping. The board is split at half its rows and columns:
/// red top-left, blue top-right, yellow bottom-left, green bottom-right.
pub fn quadrant_color(size: Coord2, coords: Coord2) -> CrystalColor {
    let top = coords.0 < size.0 / 2;
    let left = coords.1 < size.1 / 2;
    match (top, left) {
        (true, true) => CrystalColor::Red,
        (true, false) => CrystalColor::Blue,
        (false, true) => CrystalColor::Yellow,
        (false, false) => CrystalColor::Green,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionOutcome {
    Normal,
    SequenceCorrect,
    SequenceComplete,
    SequenceReset,
}

impl CollectionOutcome {
    pub const fn experience(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::SequenceCorrect => 2,
            Self::SequenceComplete => 3,
            Self::SequenceReset => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrystalSequenceTracker {
    secret_order: Option<[CrystalColor; 4]>,
    progress: u8,
}

impl CrystalSequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the secret order on first use. Later calls keep it.
    pub fn ensure_sequence<R: Rng + ?Sized>(&mut self, rng: &mut R) -> [CrystalColor; 4] {
        *self.secret_order.get_or_insert_with(|| {
            let mut order = CrystalColor::ALL;
            shuffle(&mut order, rng);
            log::debug!("Generated crystal sequence {order:?}");
            order
        })
    }

    pub fn secret_order(&self) -> Option<[CrystalColor; 4]> {
        self.secret_order
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        usize::from(self.progress) == CrystalColor::ALL.len()
    }

    pub fn process_collection(&mut self, color: CrystalColor) -> CollectionOutcome {
        let Some(order) = self.secret_order else {
            return CollectionOutcome::Normal;
        };
        if self.is_complete() {
            return CollectionOutcome::Normal;
        }

        if order[usize::from(self.progress)] == color {
            self.progress += 1;
            if self.is_complete() {
                log::info!("Crystal sequence completed");
                CollectionOutcome::SequenceComplete
            } else {
                CollectionOutcome::SequenceCorrect
            }
        } else {
            self.progress = 0;
            CollectionOutcome::SequenceReset
        }
    }
}
