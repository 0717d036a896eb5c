use serde::{Deserialize, Serialize};

/// What the player can currently see of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
}

impl Visibility {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// Lifecycle stage of whatever currently occupies a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    #[default]
    Alive,
    Dying,
    Dead,
    Claimed,
    Triggered,
    Empty,
}

impl Content {
    /// Dead, claimed and triggered cells have finished interacting with the player.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead | Self::Claimed | Self::Triggered)
    }

    /// Forward-only lifecycle moves for a single bound entity. Leaving a
    /// terminal state needs a transformation, see `BoardState::rebind`.
    pub const fn can_advance_to(self, next: Content) -> bool {
        use Content::*;
        match (self, next) {
            (Alive, _) => true,
            (Dying, Dead) => true,
            (current, next) => current as u8 == next as u8,
        }
    }
}
