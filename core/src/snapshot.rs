use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only copy of everything the renderer redraws after a mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub visibility: Array2<Visibility>,
    pub content: Array2<Content>,
    pub entity: Array2<EntityId>,
    pub transitioned_to_empty: Array2<bool>,
    /// Neighbour threat, filled in for empty cells only.
    pub threat: Array2<u32>,
    pub player: PlayerStats,
    pub state: SessionState,
    pub theme: Option<String>,
}

impl BoardSnapshot {
    pub fn from_session<R>(session: &GameSession<R>) -> Self {
        let board = session.board();
        let mut threat = Array2::<u32>::zeros(board.entity_grid().dim());
        for pos in board.iter_coords() {
            if board.content(pos) == Content::Empty {
                threat[pos.to_nd_index()] =
                    neighbor_threat(board, session.rules(), session.theme(), pos);
            }
        }
        Self {
            size: board.size(),
            visibility: board.visibility_grid().clone(),
            content: board.content_grid().clone(),
            entity: board.entity_grid().clone(),
            transitioned_to_empty: board.transitioned_to_empty_grid().clone(),
            threat,
            player: *session.player(),
            state: session.state(),
            theme: session.theme().map(str::to_owned),
        }
    }
}
