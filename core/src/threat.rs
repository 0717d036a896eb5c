use crate::*;

/// Sum of themed levels of the alive enemies around `coords`. Recomputed on
/// every query so it always reflects the live board.
pub fn neighbor_threat(
    board: &BoardState,
    rules: &TagRules,
    theme: Option<&str>,
    coords: Coord2,
) -> u32 {
    board
        .neighbors(coords)
        .filter(|&pos| board.content(pos) == Content::Alive)
        .map(|pos| board.current_entity(pos))
        .filter(|entity| rules.is_enemy(entity))
        .map(|entity| entity.themed_level(theme))
        .fold(0, u32::saturating_add)
}

/// Colour of the first revealed, alive crystal next to `coords`. Used to tint
/// oozes.
pub fn ooze_tint(board: &BoardState, rules: &TagRules, coords: Coord2) -> Option<CrystalColor> {
    board
        .neighbors(coords)
        .find(|&pos| {
            !board.visibility(pos).is_hidden()
                && board.content(pos) == Content::Alive
                && rules.is_crystal(board.current_entity(pos))
        })
        .map(|pos| quadrant_color(board.size(), pos))
}
