use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub const SPYGLASS_RADIUS: Coord = 1;

/// Random centres tried before an overlapping spyglass area is accepted.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Level given to monoliths freed by a completed crystal sequence.
pub const SPECTRAL_MONOLITH_LEVEL: u32 = 2;

/// Remembers every area a spyglass has uncovered on the current board so
/// later spyglasses look somewhere new.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpyglassLedger {
    used: Vec<Footprint>,
}

impl SpyglassLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used(&self) -> &[Footprint] {
        &self.used
    }

    pub fn overlaps_any(&self, area: &Footprint) -> bool {
        self.used.iter().any(|used| used.overlaps(area))
    }

    /// Picks and records the next area. Centres stay off the edge when the
    /// board is at least three cells wide on that axis.
    pub fn place<R: Rng + ?Sized>(&mut self, size: Coord2, rng: &mut R) -> Footprint {
        let axis = |len: Coord| if len >= 3 { 1..len - 1 } else { 0..len.max(1) };
        let (rows, cols) = (axis(size.0), axis(size.1));

        let mut area = Footprint::around((0, 0), SPYGLASS_RADIUS, size);
        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let center = (rng.gen_range(rows.clone()), rng.gen_range(cols.clone()));
            area = Footprint::around(center, SPYGLASS_RADIUS, size);
            if !self.overlaps_any(&area) {
                log::debug!("Found spyglass area {area:?} after {attempt} attempts");
                break;
            }
            if attempt == MAX_PLACEMENT_ATTEMPTS {
                log::debug!("No free spyglass area left, reusing {area:?}");
            }
        }
        self.used.push(area);
        area
    }
}

fn reveal_cells(board: &mut BoardState, cells: impl IntoIterator<Item = Coord2>) -> Vec<Coord2> {
    cells
        .into_iter()
        .filter(|&pos| board.reveal(pos))
        .collect()
}

/// Reveals the hidden cells of a fresh spyglass area. Content is untouched.
pub fn reveal_spyglass_area<R: Rng + ?Sized>(
    board: &mut BoardState,
    ledger: &mut SpyglassLedger,
    rng: &mut R,
) -> (Footprint, Vec<Coord2>) {
    let area = ledger.place(board.size(), rng);
    let revealed = reveal_cells(board, area.cells());
    (area, revealed)
}

pub fn reveal_random_hidden<R: Rng + ?Sized>(board: &mut BoardState, rng: &mut R) -> Option<Coord2> {
    let hidden: Vec<_> = board
        .iter_coords()
        .filter(|&pos| board.visibility(pos).is_hidden())
        .collect();
    let &pos = pick_uniform(&hidden, rng)?;
    board.reveal(pos);
    Some(pos)
}

pub fn reveal_all_rats(board: &mut BoardState, rules: &TagRules) -> Vec<Coord2> {
    let rats: Vec<_> = board
        .iter_coords()
        .filter(|&pos| rules.is_rat(board.current_entity(pos)))
        .collect();
    let revealed = reveal_cells(board, rats);
    log::debug!("Revealed {} rats", revealed.len());
    revealed
}

/// Rebinds every mine to the weakened mine, hidden or not.
pub fn weaken_all_mines(board: &mut BoardState, rules: &TagRules) -> Vec<Coord2> {
    let mines: Vec<_> = board
        .iter_coords()
        .filter(|&pos| rules.is_mine(board.current_entity(pos)))
        .collect();
    for &pos in &mines {
        board.transform_entity(pos, rules.special().weakened_mine);
    }
    log::debug!("Weakened {} mines", mines.len());
    mines
}

fn spectral(monolith: &EntityDefinition) -> EntityDefinition {
    let mut spectral = monolith.clone();
    spectral.tags.remove(tag::INDESTRUCTIBLE);
    spectral.tags.remove(tag::NO_EXPERIENCE);
    spectral.tags.insert(tag::TREASURE.to_owned());
    spectral.tags.insert(tag::REVEALED_CLICK_CLAIM.to_owned());
    spectral
        .tags
        .insert(format!("{}{SPECTRAL_MONOLITH_LEVEL}", tag::REWARD_EXPERIENCE_PREFIX));
    spectral.level = SPECTRAL_MONOLITH_LEVEL;
    spectral
}

/// Turns every revealed indestructible monolith into a claimable treasure.
/// The change applies to the monolith's definition for the rest of the board.
pub fn make_monoliths_spectral(board: &mut BoardState, rules: &TagRules) -> Vec<Coord2> {
    let monoliths: Vec<_> = board
        .iter_coords()
        .filter(|&pos| {
            let entity = board.current_entity(pos);
            !board.visibility(pos).is_hidden()
                && rules.is_monolith(entity)
                && rules.is_indestructible(entity)
        })
        .collect();

    let mut overridden: SmallVec<[EntityId; 2]> = SmallVec::new();
    for &pos in &monoliths {
        let entity = board.current_entity(pos);
        if !overridden.contains(&entity.id) {
            overridden.push(entity.id);
            let replacement = spectral(entity);
            board.override_entity(replacement);
        }
    }
    log::info!("Transformed {} monoliths to spectral", monoliths.len());
    monoliths
}

/// Opening hint: uncovers one spyglass at random.
pub fn reveal_random_spyglass<R: Rng + ?Sized>(
    board: &mut BoardState,
    rules: &TagRules,
    rng: &mut R,
) -> Option<Coord2> {
    let spyglasses: Vec<_> = board
        .iter_coords()
        .filter(|&pos| rules.is_spyglass(board.current_entity(pos)))
        .collect();
    let Some(&pos) = pick_uniform(&spyglasses, rng) else {
        log::debug!("No spyglass on the board to reveal");
        return None;
    };
    board.reveal(pos);
    Some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn spyglass_areas_avoid_each_other() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut ledger = SpyglassLedger::new();

        let first = ledger.place((9, 9), &mut rng);
        let second = ledger.place((9, 9), &mut rng);

        assert!(!first.overlaps(&second));
        assert_eq!(first.cells().count(), 9);
        assert_eq!(ledger.used(), &[first, second]);
    }

    #[test]
    fn spyglass_accepts_overlap_when_board_is_full() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut ledger = SpyglassLedger::new();

        let first = ledger.place((3, 3), &mut rng);
        let second = ledger.place((3, 3), &mut rng);

        assert_eq!(first, second);
        assert_eq!(ledger.used().len(), 2);
    }

    #[test]
    fn spyglass_fits_tiny_boards() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ledger = SpyglassLedger::new();

        let area = ledger.place((1, 2), &mut rng);

        assert_eq!(area.min, (0, 0));
        assert_eq!(area.max, (0, 1));
    }

    #[test]
    fn spyglass_reveals_without_touching_content() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ledger = SpyglassLedger::new();
        let mut board = board(&[&[RAT, 0, 0], &[0, OGRE, 0], &[0, 0, GEM]]);
        board.reveal((0, 0));

        let (area, revealed) = reveal_spyglass_area(&mut board, &mut ledger, &mut rng);

        assert_eq!(area.cells().count(), 9);
        assert_eq!(revealed.len(), 8);
        assert_eq!(board.content((1, 1)), Content::Alive);
        assert_eq!(board.content((0, 1)), Content::Empty);
    }

    #[test]
    fn random_reveal_only_hits_hidden_cells() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut board = board(&[&[RAT, 0], &[0, 0]]);
        for pos in [(0, 0), (0, 1), (1, 0)] {
            board.reveal(pos);
        }

        assert_eq!(reveal_random_hidden(&mut board, &mut rng), Some((1, 1)));
        assert_eq!(reveal_random_hidden(&mut board, &mut rng), None);
    }

    #[test]
    fn rat_scroll_reveals_hidden_rats_only() {
        let rules = config().settings.rules();
        let mut board = board(&[&[RAT, OGRE], &[RAT, RAT]]);
        board.reveal((1, 0));

        let revealed = reveal_all_rats(&mut board, &rules);

        assert_eq!(revealed, vec![(0, 0), (1, 1)]);
        assert!(board.visibility((0, 1)).is_hidden());
    }

    #[test]
    fn mines_weaken_regardless_of_visibility() {
        let rules = config().settings.rules();
        let mut board = board(&[&[MINE, 0], &[RAT, MINE]]);
        board.reveal((1, 1));

        assert_eq!(weaken_all_mines(&mut board, &rules), vec![(0, 0), (1, 1)]);
        assert_eq!(board.entity_id((0, 0)), WEAKENED_MINE);
        assert_eq!(board.entity_id((1, 1)), WEAKENED_MINE);
        assert!(board.visibility((0, 0)).is_hidden());
    }

    #[test]
    fn revealed_monoliths_become_claimable() {
        let rules = config().settings.rules();
        let mut board = board(&[&[MONOLITH, MONOLITH], &[0, 0]]);
        board.reveal((0, 0));

        assert_eq!(make_monoliths_spectral(&mut board, &rules), vec![(0, 0)]);

        let spectral = board.current_entity((0, 0));
        assert_eq!(spectral.level, SPECTRAL_MONOLITH_LEVEL);
        assert_eq!(
            rules.revealed_click_behavior(spectral),
            RevealedClickBehavior::Claim
        );
        assert!(!rules.has_no_experience(spectral));
        assert_eq!(board.catalog().get(MONOLITH).level, 0);
    }

    #[test]
    fn opening_reveal_finds_a_spyglass() {
        let rules = config().settings.rules();
        let mut rng = SmallRng::seed_from_u64(12);
        let mut board = board(&[&[RAT, SPYGLASS], &[0, 0]]);

        assert_eq!(reveal_random_spyglass(&mut board, &rules, &mut rng), Some((0, 1)));
        assert!(!board.visibility((0, 1)).is_hidden());

        let mut bare = crate::test_support::board(&[&[RAT]]);
        assert_eq!(reveal_random_spyglass(&mut bare, &rules, &mut rng), None);
    }
}
