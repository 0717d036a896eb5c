use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single board axis, used for row/column positions and board dimensions.
pub type Coord = u16;

/// Count type used for cell totals.
pub type CellCount = u32;

/// Board position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

/// Reads the `(rows, cols)` shape of a grid as board coordinates.
pub fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let (rows, cols) = grid.dim();
    (
        Coord::try_from(rows).unwrap_or(Coord::MAX),
        Coord::try_from(cols).unwrap_or(Coord::MAX),
    )
}

/// Row-major offsets of the eight surrounding cells.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds 8-neighbourhood of a cell. No wraparound.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    next: usize,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        Self {
            center,
            size,
            next: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dr, dc)) = NEIGHBOR_OFFSETS.get(self.next) {
            self.next += 1;
            let row = i32::from(self.center.0) + dr;
            let col = i32::from(self.center.1) + dc;
            if row < 0 || col < 0 || row >= i32::from(self.size.0) || col >= i32::from(self.size.1) {
                continue;
            }
            return Some((row as Coord, col as Coord));
        }
        None
    }
}

/// Inclusive rectangular region of the board, clamped to its edges.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub min: Coord2,
    pub max: Coord2,
}

impl Footprint {
    /// The square of side `2 * radius + 1` centred on `center`, cut to the board.
    pub fn around(center: Coord2, radius: Coord, size: Coord2) -> Self {
        let last = (size.0.saturating_sub(1), size.1.saturating_sub(1));
        Self {
            min: (
                center.0.saturating_sub(radius),
                center.1.saturating_sub(radius),
            ),
            max: (
                center.0.saturating_add(radius).min(last.0),
                center.1.saturating_add(radius).min(last.1),
            ),
        }
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        !(self.max.0 < other.min.0
            || self.min.0 > other.max.0
            || self.max.1 < other.min.1
            || self.min.1 > other.max.1)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        (self.min.0..=self.max.0).contains(&coords.0) && (self.min.1..=self.max.1).contains(&coords.1)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let Footprint { min, max } = *self;
        (min.0..=max.0).flat_map(move |row| (min.1..=max.1).map(move |col| (row, col)))
    }
}
