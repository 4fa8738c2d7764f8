use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor indices of a single cell, never more than eight.
pub type Neighbors = SmallVec<[CellIndex; 8]>;

/// Fixed-size, row-major addressing scheme for the play surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Coord,
    cols: Coord,
}

impl Grid {
    pub fn new(rows: Coord, cols: Coord) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidConfig);
        }
        Ok(Self::new_unchecked(rows, cols))
    }

    pub(crate) const fn new_unchecked(rows: Coord, cols: Coord) -> Self {
        Self { rows, cols }
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub fn index(&self, row: Coord, col: Coord) -> Result<CellIndex> {
        if row >= self.rows || col >= self.cols {
            return Err(GameError::OutOfRange);
        }
        Ok(self.index_unchecked(row, col))
    }

    pub fn coords(&self, index: CellIndex) -> Result<Coord2> {
        let index = self.validate_index(index)?;
        let cols = CellIndex::from(self.cols);
        // both parts are bounded by `rows`/`cols`, which fit in a Coord
        Ok(((index / cols) as Coord, (index % cols) as Coord))
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::OutOfRange)
        }
    }

    /// All in-bounds orthogonal and diagonal neighbors of `index`.
    pub fn neighbors(&self, index: CellIndex) -> Result<Neighbors> {
        let coords = self.coords(index)?;
        Ok(self
            .iter_neighbor_coords(coords)
            .map(|(row, col)| self.index_unchecked(row, col))
            .collect())
    }

    pub fn iter_indices(&self) -> impl Iterator<Item = CellIndex> + use<> {
        0..self.total_cells()
    }

    pub(crate) fn iter_neighbor_coords(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub(crate) fn index_unchecked(&self, row: Coord, col: Coord) -> CellIndex {
        CellIndex::from(row) * CellIndex::from(self.cols) + CellIndex::from(col)
    }
}
