use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of a single placement toggle, enough for a caller to refresh its counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Whether the toggled cell holds a mine afterwards.
    pub mined: bool,
    /// Mines that can still be placed.
    pub remaining: CellCount,
    pub outcome: MarkOutcome,
}

/// Mine positions chosen by the placing player, bounded by a fixed capacity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    grid: Grid,
    capacity: CellCount,
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn new(config: &GameConfig) -> Self {
        let grid = config.grid();
        Self {
            grid,
            capacity: config.mine_capacity(),
            mine_mask: Array2::default(grid.size().to_nd_index()),
            mine_count: 0,
        }
    }

    /// Builds a complete layout whose capacity is exactly the given mines.
    pub fn from_mine_indices(grid: Grid, mine_indices: &[CellIndex]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(grid.size().to_nd_index());
        let mut mine_count = 0;

        for &index in mine_indices {
            let coords = grid.coords(index)?;
            let cell = &mut mine_mask[coords.to_nd_index()];
            if !*cell {
                *cell = true;
                mine_count += 1;
            }
        }

        let config = GameConfig::new(grid.rows(), grid.cols(), mine_count)?;
        Ok(Self {
            grid,
            capacity: config.mine_capacity(),
            mine_mask,
            mine_count,
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn capacity(&self) -> CellCount {
        self.capacity
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn remaining_capacity(&self) -> CellCount {
        self.capacity - self.mine_count
    }

    pub fn is_complete(&self) -> bool {
        self.mine_count == self.capacity
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.grid
            .coords(index)
            .is_ok_and(|coords| self.mine_mask[coords.to_nd_index()])
    }

    /// Adds a mine at `index`, or removes the one already there.
    ///
    /// Removal is always allowed. Adding to a full layout is silently
    /// rejected and reported as [`MarkOutcome::NoChange`].
    pub fn toggle(&mut self, index: CellIndex) -> Result<Placement> {
        let coords = self.grid.coords(index)?;
        let cell = &mut self.mine_mask[coords.to_nd_index()];

        let outcome = if *cell {
            *cell = false;
            self.mine_count -= 1;
            MarkOutcome::Changed
        } else if self.mine_count < self.capacity {
            *cell = true;
            self.mine_count += 1;
            MarkOutcome::Changed
        } else {
            log::warn!(
                "Mine capacity of {} reached, placement at {} ignored",
                self.capacity,
                index
            );
            MarkOutcome::NoChange
        };

        Ok(Placement {
            mined: *cell,
            remaining: self.remaining_capacity(),
            outcome,
        })
    }

    /// Mined cell indices in ascending order.
    pub fn mines(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.grid.iter_indices().filter(|&index| self.contains(index))
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.grid
            .iter_neighbor_coords(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: Coord, cols: Coord, capacity: CellCount) -> MineLayout {
        MineLayout::new(&GameConfig::new(rows, cols, capacity).unwrap())
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut layout = layout(3, 3, 2);

        let placed = layout.toggle(4).unwrap();
        assert_eq!(
            placed,
            Placement {
                mined: true,
                remaining: 1,
                outcome: MarkOutcome::Changed
            }
        );
        assert!(layout.contains(4));

        let removed = layout.toggle(4).unwrap();
        assert!(!removed.mined);
        assert_eq!(removed.remaining, 2);
        assert!(!layout.contains(4));
        assert_eq!(layout.mine_count(), 0);
    }

    #[test]
    fn toggle_is_capacity_guarded() {
        let mut layout = layout(3, 3, 2);
        layout.toggle(0).unwrap();
        layout.toggle(1).unwrap();
        assert!(layout.is_complete());

        let rejected = layout.toggle(2).unwrap();

        assert_eq!(rejected.outcome, MarkOutcome::NoChange);
        assert!(!rejected.mined);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(layout.mine_count(), 2);
        assert!(!layout.contains(2));
    }

    #[test]
    fn removal_from_full_layout_is_allowed() {
        let mut layout = layout(3, 3, 1);
        layout.toggle(8).unwrap();

        let removed = layout.toggle(8).unwrap();

        assert_eq!(removed.outcome, MarkOutcome::Changed);
        assert!(!layout.is_complete());
    }

    #[test]
    fn toggle_out_of_range_leaves_layout_unchanged() {
        let mut layout = layout(2, 2, 1);

        assert_eq!(layout.toggle(4), Err(GameError::OutOfRange));
        assert_eq!(layout.mine_count(), 0);
        assert!(!layout.contains(4));
    }

    #[test]
    fn from_mine_indices_ignores_duplicates() {
        let grid = Grid::new(3, 3).unwrap();
        let layout = MineLayout::from_mine_indices(grid, &[2, 2, 6]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert!(layout.is_complete());
        assert!(layout.mines().eq([2, 6]));
    }

    #[test]
    fn from_mine_indices_rejects_full_grid() {
        let grid = Grid::new(1, 2).unwrap();

        assert_eq!(
            MineLayout::from_mine_indices(grid, &[0, 1]),
            Err(GameError::InvalidConfig)
        );
    }

    #[test]
    fn adjacent_mine_count_counts_neighbors_only() {
        let grid = Grid::new(3, 3).unwrap();
        let layout = MineLayout::from_mine_indices(grid, &[0, 4]).unwrap();

        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 1);
    }
}
