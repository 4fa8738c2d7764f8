use serde::{Deserialize, Serialize};

use crate::*;

/// Per-position state owned by the [`Board`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    index: CellIndex,
    opened: bool,
    has_mine: bool,
    adjacent_mine_count: u8,
}

impl Cell {
    pub(crate) const fn new(index: CellIndex, has_mine: bool, adjacent_mine_count: u8) -> Self {
        Self {
            index,
            opened: false,
            has_mine,
            adjacent_mine_count,
        }
    }

    pub const fn index(self) -> CellIndex {
        self.index
    }

    pub const fn is_opened(self) -> bool {
        self.opened
    }

    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    /// Mined neighbors; always 0 for a mined cell.
    pub const fn adjacent_mine_count(self) -> u8 {
        self.adjacent_mine_count
    }

    pub(crate) fn open(&mut self) {
        self.opened = true;
    }

    /// What a player is allowed to see of this cell.
    ///
    /// Unopened mines stay hidden until `show_mines` is set, which the board
    /// does once the round is over.
    pub const fn view(self, show_mines: bool) -> CellView {
        match (self.opened, self.has_mine) {
            (true, true) => CellView::Exploded,
            (true, false) => CellView::Opened(self.adjacent_mine_count),
            (false, true) if show_mines => CellView::Mine,
            (false, _) => CellView::Hidden,
        }
    }
}

/// Player-visible rendering state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Opened(u8),
    /// Mine shown after the round ended.
    Mine,
    /// The mine that ended the round.
    Exploded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_mine_only_visible_when_requested() {
        let cell = Cell::new(3, true, 0);

        assert_eq!(cell.view(false), CellView::Hidden);
        assert_eq!(cell.view(true), CellView::Mine);
    }

    #[test]
    fn opened_cells_show_their_count() {
        let mut safe = Cell::new(0, false, 2);
        let mut mine = Cell::new(1, true, 0);
        safe.open();
        mine.open();

        assert_eq!(safe.view(false), CellView::Opened(2));
        assert_eq!(mine.view(false), CellView::Exploded);
    }
}
