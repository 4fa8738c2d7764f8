#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use controller::*;
pub use error::*;
pub use grid::*;
pub use layout::*;
pub use score::*;
pub use timer::*;
pub use types::*;

mod board;
mod cell;
mod controller;
mod error;
mod grid;
mod layout;
mod score;
mod timer;
mod types;

/// Board dimensions and the number of mines the placing player must lay.
///
/// Always satisfies `rows >= 1`, `cols >= 1` and
/// `1 <= mine_capacity < rows * cols`, including when deserialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFields")]
pub struct GameConfig {
    rows: Coord,
    cols: Coord,
    mine_capacity: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mine_capacity: CellCount) -> Self {
        Self {
            rows,
            cols,
            mine_capacity,
        }
    }

    pub fn new(rows: Coord, cols: Coord, mine_capacity: CellCount) -> Result<Self> {
        let grid = Grid::new(rows, cols)?;
        if mine_capacity == 0 || mine_capacity >= grid.total_cells() {
            return Err(GameError::InvalidConfig);
        }
        Ok(Self::new_unchecked(rows, cols, mine_capacity))
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn mine_capacity(&self) -> CellCount {
        self.mine_capacity
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn grid(&self) -> Grid {
        // rows and cols were checked on construction
        Grid::new_unchecked(self.rows, self.cols)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        DisplayClass::Mobile.config()
    }
}

#[derive(Deserialize)]
struct ConfigFields {
    rows: Coord,
    cols: Coord,
    mine_capacity: CellCount,
}

impl TryFrom<ConfigFields> for GameConfig {
    type Error = GameError;

    fn try_from(fields: ConfigFields) -> Result<Self> {
        Self::new(fields.rows, fields.cols, fields.mine_capacity)
    }
}

/// Screen class the board preset is derived from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DisplayClass {
    pub const fn from_width(width_px: u32) -> Self {
        if width_px >= 1024 {
            Self::Desktop
        } else if width_px >= 768 {
            Self::Tablet
        } else {
            Self::Mobile
        }
    }

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Desktop => GameConfig::new_unchecked(10, 12, 18),
            Self::Tablet => GameConfig::new_unchecked(8, 10, 12),
            Self::Mobile => GameConfig::new_unchecked(6, 8, 8),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

/// Result of opening a single cell on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcome {
    /// The cell was already open, nothing happened.
    AlreadyOpen,
    /// A safe cell was opened, carrying its adjacent mine count.
    Opened(u8),
    /// The open revealed the last safe cell.
    Won,
    /// The cell held a mine.
    Lost,
}

impl OpenOutcome {
    pub const fn round_outcome(self) -> Option<RoundOutcome> {
        match self {
            Self::Won => Some(RoundOutcome::Won),
            Self::Lost => Some(RoundOutcome::Lost),
            Self::AlreadyOpen | Self::Opened(_) => None,
        }
    }
}

/// Terminal result of a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Won,
    Lost,
}
