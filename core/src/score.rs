use serde::{Deserialize, Serialize};

use crate::*;

/// Seconds after which the time bonus is exhausted.
pub const TIME_BONUS_WINDOW: u32 = 300;
pub const TIME_BONUS_PER_SECOND: u32 = 10;
pub const POINTS_PER_OPENED_CELL: u32 = 50;
/// Weight of the accuracy percentage.
pub const ACCURACY_WEIGHT: u32 = 10;

/// The parts a round score is made of.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time_bonus: u32,
    pub cell_bonus: u32,
    pub accuracy_pct: f64,
    pub total: u32,
}

impl ScoreBreakdown {
    pub fn compute(
        elapsed_seconds: u32,
        opened_count: CellCount,
        total_cells: CellCount,
        mine_count: CellCount,
    ) -> Result<Self> {
        let safe_cells = safe_cells(total_cells, mine_count)?;
        let opened = u32::from(opened_count);

        let time_bonus = TIME_BONUS_WINDOW.saturating_sub(elapsed_seconds) * TIME_BONUS_PER_SECOND;
        let cell_bonus = opened * POINTS_PER_OPENED_CELL;

        // accuracy_pct * weight, rounded half up in integer arithmetic
        let scaled = u64::from(opened) * 100 * u64::from(ACCURACY_WEIGHT);
        let safe = u64::from(safe_cells);
        let accuracy_points = (2 * scaled + safe) / (2 * safe);

        Ok(Self {
            time_bonus,
            cell_bonus,
            accuracy_pct: accuracy_percent_unchecked(opened_count, safe_cells),
            // bounded by opened_count <= u16::MAX, far from overflowing
            total: time_bonus + cell_bonus + accuracy_points as u32,
        })
    }
}

/// Score of a won round. A lost round scores 0 and never reaches this.
pub fn score(
    elapsed_seconds: u32,
    opened_count: CellCount,
    total_cells: CellCount,
    mine_count: CellCount,
) -> Result<u32> {
    ScoreBreakdown::compute(elapsed_seconds, opened_count, total_cells, mine_count)
        .map(|breakdown| breakdown.total)
}

/// Share of safe cells opened, in percent.
pub fn accuracy_percent(
    opened_count: CellCount,
    total_cells: CellCount,
    mine_count: CellCount,
) -> Result<f64> {
    let safe_cells = safe_cells(total_cells, mine_count)?;
    Ok(accuracy_percent_unchecked(opened_count, safe_cells))
}

fn accuracy_percent_unchecked(opened_count: CellCount, safe_cells: CellCount) -> f64 {
    f64::from(opened_count) / f64::from(safe_cells) * 100.0
}

fn safe_cells(total_cells: CellCount, mine_count: CellCount) -> Result<CellCount> {
    match total_cells.checked_sub(mine_count) {
        Some(0) | None => Err(GameError::DivisionByZero),
        Some(safe) => Ok(safe),
    }
}
