use alloc::collections::VecDeque;
use core::num::Saturating;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    #[default]
    Revealing,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Reveal-phase state of a single round.
///
/// Built once from a complete [`MineLayout`]; a new round always gets a fresh
/// board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    cells: Array2<Cell>,
    mine_count: CellCount,
    opened_count: Saturating<CellCount>,
    state: BoardState,
    triggered_mine: Option<CellIndex>,
}

impl Board {
    pub fn new(layout: &MineLayout) -> Result<Self> {
        if !layout.is_complete() {
            return Err(GameError::IncompleteLayout);
        }

        let grid = layout.grid();
        let cells = Array2::from_shape_fn(grid.size().to_nd_index(), |(row, col)| {
            // shape comes from the grid, so both fit in a Coord
            let coords = (row as Coord, col as Coord);
            let index = grid.index_unchecked(coords.0, coords.1);
            if layout[coords] {
                Cell::new(index, true, 0)
            } else {
                Cell::new(index, false, layout.adjacent_mine_count(coords))
            }
        });

        Ok(Self {
            grid,
            cells,
            mine_count: layout.mine_count(),
            opened_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, BoardState::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, BoardState::Lost)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count.0
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.grid.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// The mine whose opening lost the round.
    pub fn triggered_mine(&self) -> Option<CellIndex> {
        self.triggered_mine
    }

    pub fn cell(&self, index: CellIndex) -> Result<Cell> {
        let coords = self.grid.coords(index)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Player-visible state of a cell; mines are only shown once the round is over.
    pub fn view(&self, index: CellIndex) -> Result<CellView> {
        Ok(self.cell(index)?.view(self.state.is_finished()))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn open(&mut self, index: CellIndex) -> Result<OpenOutcome> {
        let coords = self.grid.coords(index)?;

        if self.cells[coords.to_nd_index()].is_opened() {
            return Ok(OpenOutcome::AlreadyOpen);
        }

        self.check_not_finished()?;
        Ok(self.open_single_cell(coords))
    }

    fn open_single_cell(&mut self, coords: Coord2) -> OpenOutcome {
        let cell = {
            let cell = &mut self.cells[coords.to_nd_index()];
            cell.open();
            *cell
        };
        self.opened_count += 1;

        if cell.has_mine() {
            log::debug!("Mine hit at {:?}", coords);
            self.triggered_mine = Some(cell.index());
            self.end_round(RoundOutcome::Lost);
            return OpenOutcome::Lost;
        }

        let adjacent_mines = cell.adjacent_mine_count();
        log::debug!("Open cell at {:?}, mine count: {}", coords, adjacent_mines);

        if adjacent_mines == 0 {
            self.flood_fill(coords);
        }

        if self.opened_count.0 == self.safe_cell_count() {
            self.end_round(RoundOutcome::Won);
            OpenOutcome::Won
        } else {
            OpenOutcome::Opened(adjacent_mines)
        }
    }

    /// Opens the zero region connected to `start` together with its numbered border.
    fn flood_fill(&mut self, start: Coord2) {
        let mut queued: HashSet<Coord2> = HashSet::new();
        queued.insert(start);
        let mut to_visit = VecDeque::new();
        self.queue_closed_safe_neighbors(start, &mut queued, &mut to_visit);
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            start,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            let visit_adjacent_mines = {
                let cell = &mut self.cells[visit_coords.to_nd_index()];
                if cell.is_opened() || cell.has_mine() {
                    log::trace!("Skipping cell at {:?}", visit_coords);
                    continue;
                }
                cell.open();
                cell.adjacent_mine_count()
            };
            self.opened_count += 1;
            log::trace!(
                "Flood opened cell at {:?}, mine count: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                self.queue_closed_safe_neighbors(visit_coords, &mut queued, &mut to_visit);
            }
        }
    }

    fn queue_closed_safe_neighbors(
        &self,
        coords: Coord2,
        queued: &mut HashSet<Coord2>,
        to_visit: &mut VecDeque<Coord2>,
    ) {
        for pos in self.grid.iter_neighbor_coords(coords) {
            let cell = self.cells[pos.to_nd_index()];
            if !cell.is_opened() && !cell.has_mine() && queued.insert(pos) {
                to_visit.push_back(pos);
            }
        }
    }

    fn end_round(&mut self, outcome: RoundOutcome) {
        if self.state.is_finished() {
            return;
        }

        self.state = match outcome {
            RoundOutcome::Won => BoardState::Won,
            RoundOutcome::Lost => BoardState::Lost,
        };
        log::debug!(
            "Board finished as {:?} with {} cells opened",
            self.state,
            self.opened_count.0
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::RoundFinished)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: Coord, cols: Coord, mines: &[CellIndex]) -> Board {
        let grid = Grid::new(rows, cols).unwrap();
        Board::new(&MineLayout::from_mine_indices(grid, mines).unwrap()).unwrap()
    }

    fn opened_cells(board: &Board) -> usize {
        board.cells().filter(|cell| cell.is_opened()).count()
    }

    #[test]
    fn incomplete_layout_is_rejected() {
        let config = GameConfig::new(3, 3, 2).unwrap();
        let mut layout = MineLayout::new(&config);
        layout.toggle(0).unwrap();

        assert_eq!(Board::new(&layout), Err(GameError::IncompleteLayout));
    }

    #[test]
    fn adjacent_counts_are_computed_on_construction() {
        let board = board(3, 3, &[0]);

        assert!(board.cell(0).unwrap().has_mine());
        assert_eq!(board.cell(1).unwrap().adjacent_mine_count(), 1);
        assert_eq!(board.cell(4).unwrap().adjacent_mine_count(), 1);
        assert_eq!(board.cell(8).unwrap().adjacent_mine_count(), 0);
    }

    #[test]
    fn flood_fill_from_opposite_corner_wins() {
        let mut board = board(3, 3, &[0]);

        let outcome = board.open(8).unwrap();

        assert_eq!(outcome, OpenOutcome::Won);
        assert_eq!(board.opened_count(), 8);
        assert!(board.is_won());
        assert!(!board.cell(0).unwrap().is_opened());
        assert_eq!(board.view(0).unwrap(), CellView::Mine);
    }

    #[test]
    fn opening_a_mine_loses_without_flood_fill() {
        let mut board = board(3, 3, &[0]);

        let outcome = board.open(0).unwrap();

        assert_eq!(outcome, OpenOutcome::Lost);
        assert_eq!(board.opened_count(), 1);
        assert!(board.is_lost());
        assert_eq!(board.triggered_mine(), Some(0));
        assert_eq!(board.view(0).unwrap(), CellView::Exploded);
        assert_eq!(board.view(8).unwrap(), CellView::Hidden);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // column 2 is a wall of mines
        let mut board = board(4, 4, &[2, 6, 10, 14]);

        let outcome = board.open(0).unwrap();

        assert_eq!(outcome, OpenOutcome::Opened(0));
        for row in 0..4 {
            let left = row * 4;
            assert!(board.cell(left).unwrap().is_opened());
            assert!(board.cell(left + 1).unwrap().is_opened());
            assert!(!board.cell(left + 2).unwrap().is_opened());
            assert!(!board.cell(left + 3).unwrap().is_opened());
        }
        assert_eq!(board.opened_count(), 8);
        assert_eq!(opened_cells(&board), 8);
        assert!(!board.is_finished());
    }

    #[test]
    fn numbered_cell_opens_alone() {
        let mut board = board(3, 3, &[0]);

        assert_eq!(board.open(4).unwrap(), OpenOutcome::Opened(1));
        assert_eq!(board.opened_count(), 1);
    }

    #[test]
    fn reopening_is_a_no_op() {
        let mut board = board(3, 3, &[0]);
        board.open(4).unwrap();

        assert_eq!(board.open(4).unwrap(), OpenOutcome::AlreadyOpen);
        assert_eq!(board.opened_count(), 1);
    }

    #[test]
    fn invalid_index_is_rejected() {
        let mut board = board(3, 3, &[0]);

        assert_eq!(board.open(9), Err(GameError::OutOfRange));
        assert_eq!(board.opened_count(), 0);
    }

    #[test]
    fn finished_board_accepts_no_new_opens() {
        let mut board = board(3, 3, &[0]);
        board.open(0).unwrap();

        assert_eq!(board.open(8), Err(GameError::RoundFinished));
        assert_eq!(board.open(0).unwrap(), OpenOutcome::AlreadyOpen);
        assert_eq!(board.opened_count(), 1);
        assert_eq!(board.state(), BoardState::Lost);
    }

    #[test]
    fn win_requires_every_safe_cell() {
        let mut board = board(1, 3, &[1]);

        assert_eq!(board.open(0).unwrap(), OpenOutcome::Opened(1));
        assert!(!board.is_won());
        assert_eq!(board.open(2).unwrap(), OpenOutcome::Won);
        assert!(board.is_won());
        assert_eq!(board.opened_count(), board.total_cells() - board.mine_count());
        assert!(board.cells().filter(|c| c.is_opened()).all(|c| !c.has_mine()));
    }

    #[test]
    fn opened_count_tracks_opened_cells() {
        let mut board = board(5, 5, &[12, 24]);

        for index in [0, 4, 20, 3, 0] {
            if board.is_finished() {
                break;
            }
            board.open(index).unwrap();
            assert_eq!(usize::from(board.opened_count()), opened_cells(&board));
        }
    }

    #[test]
    fn flood_fill_handles_large_boards() {
        let mut board = board(200, 200, &[0]);

        let outcome = board.open(39_999).unwrap();

        assert_eq!(outcome, OpenOutcome::Won);
        assert_eq!(board.opened_count(), 39_999);
    }
}
