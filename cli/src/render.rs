use sapper_core::{Board, CellView, Grid, MineLayout};
use std::fmt::Write;

/// Draws a grid with 1-based row/column headers, one glyph per cell.
fn render_grid(grid: Grid, mut glyph: impl FnMut(u16) -> char) -> String {
    let mut out = String::from("   ");
    for col in 1..=grid.cols() {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    let cols = u16::from(grid.cols());
    for index in grid.iter_indices() {
        let col = index % cols;
        if col == 0 {
            let _ = write!(out, "{:>3}", index / cols + 1);
        }
        let _ = write!(out, "{:>3}", glyph(index));
        if col + 1 == cols {
            out.push('\n');
        }
    }
    out
}

/// The placer's view: placed mines and empty cells.
pub fn render_layout(layout: &MineLayout) -> String {
    render_grid(layout.grid(), |index| {
        if layout.contains(index) { '*' } else { '.' }
    })
}

/// The revealer's view; mines appear once the round is over.
pub fn render_board(board: &Board) -> String {
    render_grid(board.grid(), |index| match board.view(index) {
        Ok(CellView::Hidden) | Err(_) => '#',
        Ok(CellView::Opened(0)) => '.',
        Ok(CellView::Opened(count)) => char::from(b'0' + count),
        Ok(CellView::Mine) => '*',
        Ok(CellView::Exploded) => 'X',
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_shows_placed_mines() {
        let grid = Grid::new(2, 3).unwrap();
        let layout = MineLayout::from_mine_indices(grid, &[1]).unwrap();

        assert_eq!(
            render_layout(&layout),
            "     1  2  3\n  1  .  *  .\n  2  .  .  .\n"
        );
    }

    #[test]
    fn board_hides_mines_until_finished() {
        let grid = Grid::new(1, 3).unwrap();
        let mut board = Board::new(&MineLayout::from_mine_indices(grid, &[2]).unwrap()).unwrap();

        board.open(1).unwrap();
        assert_eq!(render_board(&board), "     1  2  3\n  1  #  1  #\n");

        board.open(2).unwrap();
        assert_eq!(render_board(&board), "     1  2  3\n  1  #  1  X\n");
    }

    #[test]
    fn won_board_reveals_mines() {
        let grid = Grid::new(1, 3).unwrap();
        let mut board = Board::new(&MineLayout::from_mine_indices(grid, &[0]).unwrap()).unwrap();

        board.open(2).unwrap();

        assert_eq!(render_board(&board), "     1  2  3\n  1  *  1  .\n");
    }
}
