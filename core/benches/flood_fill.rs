use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use sapper_core::{Board, Grid, MineLayout};
use std::hint::black_box;

fn board(rows: u8, cols: u8, mines: &[u16]) -> Board {
    let grid = Grid::new(rows, cols).expect("valid grid");
    let layout = MineLayout::from_mine_indices(grid, mines).expect("valid layout");
    Board::new(&layout).expect("complete layout")
}

fn bench_flood_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");

    for (name, rows, cols) in [("desktop", 10, 12), ("large", 100, 100), ("max", 255, 255)] {
        let template = board(rows, cols, &[0]);
        let last = template.total_cells() - 1;
        group.bench_function(name, |b| {
            b.iter_batched(
                || template.clone(),
                |mut board| black_box(board.open(last)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flood_fill);
criterion_main!(benches);
