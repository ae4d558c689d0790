#![allow(unused)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dlx_sudoku_solver::builder::build;
use dlx_sudoku_solver::dlx::DlxMatrix;
use dlx_sudoku_solver::sudoku::parse_grid;

const PUZZLES: [(&str, &[u8]); 3] = [
    (
        "easy",
        b"53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
    ),
    ("empty", &[b'.'; 81]),
    (
        "near-full",
        b"534678912672195348198342567859761423426853791713924856961537284287419635345286.9",
    ),
];

fn solve_once(bytes: &[u8]) {
    let grid = parse_grid(bytes);
    let mut matrix = DlxMatrix::new();
    matrix.init();
    let base = build(&mut matrix, &grid);
    black_box(matrix.alg_x_itr_search(base));
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("DlxSolve");
    for (name, bytes) in PUZZLES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(name), bytes, |b, bytes| {
            b.iter(|| solve_once(bytes))
        });
    }
}

criterion_group!(benches, bench_solver);
criterion_main!(benches);
