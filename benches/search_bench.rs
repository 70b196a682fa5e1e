use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hourglass::{Board, Engine};

// Italian game middlegame, both sides developed
const MIDDLEGAME_FEN: &str =
    "r1bq1rk1/pppp1ppp/2n2n2/2b1p3/2B1P3/2NP1N2/PPP2PPP/R1BQ1RK1 w - - 6 6";

fn bench_search_middlegame(c: &mut Criterion) {
    let board = Board::from_fen(MIDDLEGAME_FEN).unwrap();
    c.bench_function("search middlegame 100ms", |b| {
        b.iter(|| {
            let mut engine = Engine::new();
            black_box(engine.choose_move(&board, Duration::from_millis(100)))
        })
    });
}

fn bench_search_start_position(c: &mut Criterion) {
    let board = Board::new();
    c.bench_function("search start position 100ms", |b| {
        b.iter(|| {
            let mut engine = Engine::new();
            black_box(engine.choose_move(&board, Duration::from_millis(100)))
        })
    });
}

criterion_group!(benches, bench_search_middlegame, bench_search_start_position);
criterion_main!(benches);
