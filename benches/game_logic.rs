use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3::core::{find_match, BoardConfig, GameEngine, PathFinder};
use match3::engine::{autoplay, find_swap, legal_swaps};
use match3::types::Coord;

fn config() -> Arc<BoardConfig> {
    Arc::new(BoardConfig::full(9, 9, 5).unwrap())
}

fn bench_start_game(c: &mut Criterion) {
    let config = config();
    c.bench_function("start_game_9x9", |b| {
        b.iter(|| {
            let mut engine = GameEngine::new(black_box(12345));
            engine.start_game(config.clone());
            engine
        })
    });
}

fn bench_swap_cascade(c: &mut Criterion) {
    let config = config();
    c.bench_function("first_swap_cascade", |b| {
        b.iter(|| {
            let mut engine = GameEngine::new(12345);
            engine.start_game(config.clone());
            if let Some((a, b)) = engine.board().and_then(find_swap) {
                engine.swap_and_eliminate(a, b);
            }
            while engine.pop_action_group().is_some() {}
        })
    });
}

fn bench_autoplay(c: &mut Criterion) {
    let config = config();
    c.bench_function("autoplay_10_swaps", |b| {
        b.iter(|| {
            let mut engine = GameEngine::new(7);
            engine.start_game(config.clone());
            autoplay(&mut engine, black_box(10))
        })
    });
}

fn bench_find_match(c: &mut Criterion) {
    let mut engine = GameEngine::new(12345);
    engine.start_game(config());
    let board = engine.board().unwrap().clone();

    c.bench_function("find_match_all_cells", |b| {
        b.iter(|| {
            let mut total = 0;
            board.visit(|pos, _| total += find_match(&board, black_box(pos)).len());
            total
        })
    });
}

fn bench_legal_swaps(c: &mut Criterion) {
    let mut engine = GameEngine::new(12345);
    engine.start_game(config());
    let board = engine.board().unwrap().clone();

    c.bench_function("legal_swaps_9x9", |b| b.iter(|| legal_swaps(black_box(&board))));
}

fn bench_distance_to_top(c: &mut Criterion) {
    let config = config();
    c.bench_function("distance_to_top_cold", |b| {
        b.iter(|| {
            let mut path = PathFinder::new(config.clone());
            path.distance_to_top(black_box(Coord::new(4, 0)))
        })
    });
}

fn bench_shortest_path(c: &mut Criterion) {
    let path = PathFinder::new(config());
    c.bench_function("shortest_path_corner_to_corner", |b| {
        b.iter(|| path.shortest_path(black_box(Coord::new(0, 0)), Coord::new(8, 8)))
    });
}

criterion_group!(
    benches,
    bench_start_game,
    bench_swap_cascade,
    bench_autoplay,
    bench_find_match,
    bench_legal_swaps,
    bench_distance_to_top,
    bench_shortest_path
);
criterion_main!(benches);
