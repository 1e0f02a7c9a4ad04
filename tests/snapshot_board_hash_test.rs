use std::sync::Arc;

use match3::core::{BoardConfig, BoardSnapshot, GameEngine};
use match3::engine::find_swap;

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

fn expected_hash(snap: &BoardSnapshot) -> u64 {
    let dims = [snap.width as u64, snap.height as u64];
    fnv1a64_bytes(
        dims.iter()
            .flat_map(|d| d.to_le_bytes())
            .chain(snap.cells.iter().copied()),
    )
}

#[test]
fn snapshot_into_sets_board_hash() {
    let mut engine = GameEngine::new(1);
    engine.start_game(Arc::new(BoardConfig::full(6, 6, 4).unwrap()));

    let mut snap = BoardSnapshot::default();
    engine.board().unwrap().snapshot_into(&mut snap);
    assert_eq!(snap.board_hash, expected_hash(&snap));
    let before = snap.board_hash;

    let (a, b) = engine.board().and_then(find_swap).unwrap();
    assert!(engine.swap_and_eliminate(a, b));

    engine.board().unwrap().snapshot_into(&mut snap);
    assert_eq!(snap.board_hash, expected_hash(&snap));
    assert_ne!(snap.board_hash, before);
}

#[test]
fn hash_covers_dimensions() {
    let wide = BoardConfig::full(4, 1, 3).unwrap();
    let tall = BoardConfig::full(1, 4, 3).unwrap();
    let mut engine = GameEngine::new(5);
    engine.start_game(Arc::new(wide));
    let a = engine.board().unwrap().snapshot();

    let mut engine = GameEngine::new(5);
    engine.start_game(Arc::new(tall));
    let b = engine.board().unwrap().snapshot();

    assert_eq!(a.cells, b.cells);
    assert_ne!(a.board_hash, b.board_hash);
}
