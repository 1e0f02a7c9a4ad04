//! Match detection through a single cell
//!
//! [`find_match`] only reports runs that pass through the evaluated cell. A run of
//! three elsewhere on the same row or column is ignored; callers evaluate every
//! cell they changed instead of scanning the whole board.

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{Coord, MIN_RUN};

/// Length of the same-type run through `pos` along `(dc, dr)`, as its two ends.
fn run_through(board: &Board, pos: Coord, dc: i32, dr: i32) -> (Coord, Coord, usize) {
    let Some(t) = board.tile_at(pos) else {
        return (pos, pos, 0);
    };

    let mut lo = pos;
    while board.tile_at(lo.offset(-dc, -dr)) == Some(t) {
        lo = lo.offset(-dc, -dr);
    }
    let mut hi = pos;
    while board.tile_at(hi.offset(dc, dr)) == Some(t) {
        hi = hi.offset(dc, dr);
    }

    let len = (lo.manhattan(hi) + 1) as usize;
    (lo, hi, len)
}

fn collect_run(out: &mut BTreeSet<Coord>, lo: Coord, hi: Coord, dc: i32, dr: i32) {
    let mut cur = lo;
    loop {
        out.insert(cur);
        if cur == hi {
            break;
        }
        cur = cur.offset(dc, dr);
    }
}

/// Union of the vertical and horizontal runs through `pos` that are at least
/// [`MIN_RUN`] long. Empty when `pos` holds no tile or neither run qualifies.
pub fn find_match(board: &Board, pos: Coord) -> BTreeSet<Coord> {
    let mut out = BTreeSet::new();
    if !board.has_tile(pos) {
        return out;
    }

    for (dc, dr) in [(0, 1), (1, 0)] {
        let (lo, hi, len) = run_through(board, pos, dc, dr);
        if len >= MIN_RUN {
            collect_run(&mut out, lo, hi, dc, dr);
        }
    }
    out
}

/// Union of [`find_match`] over every position in `positions`.
pub fn find_matches<'a, I>(board: &Board, positions: I) -> BTreeSet<Coord>
where
    I: IntoIterator<Item = &'a Coord>,
{
    let mut out = BTreeSet::new();
    for &pos in positions {
        out.extend(find_match(board, pos));
    }
    out
}

/// True when exchanging `a` and `b` would create a match through either cell.
pub fn swap_creates_match(board: &Board, a: Coord, b: Coord) -> bool {
    if !board.is_adjacent(a, b) {
        return false;
    }
    match board.with_swapped(a, b) {
        Some(next) => !find_match(&next, a).is_empty() || !find_match(&next, b).is_empty(),
        None => false,
    }
}
