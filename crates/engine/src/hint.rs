//! Legal swap search
//!
//! A swap is legal when it exchanges two neighbouring tiles and the exchange
//! creates a match through either of them. Candidates are produced in row-major
//! order (bottom row first), pairing every tile with its right and upper
//! neighbour, so results are deterministic.

use match3_core::{swap_creates_match, Board};
use match3_types::Coord;

fn candidates(board: &Board) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    let (w, h) = (board.width(), board.height());
    (0..h)
        .flat_map(move |row| (0..w).map(move |col| Coord::new(col, row)))
        .flat_map(|pos| [(pos, pos.offset(1, 0)), (pos, pos.above())])
        .filter(move |&(a, b)| board.has_tile(a) && board.has_tile(b))
}

/// Every legal swap on `board`.
pub fn legal_swaps(board: &Board) -> Vec<(Coord, Coord)> {
    candidates(board)
        .filter(|&(a, b)| swap_creates_match(board, a, b))
        .collect()
}

/// First legal swap, if any.
pub fn find_swap(board: &Board) -> Option<(Coord, Coord)> {
    candidates(board).find(|&(a, b)| swap_creates_match(board, a, b))
}

/// True when no legal swap remains.
pub fn is_stuck(board: &Board) -> bool {
    find_swap(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_core::BoardConfig;
    use std::sync::Arc;

    fn board(width: usize, height: usize, types: &[u8]) -> Board {
        let config = Arc::new(BoardConfig::full(width, height, 9).unwrap());
        Board::from_types(config, types).unwrap()
    }

    #[test]
    fn finds_vertical_swap() {
        // row 1: 2 1 2
        // row 0: 1 2 1
        let b = board(3, 2, &[1, 2, 1, 2, 1, 2]);
        let swaps = legal_swaps(&b);
        assert!(swaps.contains(&(Coord::new(1, 0), Coord::new(1, 1))));
        assert_eq!(find_swap(&b), Some(swaps[0]));
    }

    #[test]
    fn stuck_board() {
        // row 1: 3 4 5
        // row 0: 1 2 6
        let b = board(3, 2, &[1, 2, 6, 3, 4, 5]);
        assert!(legal_swaps(&b).is_empty());
        assert!(is_stuck(&b));
    }

    #[test]
    fn holes_are_never_swapped() {
        // row 0: 1 # 1 1
        let layout = vec![true, false, true, true];
        let config = Arc::new(BoardConfig::new(4, 1, 3, layout).unwrap());
        let b = Board::from_types(config, &[1, 0, 1, 1]).unwrap();
        assert!(is_stuck(&b));
    }
}
