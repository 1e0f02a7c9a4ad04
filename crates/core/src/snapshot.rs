use crate::types::Cell;

/// Plain-data copy of a board, cheap to compare and hash.
///
/// Cells use the [`Cell::to_u8`] encoding: `0` empty, `0xFF` hole, otherwise the tile type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<u8>,
    pub board_hash: u64,
}

impl BoardSnapshot {
    /// FNV-1a 64-bit over the dimensions and cell bytes.
    pub fn compute_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        let dims = [self.width as u64, self.height as u64];
        let bytes = dims
            .iter()
            .flat_map(|d| d.to_le_bytes())
            .chain(self.cells.iter().copied());
        for b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x00000100000001B3);
        }
        h
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col).map(|&v| Cell::from_u8(v))
    }

    /// Rows top-first, each row left to right.
    pub fn rows_top_first(&self) -> Vec<Vec<u8>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width)
            .rev()
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_changes_with_content() {
        let mut snap = BoardSnapshot {
            width: 2,
            height: 1,
            cells: vec![1, 2],
            board_hash: 0,
        };
        let a = snap.compute_hash();
        snap.cells[1] = 3;
        assert_ne!(a, snap.compute_hash());
    }

    #[test]
    fn rows_top_first_flips() {
        let snap = BoardSnapshot {
            width: 2,
            height: 2,
            cells: vec![1, 2, 3, 0xFF],
            board_hash: 0,
        };
        assert_eq!(snap.rows_top_first(), vec![vec![3, 0xFF], vec![1, 2]]);
        assert_eq!(snap.cell(1, 1), Some(Cell::Unwalkable));
        assert_eq!(snap.cell(2, 0), None);
    }
}
