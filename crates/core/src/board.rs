//! Board module - manages the game grid
//!
//! The board is an irregular grid: a `width x height` rectangle where the
//! [`BoardConfig`] mask marks holes that never hold tiles. Every cell is one of
//! `Unwalkable`, `Empty` or `Tile(type)`.
//! Uses a flat row-major array (`row * width + col`, row 0 at the bottom).
//!
//! The board also carries the [`SearchScope`]: the bounding rectangle of cells
//! touched during the current cascade. Refill scans only that rectangle.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::config::BoardConfig;
use crate::rng::TileSource;
use crate::snapshot::BoardSnapshot;
use crate::types::{Cell, Coord, TileType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    CellCountMismatch { expected: usize, actual: usize },
    MaskMismatch(Coord),
    TypeOutOfRange(Coord),
}

impl BoardError {
    pub fn code(self) -> &'static str {
        match self {
            BoardError::CellCountMismatch { .. } => "cell_count_mismatch",
            BoardError::MaskMismatch(_) => "mask_mismatch",
            BoardError::TypeOutOfRange(_) => "type_out_of_range",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BoardError::CellCountMismatch { .. } => "cell count must equal width * height",
            BoardError::MaskMismatch(_) => "cell walkability disagrees with the layout mask",
            BoardError::TypeOutOfRange(_) => "tile type outside 1..=type_num",
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BoardError::CellCountMismatch { expected, actual } => {
                write!(f, "{} (expected {}, got {})", self.message(), expected, actual)
            }
            BoardError::MaskMismatch(pos) | BoardError::TypeOutOfRange(pos) => {
                write!(f, "{} at {}", self.message(), pos)
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Bounding rectangle of recently touched cells.
///
/// An empty scope has `min > max` on both axes and iterates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchScope {
    pub min_row: i32,
    pub min_col: i32,
    pub max_row: i32,
    pub max_col: i32,
}

impl SearchScope {
    pub const EMPTY: SearchScope = SearchScope {
        min_row: i32::MAX,
        min_col: i32::MAX,
        max_row: i32::MIN,
        max_col: i32::MIN,
    };

    /// The whole `width x height` board.
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            min_row: 0,
            min_col: 0,
            max_row: height - 1,
            max_col: width - 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    pub fn is_empty(&self) -> bool {
        self.min_row > self.max_row || self.min_col > self.max_col
    }

    /// Widen the scope so it covers `pos` plus a one-cell margin, clamped to
    /// the board. Positions outside the board are ignored.
    pub fn touch(&mut self, pos: Coord, width: i32, height: i32) {
        if pos.col < 0 || pos.col >= width || pos.row < 0 || pos.row >= height {
            return;
        }

        if pos.col <= self.min_col {
            self.min_col = (pos.col - 1).max(0);
        }
        if pos.col >= self.max_col {
            self.max_col = (pos.col + 1).min(width - 1);
        }
        if pos.row <= self.min_row {
            self.min_row = (pos.row - 1).max(0);
        }
        if pos.row >= self.max_row {
            self.max_row = (pos.row + 1).min(height - 1);
        }
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.rows().contains(&pos.row) && self.cols().contains(&pos.col)
    }

    pub fn rows(&self) -> RangeInclusive<i32> {
        self.min_row..=self.max_row
    }

    pub fn cols(&self) -> RangeInclusive<i32> {
        self.min_col..=self.max_col
    }

    /// Row-major iteration (bottom row first) over every covered coordinate.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| Coord::new(col, row)))
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The mutable grid for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    config: Arc<BoardConfig>,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
    scope: SearchScope,
}

impl Board {
    /// Create a board with every walkable cell empty.
    pub fn new(config: Arc<BoardConfig>) -> Self {
        let cells = config
            .layout()
            .iter()
            .map(|&walkable| if walkable { Cell::Empty } else { Cell::Unwalkable })
            .collect();
        Self {
            config,
            cells,
            scope: SearchScope::EMPTY,
        }
    }

    /// Restore a board from explicit cell contents.
    pub fn from_cells(config: Arc<BoardConfig>, cells: Vec<Cell>) -> Result<Self, BoardError> {
        if cells.len() != config.len() {
            return Err(BoardError::CellCountMismatch {
                expected: config.len(),
                actual: cells.len(),
            });
        }

        for (idx, cell) in cells.iter().enumerate() {
            let pos = config.to_coord(idx);
            if cell.is_walkable() != config.layout()[idx] {
                return Err(BoardError::MaskMismatch(pos));
            }
            if let Cell::Tile(t) = *cell {
                if t == 0 || t > config.type_num() {
                    return Err(BoardError::TypeOutOfRange(pos));
                }
            }
        }

        Ok(Self {
            config,
            cells,
            scope: SearchScope::EMPTY,
        })
    }

    /// Restore a board from tile types in row-major order (row 0 first).
    ///
    /// `0` marks an empty cell. Cells the mask marks as holes must be `0`.
    pub fn from_types(config: Arc<BoardConfig>, types: &[TileType]) -> Result<Self, BoardError> {
        if types.len() != config.len() {
            return Err(BoardError::CellCountMismatch {
                expected: config.len(),
                actual: types.len(),
            });
        }

        let mut cells = Vec::with_capacity(types.len());
        for (idx, &t) in types.iter().enumerate() {
            let cell = match (config.layout()[idx], t) {
                (false, 0) => Cell::Unwalkable,
                (false, _) => return Err(BoardError::MaskMismatch(config.to_coord(idx))),
                (true, 0) => Cell::Empty,
                (true, t) => Cell::Tile(t),
            };
            cells.push(cell);
        }
        Self::from_cells(config, cells)
    }

    /// Assign a random type to every walkable cell.
    pub(crate) fn fill<S: TileSource + ?Sized>(&mut self, source: &mut S) {
        let type_num = self.config.type_num();
        for cell in &mut self.cells {
            if cell.is_walkable() {
                *cell = Cell::Tile(source.next_type(type_num));
            }
        }
    }

    pub fn config(&self) -> &Arc<BoardConfig> {
        &self.config
    }

    pub fn width(&self) -> i32 {
        self.config.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.config.height() as i32
    }

    pub fn type_num(&self) -> TileType {
        self.config.type_num()
    }

    #[inline]
    pub fn to_index(&self, pos: Coord) -> Option<usize> {
        self.config.to_index(pos)
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        self.config.in_bounds(pos)
    }

    /// Get cell at `pos`. Returns None if out of bounds.
    pub fn get(&self, pos: Coord) -> Option<Cell> {
        self.to_index(pos).map(|idx| self.cells[idx])
    }

    pub fn tile_at(&self, pos: Coord) -> Option<TileType> {
        self.get(pos).and_then(Cell::tile)
    }

    /// In bounds and holding a tile.
    pub fn has_tile(&self, pos: Coord) -> bool {
        self.tile_at(pos).is_some()
    }

    /// In bounds, walkable and currently without a tile.
    pub fn is_empty_at(&self, pos: Coord) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    pub fn is_walkable(&self, pos: Coord) -> bool {
        self.config.is_walkable(pos)
    }

    /// Both positions on the board and exactly one step apart horizontally or
    /// vertically.
    pub fn is_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.in_bounds(a) && self.in_bounds(b) && a.is_neighbor(b)
    }

    /// Set cell at `pos`. Returns false if out of bounds.
    pub(crate) fn set(&mut self, pos: Coord, cell: Cell) -> bool {
        match self.to_index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange the contents of two cells. Returns false if either is out of bounds.
    pub(crate) fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.to_index(a), self.to_index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Copy of this board with two tiles exchanged, for look-ahead.
    ///
    /// Returns None unless both positions hold tiles.
    pub fn with_swapped(&self, a: Coord, b: Coord) -> Option<Board> {
        if !self.has_tile(a) || !self.has_tile(b) {
            return None;
        }
        let mut next = self.clone();
        next.swap(a, b);
        Some(next)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Call `f` for every cell in storage order.
    pub fn visit<F: FnMut(Coord, Cell)>(&self, mut f: F) {
        for (idx, &cell) in self.cells.iter().enumerate() {
            f(self.config.to_coord(idx), cell);
        }
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.tile().is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub(crate) fn touch(&mut self, pos: Coord) {
        let (w, h) = (self.width(), self.height());
        self.scope.touch(pos, w, h);
    }

    pub(crate) fn reset_scope(&mut self) {
        self.scope.reset();
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.width = self.config.width();
        out.height = self.config.height();
        out.cells.clear();
        out.cells.extend(self.cells.iter().map(|c| c.to_u8()));
        out.board_hash = out.compute_hash();
    }
}

/// Rows top-first: `#` hole, `.` empty, tiles as `1`-`9` then `a`-`z`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height()).rev() {
            for col in 0..self.width() {
                let ch = match self.get(Coord::new(col, row)) {
                    Some(Cell::Unwalkable) | None => '#',
                    Some(Cell::Empty) => '.',
                    Some(Cell::Tile(t)) => tile_char(t),
                };
                write!(f, "{}", ch)?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Single-character label for a tile type: `1`-`9`, then `a`-`z`.
pub fn tile_char(t: TileType) -> char {
    match t {
        1..=9 => (b'0' + t) as char,
        10..=35 => (b'a' + t - 10) as char,
        _ => '?',
    }
}
