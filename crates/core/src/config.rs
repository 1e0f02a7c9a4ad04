//! Board configuration - the immutable shape of a board
//!
//! A [`BoardConfig`] describes which cells of a `width x height` rectangle are
//! playable and how many tile types a session uses. It is validated once on
//! construction and then shared (`Arc<BoardConfig>`) by every board built from it.
//!
//! Storage is row-major with row 0 at the bottom. Loaders that read top-first
//! formats are responsible for flipping rows before calling [`BoardConfig::new`].

use std::fmt;

use crate::types::{Coord, MAX_TYPE_NUM, MIN_TYPE_NUM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSize,
    TooFewTypes,
    TooManyTypes,
    LayoutSizeMismatch { expected: usize, actual: usize },
    NoWalkableCells,
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        match self {
            ConfigError::ZeroSize => "zero_size",
            ConfigError::TooFewTypes => "too_few_types",
            ConfigError::TooManyTypes => "too_many_types",
            ConfigError::LayoutSizeMismatch { .. } => "layout_size_mismatch",
            ConfigError::NoWalkableCells => "no_walkable_cells",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfigError::ZeroSize => "board width and height must be positive",
            ConfigError::TooFewTypes => "type_num must be at least 2",
            ConfigError::TooManyTypes => "type_num must be at most 254",
            ConfigError::LayoutSizeMismatch { .. } => "layout length must equal width * height",
            ConfigError::NoWalkableCells => "layout has no walkable cell",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LayoutSizeMismatch { expected, actual } => write!(
                f,
                "{} (expected {}, got {})",
                self.message(),
                expected,
                actual
            ),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable board shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    width: usize,
    height: usize,
    type_num: u8,
    /// Row-major walkability mask (row 0 = bottom).
    layout: Vec<bool>,
    top_line: i32,
}

impl BoardConfig {
    pub fn new(
        width: usize,
        height: usize,
        type_num: u8,
        layout: Vec<bool>,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(ConfigError::ZeroSize);
        }
        if type_num < MIN_TYPE_NUM {
            return Err(ConfigError::TooFewTypes);
        }
        if type_num > MAX_TYPE_NUM {
            return Err(ConfigError::TooManyTypes);
        }
        let expected = width * height;
        if layout.len() != expected {
            return Err(ConfigError::LayoutSizeMismatch {
                expected,
                actual: layout.len(),
            });
        }

        let top_line = (0..height)
            .rev()
            .find(|&row| layout[row * width..(row + 1) * width].iter().any(|&w| w))
            .ok_or(ConfigError::NoWalkableCells)? as i32;

        Ok(Self {
            width,
            height,
            type_num,
            layout,
            top_line,
        })
    }

    /// A fully walkable rectangle.
    pub fn full(width: usize, height: usize, type_num: u8) -> Result<Self, ConfigError> {
        Self::new(width, height, type_num, vec![true; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn type_num(&self) -> u8 {
        self.type_num
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    pub fn layout(&self) -> &[bool] {
        &self.layout
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.width
            && (pos.row as usize) < self.height
    }

    /// Row-major index of `pos`, or `None` when out of bounds.
    #[inline]
    pub fn to_index(&self, pos: Coord) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.row as usize * self.width + pos.col as usize)
    }

    #[inline]
    pub fn to_coord(&self, index: usize) -> Coord {
        Coord::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Mask lookup. Out-of-bounds positions are not walkable.
    pub fn is_walkable(&self, pos: Coord) -> bool {
        self.to_index(pos).is_some_and(|idx| self.layout[idx])
    }

    /// Highest row that contains at least one walkable cell.
    pub fn top_line(&self) -> i32 {
        self.top_line
    }

    pub fn walkable_count(&self) -> usize {
        self.layout.iter().filter(|&&w| w).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_configs() {
        assert_eq!(
            BoardConfig::new(0, 3, 3, vec![]).unwrap_err(),
            ConfigError::ZeroSize
        );
        assert_eq!(
            BoardConfig::full(3, 3, 1).unwrap_err(),
            ConfigError::TooFewTypes
        );
        assert_eq!(
            BoardConfig::full(3, 3, 255).unwrap_err(),
            ConfigError::TooManyTypes
        );
        assert_eq!(BoardConfig::full(3, 3, 254).unwrap().type_num(), 254);
        assert_eq!(
            BoardConfig::new(3, 3, 3, vec![true; 8]).unwrap_err(),
            ConfigError::LayoutSizeMismatch {
                expected: 9,
                actual: 8
            }
        );
        assert_eq!(
            BoardConfig::new(2, 2, 3, vec![false; 4]).unwrap_err(),
            ConfigError::NoWalkableCells
        );
    }

    #[test]
    fn top_line_uses_width_stride() {
        // 4 wide, 2 tall: only the bottom row is walkable. A height stride would
        // read index 2 for (0, 1) and wrongly see a walkable cell on row 1.
        let layout = vec![true, true, true, true, false, false, false, false];
        let config = BoardConfig::new(4, 2, 3, layout).unwrap();
        assert_eq!(config.top_line(), 0);

        let mut layout = vec![false; 12];
        layout[2 * 4 + 3] = true;
        let config = BoardConfig::new(4, 3, 3, layout).unwrap();
        assert_eq!(config.top_line(), 2);
    }

    #[test]
    fn index_and_coord_roundtrip() {
        let config = BoardConfig::full(5, 3, 3).unwrap();
        assert_eq!(config.to_index(Coord::new(0, 0)), Some(0));
        assert_eq!(config.to_index(Coord::new(4, 2)), Some(14));
        assert_eq!(config.to_index(Coord::new(5, 0)), None);
        assert_eq!(config.to_index(Coord::new(0, -1)), None);
        assert_eq!(config.to_coord(7), Coord::new(2, 1));
    }

    #[test]
    fn walkable_lookup() {
        let config = BoardConfig::new(2, 2, 2, vec![true, false, true, true]).unwrap();
        assert!(config.is_walkable(Coord::new(0, 0)));
        assert!(!config.is_walkable(Coord::new(1, 0)));
        assert!(!config.is_walkable(Coord::new(-1, 0)));
        assert_eq!(config.walkable_count(), 3);
    }
}
