//! Layout files
//!
//! A layout is a JSON document with a `type_num` and one of two grid forms,
//! both listed visually (top row first):
//!
//! ```json
//! { "type_num": 5, "rows": ["#####", "#.#.#", "#####"] }
//! { "type_num": 5, "width": 3, "height": 2, "tiles": [1, 1, 1, 0, 1, 1] }
//! ```
//!
//! In `rows`, `#`, `x` and `1` are playable, `.`, `0` and space are holes.
//! In `tiles` any non-zero entry is playable (tile-map exports). Rows are flipped
//! on load so that row 0 of the resulting [`BoardConfig`] is the bottom.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use match3_core::{BoardConfig, ConfigError};
use serde::Deserialize;

#[derive(Debug)]
pub enum LayoutError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    MissingGrid,
    AmbiguousGrid,
    RaggedRows { row: usize, expected: usize, actual: usize },
    BadCell { row: usize, col: usize, ch: char },
    Config(ConfigError),
}

impl LayoutError {
    pub fn code(&self) -> &'static str {
        match self {
            LayoutError::Io { .. } => "io",
            LayoutError::Json(_) => "json",
            LayoutError::MissingGrid => "missing_grid",
            LayoutError::AmbiguousGrid => "ambiguous_grid",
            LayoutError::RaggedRows { .. } => "ragged_rows",
            LayoutError::BadCell { .. } => "bad_cell",
            LayoutError::Config(e) => e.code(),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LayoutError::Io { .. } => "cannot read layout file",
            LayoutError::Json(_) => "layout is not valid JSON",
            LayoutError::MissingGrid => "layout needs either `rows` or `width`/`height`/`tiles`",
            LayoutError::AmbiguousGrid => "layout has both `rows` and `tiles`",
            LayoutError::RaggedRows { .. } => "all rows must have the same length",
            LayoutError::BadCell { .. } => "unknown cell character",
            LayoutError::Config(e) => e.message(),
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Io { path, source } => {
                write!(f, "{} {}: {}", self.message(), path.display(), source)
            }
            LayoutError::Json(e) => write!(f, "{}: {}", self.message(), e),
            LayoutError::RaggedRows {
                row,
                expected,
                actual,
            } => write!(
                f,
                "{} (row {} has {} cells, expected {})",
                self.message(),
                row,
                actual,
                expected
            ),
            LayoutError::BadCell { row, col, ch } => {
                write!(f, "{} {:?} at row {}, column {}", self.message(), ch, row, col)
            }
            LayoutError::Config(e) => write!(f, "{}", e),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Io { source, .. } => Some(source),
            LayoutError::Json(e) => Some(e),
            LayoutError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Json(e)
    }
}

impl From<ConfigError> for LayoutError {
    fn from(e: ConfigError) -> Self {
        LayoutError::Config(e)
    }
}

// Extra keys (names, editor metadata) are ignored.
#[derive(Debug, Deserialize)]
struct LayoutFile {
    type_num: u8,
    #[serde(default)]
    rows: Option<Vec<String>>,
    #[serde(default)]
    width: Option<usize>,
    #[serde(default)]
    height: Option<usize>,
    #[serde(default)]
    tiles: Option<Vec<u32>>,
}

/// Parse a layout document into a validated config.
pub fn parse_layout(json: &str) -> Result<BoardConfig, LayoutError> {
    let file: LayoutFile = serde_json::from_str(json)?;

    let (width, height, top_first) = match (&file.rows, &file.tiles) {
        (Some(_), Some(_)) => return Err(LayoutError::AmbiguousGrid),
        (Some(rows), None) => parse_rows(rows)?,
        (None, Some(tiles)) => {
            let (Some(width), Some(height)) = (file.width, file.height) else {
                return Err(LayoutError::MissingGrid);
            };
            let mask = tiles.iter().map(|&t| t != 0).collect();
            (width, height, mask)
        }
        (None, None) => return Err(LayoutError::MissingGrid),
    };

    let layout = flip_rows(&top_first, width);
    Ok(BoardConfig::new(width, height, file.type_num, layout)?)
}

/// Read and parse a layout file.
pub fn load_layout(path: impl AsRef<Path>) -> Result<BoardConfig, LayoutError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LayoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout(&json)
}

fn parse_rows(rows: &[String]) -> Result<(usize, usize, Vec<bool>), LayoutError> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut mask = Vec::with_capacity(width * rows.len());

    for (row, line) in rows.iter().enumerate() {
        let actual = line.chars().count();
        if actual != width {
            return Err(LayoutError::RaggedRows {
                row,
                expected: width,
                actual,
            });
        }
        for (col, ch) in line.chars().enumerate() {
            let walkable = match ch {
                '#' | 'x' | 'X' | '1' => true,
                '.' | '0' | ' ' => false,
                _ => return Err(LayoutError::BadCell { row, col, ch }),
            };
            mask.push(walkable);
        }
    }
    Ok((width, rows.len(), mask))
}

/// Reverse the row order of a row-major grid.
///
/// A mask whose length is not a multiple of `width` is returned unchanged so
/// the config constructor can report the size mismatch.
fn flip_rows(cells: &[bool], width: usize) -> Vec<bool> {
    if width == 0 || cells.len() % width != 0 {
        return cells.to_vec();
    }
    cells.chunks(width).rev().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use match3_types::Coord;

    #[test]
    fn rows_are_flipped_bottom_first() {
        let config = parse_layout(r####"{ "type_num": 4, "rows": ["#..", "###"] }"####).unwrap();
        assert_eq!((config.width(), config.height()), (3, 2));
        assert!(config.is_walkable(Coord::new(0, 1)));
        assert!(!config.is_walkable(Coord::new(1, 1)));
        assert!(config.is_walkable(Coord::new(2, 0)));
        assert_eq!(config.top_line(), 1);
    }

    #[test]
    fn tile_map_form() {
        let json = r####"{ "type_num": 3, "width": 2, "height": 2, "tiles": [0, 7, 1, 1] }"####;
        let config = parse_layout(json).unwrap();
        // Top row [0, 7] becomes row 1.
        assert!(!config.is_walkable(Coord::new(0, 1)));
        assert!(config.is_walkable(Coord::new(1, 1)));
        assert_eq!(config.walkable_count(), 3);
    }

    #[test]
    fn shape_errors() {
        let err = parse_layout(r####"{ "type_num": 4, "rows": ["##", "#"] }"####).unwrap_err();
        assert_eq!(err.code(), "ragged_rows");

        let err = parse_layout(r####"{ "type_num": 4, "rows": ["#?"] }"####).unwrap_err();
        assert!(matches!(err, LayoutError::BadCell { col: 1, ch: '?', .. }));

        let err = parse_layout(r####"{ "type_num": 4 }"####).unwrap_err();
        assert_eq!(err.code(), "missing_grid");

        let err = parse_layout(r####"{ "type_num": 4, "rows": ["#"], "tiles": [1] }"####).unwrap_err();
        assert_eq!(err.code(), "ambiguous_grid");
    }

    #[test]
    fn config_errors_pass_through() {
        let err = parse_layout(r####"{ "type_num": 1, "rows": ["###"] }"####).unwrap_err();
        assert_eq!(err.code(), "too_few_types");

        let err = parse_layout(r####"{ "type_num": 3, "rows": ["..."] }"####).unwrap_err();
        assert_eq!(err.code(), "no_walkable_cells");

        let json = r####"{ "type_num": 3, "width": 2, "height": 2, "tiles": [1, 1, 1] }"####;
        let err = parse_layout(json).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Config(ConfigError::LayoutSizeMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn extra_keys_are_ignored_but_bad_json_is_not() {
        let config = parse_layout(r####"{ "name": "tiny", "type_num": 3, "rows": ["#"] }"####).unwrap();
        assert_eq!(config.len(), 1);

        let err = parse_layout(r####"{ "type_num": 3, "rows": "#" }"####).unwrap_err();
        assert_eq!(err.code(), "json");
    }
}
