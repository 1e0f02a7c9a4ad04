//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation core, replay files, terminal playback).
//!
//! # Coordinates
//!
//! Boards are addressed by `(col, row)` with **row 0 at the bottom** of the
//! visual board. Storage is row-major: `index = row * width + col`.
//!
//! Coordinates order row-first, then column. The ordering only exists so that
//! coordinates can key ordered sets and maps; it has no gameplay meaning.
//!
//! # Actions
//!
//! Every state change of the simulation is recorded as an [`Action`]. Actions that
//! happen at the same time are collected into one [`ActionGroup`]; groups are
//! strictly ordered and a presentation layer animates them one group at a time.
//!
//! | Kind | `tile_type` | `source` | `target` |
//! |------|-------------|----------|----------|
//! | `Start` | - | - | - |
//! | `Move` | tile now at `target` | swap origin | swap destination |
//! | `Remove` | removed tile | removed cell | - |
//! | `Generate` | new tile | spawn cell | - |
//! | `Autofill` | falling tile | origin | destination |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Action, ActionKind, Coord};
//!
//! let a = Coord::new(2, 3);
//! assert!(a.is_neighbor(Coord::new(2, 4)));
//! assert!(!a.is_neighbor(Coord::new(3, 4)));
//!
//! let fall = Action::autofill(4, Coord::new(1, 5), Coord::new(1, 4));
//! assert_eq!(fall.kind, ActionKind::Autofill);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Minimum run length that counts as a match.
pub const MIN_RUN: usize = 3;

/// Minimum number of distinct tile types a board must use.
pub const MIN_TYPE_NUM: u8 = 2;
/// Largest tile type; `0xFF` is the hole byte in [`Cell::to_u8`].
pub const MAX_TYPE_NUM: u8 = 254;

/// Tile type identifier, always in `1..=type_num`.
pub type TileType = u8;

/// Board coordinate. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Offset by `(dc, dr)`.
    pub const fn offset(self, dc: i32, dr: i32) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }

    pub const fn below(self) -> Self {
        self.offset(0, -1)
    }

    pub const fn above(self) -> Self {
        self.offset(0, 1)
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan(self, other: Coord) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// True when `other` is exactly one step away along exactly one axis.
    ///
    /// Diagonal neighbours are never neighbours.
    pub fn is_neighbor(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.col.cmp(&other.col))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((col, row): (i32, i32)) -> Self {
        Self::new(col, row)
    }
}

/// Content of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Hole or wall in the layout. Never holds a tile.
    Unwalkable,
    /// Playable cell without a tile.
    Empty,
    /// Playable cell holding a tile.
    Tile(TileType),
}

impl Cell {
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Unwalkable)
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn tile(self) -> Option<TileType> {
        match self {
            Cell::Tile(t) => Some(t),
            _ => None,
        }
    }

    /// Compact byte encoding: 0 = empty, 0xFF = unwalkable, otherwise the tile type.
    pub fn to_u8(self) -> u8 {
        match self {
            Cell::Unwalkable => 0xFF,
            Cell::Empty => 0,
            Cell::Tile(t) => t,
        }
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0xFF => Cell::Unwalkable,
            0 => Cell::Empty,
            t => Cell::Tile(t),
        }
    }
}

/// Kind of a recorded simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Full redraw: the board was (re)created.
    Start,
    /// Swap animation for one of the two swapped tiles.
    Move,
    /// A matched tile was removed.
    Remove,
    /// A new tile was spawned on the top line.
    Generate,
    /// A tile fell or shifted sideways into an empty cell.
    Autofill,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Start => "start",
            ActionKind::Move => "move",
            ActionKind::Remove => "remove",
            ActionKind::Generate => "generate",
            ActionKind::Autofill => "autofill",
        }
    }

    /// Parse kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(ActionKind::Start),
            "move" => Some(ActionKind::Move),
            "remove" => Some(ActionKind::Remove),
            "generate" => Some(ActionKind::Generate),
            "autofill" => Some(ActionKind::Autofill),
            _ => None,
        }
    }

    /// Whether a presentation layer animates this action over time.
    ///
    /// `Start` and `Move` are applied instantly; the swap animation itself is
    /// driven by the caller before it asks the engine to swap.
    pub fn is_animated(self) -> bool {
        matches!(
            self,
            ActionKind::Remove | ActionKind::Generate | ActionKind::Autofill
        )
    }
}

/// One recorded change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub kind: ActionKind,
    pub tile_type: Option<TileType>,
    pub source: Option<Coord>,
    pub target: Option<Coord>,
}

impl Action {
    pub fn start() -> Self {
        Self {
            kind: ActionKind::Start,
            tile_type: None,
            source: None,
            target: None,
        }
    }

    pub fn moved(tile_type: TileType, source: Coord, target: Coord) -> Self {
        Self {
            kind: ActionKind::Move,
            tile_type: Some(tile_type),
            source: Some(source),
            target: Some(target),
        }
    }

    pub fn remove(tile_type: TileType, at: Coord) -> Self {
        Self {
            kind: ActionKind::Remove,
            tile_type: Some(tile_type),
            source: Some(at),
            target: None,
        }
    }

    pub fn generate(tile_type: TileType, at: Coord) -> Self {
        Self {
            kind: ActionKind::Generate,
            tile_type: Some(tile_type),
            source: Some(at),
            target: None,
        }
    }

    pub fn autofill(tile_type: TileType, source: Coord, target: Coord) -> Self {
        Self {
            kind: ActionKind::Autofill,
            tile_type: Some(tile_type),
            source: Some(source),
            target: Some(target),
        }
    }
}

/// Ordered actions that logically happen at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionGroup(Vec<Action>);

impl ActionGroup {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, action: Action) {
        self.0.push(action);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Action> {
        self.0
    }

    /// Kind shared by every action, if the group is homogeneous.
    pub fn kind(&self) -> Option<ActionKind> {
        let first = self.0.first()?.kind;
        self.0.iter().all(|a| a.kind == first).then_some(first)
    }

    /// Number of actions a presentation layer has to wait for.
    pub fn animated_count(&self) -> usize {
        self.0.iter().filter(|a| a.kind.is_animated()).count()
    }
}

impl From<Vec<Action>> for ActionGroup {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

impl FromIterator<Action> for ActionGroup {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ActionGroup {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActionGroup {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
