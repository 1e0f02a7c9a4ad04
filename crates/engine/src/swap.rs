use match3_core::{CascadeReport, GameEngine, TileSource};
use match3_types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    NotStarted,
    OutOfBounds,
    NotAdjacent,
    NoTile,
    NoMatch,
}

impl SwapError {
    pub fn code(self) -> &'static str {
        match self {
            SwapError::NoMatch => "no_match",
            SwapError::NotStarted
            | SwapError::OutOfBounds
            | SwapError::NotAdjacent
            | SwapError::NoTile => "invalid_swap",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SwapError::NotStarted => "no game in progress",
            SwapError::OutOfBounds => "coordinate outside the board",
            SwapError::NotAdjacent => "cells are not horizontal or vertical neighbours",
            SwapError::NoTile => "both cells must hold a tile",
            SwapError::NoMatch => "swap creates no match and was reverted",
        }
    }
}

impl std::fmt::Display for SwapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for SwapError {}

/// Validate a player swap the way an input layer should, then run it.
///
/// The engine itself only checks that both cells hold tiles; adjacency is a
/// caller contract, enforced here.
pub fn apply_swap<S: TileSource>(
    engine: &mut GameEngine<S>,
    a: Coord,
    b: Coord,
) -> Result<CascadeReport, SwapError> {
    if !engine.is_started() {
        return Err(SwapError::NotStarted);
    }
    if !engine.in_bounds(a) || !engine.in_bounds(b) {
        return Err(SwapError::OutOfBounds);
    }
    if !engine.is_adjacent(a, b) {
        return Err(SwapError::NotAdjacent);
    }
    if !engine.has_tile(a) || !engine.has_tile(b) {
        return Err(SwapError::NoTile);
    }

    if !engine.swap_and_eliminate(a, b) {
        return Err(SwapError::NoMatch);
    }
    Ok(engine.last_cascade().unwrap_or_default())
}
