//! RNG module - tile type generation
//!
//! The engine draws every new tile from a [`TileSource`]. The default source is
//! [`SimpleRng`], a small LCG, so that the same seed always produces the same
//! board and the same cascade (useful for fixtures and replays).
//!
//! Tests can plug in any other source, e.g. a scripted sequence.

use crate::types::TileType;

/// Supplies tile types for filling and spawning.
pub trait TileSource {
    /// Return a type uniformly distributed in `1..=type_num`.
    fn next_type(&mut self, type_num: TileType) -> TileType;
}

impl<S: TileSource + ?Sized> TileSource for &mut S {
    fn next_type(&mut self, type_num: TileType) -> TileType {
        (**self).next_type(type_num)
    }
}

impl<S: TileSource + ?Sized> TileSource for Box<S> {
    fn next_type(&mut self, type_num: TileType) -> TileType {
        (**self).next_type(type_num)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Maps through the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current generator state (reseeding with it continues the sequence).
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TileSource for SimpleRng {
    fn next_type(&mut self, type_num: TileType) -> TileType {
        self.next_range(type_num as u32) as TileType + 1
    }
}

/// Replays a fixed list of types, cycling when it runs out.
///
/// Values are clamped into `1..=type_num`.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    types: Vec<TileType>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(types: Vec<TileType>) -> Self {
        Self { types, cursor: 0 }
    }

    /// Number of types drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl TileSource for ScriptedSource {
    fn next_type(&mut self, type_num: TileType) -> TileType {
        if self.types.is_empty() {
            return 1;
        }
        let t = self.types[self.cursor % self.types.len()];
        self.cursor += 1;
        t.clamp(1, type_num)
    }
}
