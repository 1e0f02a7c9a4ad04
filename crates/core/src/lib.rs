//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains the whole match-3 board simulation. It has **no
//! dependencies** on rendering, timing, input or I/O, making it:
//!
//! - **Deterministic**: same seed and same swaps produce identical boards and action streams
//! - **Testable**: boards can be restored from explicit fixtures
//! - **Portable**: runs headless, in a terminal, or behind any animation layer
//!
//! # Module Structure
//!
//! - [`config`]: immutable board shape (size, walkability mask, tile type count)
//! - [`board`]: mutable grid of cells plus the search scope of the current cascade
//! - [`matcher`]: runs of three or more through a given cell
//! - [`path`]: walkable-mask path finding used by the refill tie-break
//! - [`refill`]: top-line spawning and gravity/sideways shifting
//! - [`queue`]: ordered action groups handed to the presentation layer
//! - [`engine`]: the public state machine (start, swap, cascade)
//! - [`rng`]: seeded tile source
//! - [`snapshot`]: plain-data board copies with a stable hash
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use match3_core::{BoardConfig, GameEngine};
//! use match3_types::{ActionKind, Coord};
//!
//! let config = Arc::new(BoardConfig::full(5, 3, 3).unwrap());
//! let mut engine = GameEngine::new(12345);
//! engine.start_game(config);
//!
//! let start = engine.take_action_group();
//! assert_eq!(start.kind(), Some(ActionKind::Start));
//!
//! // Swaps only succeed when they line up three or more tiles.
//! let a = Coord::new(0, 0);
//! let b = Coord::new(1, 0);
//! assert!(engine.is_adjacent(a, b));
//! let _ = engine.swap_and_eliminate(a, b);
//! assert!(engine.pending_group_count() >= 1);
//! ```
//!
//! # Consuming actions
//!
//! The engine never waits for the consumer. A presentation layer registers a
//! hook with [`GameEngine::on_group_enqueued`], then pulls groups one at a time
//! with [`GameEngine::pop_action_group`], applying each group fully before
//! pulling the next.

pub mod board;
pub mod config;
pub mod engine;
pub mod matcher;
pub mod path;
pub mod queue;
pub mod refill;
pub mod rng;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{tile_char, Board, BoardError, SearchScope};
pub use config::{BoardConfig, ConfigError};
pub use engine::{CascadeReport, GameEngine, MAX_CASCADE_ROUNDS};
pub use matcher::{find_match, find_matches, swap_creates_match};
pub use path::PathFinder;
pub use queue::ActionQueue;
pub use refill::{RefillEngine, RefillStep};
pub use rng::{ScriptedSource, SimpleRng, TileSource};
pub use snapshot::BoardSnapshot;
