//! Terminal presentation for match-3 boards.
//!
//! - [`playback`]: consumer-side mirror of the board driven by action groups
//! - [`board_view`]: pure mapping from cells to a styled [`Canvas`]
//! - [`renderer`]: crossterm encoding of canvases, inline or on an alternate screen
//!
//! `core` stays free of terminal concerns; everything here only reads boards
//! and action groups.

pub mod board_view;
pub mod fb;
pub mod playback;
pub mod renderer;

pub use match3_core as core;
pub use match3_types as types;

pub use board_view::{tile_color, BoardView};
pub use fb::{Canvas, Glyph, Rgb, Style};
pub use playback::Playback;
pub use renderer::{encode_changes_into, encode_lines_into, render_board, Screen};
