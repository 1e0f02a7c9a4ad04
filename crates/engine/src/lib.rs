//! Engine helpers built on top of `match3-core`.
//!
//! - [`swap`]: validated player swaps with typed rejection reasons
//! - [`hint`]: legal swap enumeration for hints and bots
//! - [`autoplay`]: a simple bot that keeps playing the first legal swap

pub mod autoplay;
pub mod hint;
pub mod swap;

pub use autoplay::{autoplay, autoplay_with, AutoplayReport};
pub use hint::{find_swap, is_stuck, legal_swaps};
pub use swap::{apply_swap, SwapError};
