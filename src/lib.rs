//! Match-3 board simulator (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `match3::{types,core,engine,io,term}` and hosts the CLI.

pub use match3_core as core;
pub use match3_engine as engine;
pub use match3_io as io;
pub use match3_term as term;
pub use match3_types as types;

pub mod cli;
