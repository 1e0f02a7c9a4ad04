//! File formats around the simulation: layout files, a config repository and
//! replay logs of action groups.

pub mod layout;
pub mod replay;
pub mod repository;

pub use layout::{load_layout, parse_layout, LayoutError};
pub use replay::{read_groups, write_group, ActionRecord, GroupRecord, KindName, ReplayError};
pub use repository::LayoutRepository;
