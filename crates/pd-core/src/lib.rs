//! pd-core: lazy procedural generation of sectioned dungeon levels
//!
//! A level is a square grid of sections. Sections are generated (their
//! connections decided) and instantiated (their geometry and content built)
//! only as the player reaches the doors leading to them. The crate has no
//! I/O besides config file loading; everything the level needs from the
//! engine goes through the traits in [`host`].

pub mod compound;
pub mod config;
pub mod content;
pub mod difficulty;
pub mod distribution;
pub mod driver;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod instantiate;
pub mod level;
pub mod section;

mod consts;
mod rng;

pub use config::GenConfig;
pub use consts::*;
pub use difficulty::{ActionKind, DifficultyModel};
pub use distribution::DistributionTable;
pub use driver::{Generator, LevelSummary, PendingDoor};
pub use error::{GenError, GenResult};
pub use geometry::Vec3;
pub use grid::{Direction, GridCoord, GridIndex, SectionId};
pub use host::{LevelHost, RecordingHost};
pub use instantiate::Instantiation;
pub use level::LevelState;
pub use rng::GameRng;
pub use section::{Connection, Section, SectionKind};
