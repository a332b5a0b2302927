//! Geometry constants shared by generation and the host map format
//!
//! Lengths are in cubes unless the name says world units. One cube is
//! `CUBE_SIZE` world units.

/// World units per cube (the editing grid of the host map)
pub const CUBE_SIZE: f32 = 8.0;

/// Default map edge length in cubes
pub const DEFAULT_MAP_SIZE: u32 = 128;

/// Section edge length in cubes
pub const SECTION_SIZE: u32 = 10;

/// Half of a section's horizontal edge in cubes
pub const SECTION_HALF: f32 = (SECTION_SIZE / 2) as f32;

/// Section height range in cubes, upper bound exclusive
pub const SECTION_MIN_HEIGHT: u32 = 5;
pub const SECTION_MAX_HEIGHT: u32 = 10;

/// Height of the pre-built spawn room in cubes
pub const SPAWN_HEIGHT: f32 = 6.0;

/// World z of every section floor
pub const FLOOR_Z: f32 = 504.0;

/// Door opening dimensions in cubes
pub const DOOR_HEIGHT: u32 = 4;
pub const DOOR_WIDTH: u32 = 4;

/// Vertical offset of door entities and door probes, in world units
pub const DOOR_Z_PADDING: f32 = CUBE_SIZE;

/// Distance from a door probe within which a door counts as reached, in world units
pub const DOOR_REACH_RADIUS: f32 = 2.0 * CUBE_SIZE;

/// Sections closer than this to the map border never grow doors or openings, in world units
pub const BORDER_MARGIN: f32 = 2.0 * CUBE_SIZE;

/// First entity index handed out at level start
pub const FIRST_ENTITY_INDEX: u32 = 10;

/// Decorative obstructions raised per built section
pub const COVERS_PER_SECTION: usize = 2;
