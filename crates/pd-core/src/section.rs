//! Grid sections: per-cell topology state and derived geometry
//!
//! A section starts untouched, becomes generated once its connections are
//! decided, and instantiated once its geometry and content are committed.
//! Both flags only ever go from false to true.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::compound::CompoundId;
use crate::consts::{
    CUBE_SIZE, DOOR_HEIGHT, DOOR_WIDTH, DOOR_Z_PADDING, FLOOR_Z, SECTION_HALF, SECTION_SIZE,
};
use crate::content::SurfaceStyle;
use crate::geometry::{Face, Region, Vec3};
use crate::grid::{DirMap, Direction, GridCoord};

/// Role of a section in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum SectionKind {
    /// The pre-built room the player starts in
    Spawn,
    #[default]
    Normal,
    /// Holds the level-end trigger
    Exit,
}

/// How a section meets its neighbor in one direction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Connection {
    Wall,
    /// Gated opening, passable once the door is reached
    Door,
    /// No wall: both sections belong to the same compound
    Open,
    /// Not decided yet; never survives a finished generate
    #[default]
    Unresolved,
}

impl Connection {
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Connection::Unresolved)
    }

    /// Directions that get a wall (plain or with a door) built
    pub const fn has_wall(self) -> bool {
        matches!(self, Connection::Wall | Connection::Door)
    }
}

/// One cell of the generation grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub coord: GridCoord,
    pub kind: SectionKind,
    pub connections: DirMap<Connection>,
    /// Center of the floor, world units
    pub position: Vec3,
    /// Half width and half depth in cubes; z holds the full height in cubes
    pub half_extent: Vec3,
    pub style: SurfaceStyle,
    pub door_anchors: DirMap<Vec3>,
    pub compound: Option<CompoundId>,
    pub generated: bool,
    pub instantiated: bool,
}

impl Section {
    pub fn new(coord: GridCoord) -> Self {
        let spacing = SECTION_SIZE as f32 * CUBE_SIZE;
        Self {
            coord,
            kind: SectionKind::Normal,
            connections: DirMap::splat(Connection::Unresolved),
            position: Vec3::new(coord.x as f32 * spacing, coord.y as f32 * spacing, FLOOR_Z),
            half_extent: Vec3::new(SECTION_HALF, SECTION_HALF, 0.0),
            style: SurfaceStyle::default(),
            door_anchors: DirMap::splat(Vec3::default()),
            compound: None,
            generated: false,
            instantiated: false,
        }
    }

    /// Height in cubes
    pub fn height(&self) -> f32 {
        self.half_extent.z
    }

    /// Half extents along x and y in world units
    pub fn world_half(&self) -> (f32, f32) {
        (
            self.half_extent.x * CUBE_SIZE,
            self.half_extent.y * CUBE_SIZE,
        )
    }

    /// Midpoint of the boundary in `dir`, at floor height
    pub fn door_anchor(&self, dir: Direction) -> Vec3 {
        let (dx, dy) = dir.delta();
        let (hx, hy) = self.world_half();
        Vec3::new(
            self.position.x + dx as f32 * hx,
            self.position.y + dy as f32 * hy,
            self.position.z,
        )
    }

    /// Store the anchor of every direction, door or not
    pub fn compute_door_anchors(&mut self) {
        self.door_anchors = DirMap::from_fn(|dir| self.door_anchor(dir));
    }

    /// Point a player must come near to open the door in `dir`
    pub fn door_probe(&self, dir: Direction) -> Vec3 {
        self.door_anchors[dir].raised(DOOR_Z_PADDING)
    }

    pub fn count_connections(&self, connection: Connection) -> usize {
        self.connections
            .iter()
            .filter(|(_, c)| **c == connection)
            .count()
    }

    /// Whether `point` lies in this section's box widened by `tolerance` (x, y)
    pub fn contains_point(&self, point: Vec3, tolerance: (f32, f32)) -> bool {
        let (hx, hy) = self.world_half();
        let (ax, ay) = tolerance;
        point.x + ax >= self.position.x - hx
            && point.x - ax <= self.position.x + hx
            && point.y + ay >= self.position.y - hy
            && point.y - ay <= self.position.y + hy
    }

    /// Floor slab; open sides run flush to the neighbor
    pub fn floor_region(&self) -> Region {
        let open = |dir: Direction| self.connections[dir] == Connection::Open;
        let (hx, hy) = self.world_half();

        let origin = Vec3::new(
            self.position.x - hx + if open(Direction::West) { 0.0 } else { CUBE_SIZE },
            self.position.y - hy + if open(Direction::South) { 0.0 } else { CUBE_SIZE },
            self.position.z,
        );
        let trim_x = if open(Direction::East) || open(Direction::West) { 0 } else { 1 };
        let trim_y = if open(Direction::North) || open(Direction::South) { 0 } else { 1 };
        let cubes = [
            (2.0 * self.half_extent.x) as i32 - trim_x,
            (2.0 * self.half_extent.y) as i32 - trim_y,
            1,
        ];
        Region::new(origin, cubes, Face::Up)
    }

    /// Wall strip along the boundary in `dir`, one cube thick and full height
    pub fn wall_region(&self, dir: Direction) -> Region {
        let (hx, hy) = self.world_half();
        let (corner_x, corner_y, along_x) = match dir {
            Direction::North => (-1.0, 1.0, true),
            Direction::East => (1.0, -1.0, false),
            Direction::South => (-1.0, -1.0, true),
            Direction::West => (-1.0, -1.0, false),
        };
        let origin = Vec3::new(
            self.position.x + corner_x * hx,
            self.position.y + corner_y * hy,
            self.position.z,
        );
        let span_x = if along_x { 2.0 * self.half_extent.x } else { 0.0 };
        let span_y = if along_x { 0.0 } else { 2.0 * self.half_extent.y };
        let cubes = [
            1 + span_x as i32,
            1 + span_y as i32,
            self.height() as i32,
        ];
        Region::new(origin, cubes, Face::facing_into(dir))
    }

    /// Opening cut into the wall in `dir` for a door
    pub fn door_frame_region(&self, dir: Direction) -> Region {
        let anchor = self.door_anchors[dir];
        let half_width = DOOR_WIDTH as f32 * 0.5 * CUBE_SIZE;
        let mut origin = anchor.raised(DOOR_HEIGHT as f32 * CUBE_SIZE);
        let mut cubes = [1, 1, DOOR_HEIGHT as i32];
        if dir.is_horizontal() {
            cubes[1] = DOOR_WIDTH as i32;
            origin.y -= half_width;
        } else {
            cubes[0] = DOOR_WIDTH as i32;
            origin.x -= half_width;
        }
        Region::new(origin, cubes, Face::facing_into(dir))
    }

    /// Where the gated door entity for `dir` stands
    pub fn door_entity_position(&self, dir: Direction) -> Vec3 {
        let anchor = self.door_anchors[dir];
        let step = CUBE_SIZE / 2.0;
        let shifted = if dir.is_horizontal() {
            Vec3::new(anchor.x + step, anchor.y, anchor.z)
        } else {
            Vec3::new(anchor.x, anchor.y + step, anchor.z)
        };
        shifted.raised(DOOR_Z_PADDING)
    }

    pub fn ceiling_region(&self) -> Region {
        let (hx, hy) = self.world_half();
        let origin = Vec3::new(
            self.position.x - hx,
            self.position.y - hy,
            self.position.z + self.height() * CUBE_SIZE,
        );
        let cubes = [
            (2.0 * self.half_extent.x) as i32,
            (2.0 * self.half_extent.y) as i32,
            1,
        ];
        Region::new(origin, cubes, Face::Down)
    }

    /// Where the level-end trigger of an exit section goes
    pub fn exit_trigger_position(&self) -> Vec3 {
        self.position.raised(CUBE_SIZE)
    }
}
