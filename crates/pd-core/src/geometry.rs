//! World-space points and the region descriptors handed to the host editor

use core::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::grid::Direction;

/// Point or extent in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let d = self - other;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    pub const fn raised(self, dz: f32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: self.z + dz,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Cube face a paint operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
    Down,
    Up,
}

impl Face {
    /// Face of a boundary wall in `dir` that looks back into the section
    pub const fn facing_into(dir: Direction) -> Self {
        match dir {
            Direction::North => Face::NegY,
            Direction::East => Face::NegX,
            Direction::South => Face::PosY,
            Direction::West => Face::PosX,
        }
    }
}

/// Axis-aligned box of cubes: world-space origin and size in cubes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub origin: Vec3,
    pub cubes: [i32; 3],
    pub face: Face,
}

impl Region {
    pub const fn new(origin: Vec3, cubes: [i32; 3], face: Face) -> Self {
        Self {
            origin,
            cubes,
            face,
        }
    }
}
