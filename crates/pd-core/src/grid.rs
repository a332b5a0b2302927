//! Section grid indexing and directions
//!
//! `GridIndex` is the single place that converts between grid coordinates
//! and linear section ids. Ids are `x * line + y`.

use core::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::error::GenError;

/// Linear id of a section, valid in `0..line*line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(pub u32);

impl SectionId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Position of a section in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step in `dir`, which may fall outside the grid
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Number of axis directions
pub const DIRECTION_COUNT: usize = 4;

/// The four axis directions, in the order connections are decided
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum Direction {
    /// +Y
    North = 0,
    /// +X
    East = 1,
    /// -Y
    South = 2,
    /// -X
    West = 3,
}

impl Direction {
    /// Get the delta (dx, dy) for this direction
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// True for directions along the x axis
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::East | Direction::West)
    }

    /// Entity yaw in degrees for a door facing this direction
    pub const fn door_yaw(self) -> i32 {
        if self.is_horizontal() { 90 } else { 0 }
    }

    /// Get direction from delta values
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

/// One value per direction, indexed by `Direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirMap<T>([T; DIRECTION_COUNT]);

impl<T: Copy> DirMap<T> {
    /// Same value in every direction
    pub const fn splat(value: T) -> Self {
        Self([value; DIRECTION_COUNT])
    }
}

impl<T> DirMap<T> {
    /// Build a map by evaluating `f` for each direction in iteration order
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self([
            f(Direction::North),
            f(Direction::East),
            f(Direction::South),
            f(Direction::West),
        ])
    }

    /// Iterate `(direction, value)` pairs in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::iter().zip(self.0.iter())
    }
}

impl<T> Index<Direction> for DirMap<T> {
    type Output = T;

    fn index(&self, dir: Direction) -> &T {
        &self.0[dir as usize]
    }
}

impl<T> IndexMut<Direction> for DirMap<T> {
    fn index_mut(&mut self, dir: Direction) -> &mut T {
        &mut self.0[dir as usize]
    }
}

/// Bijection between grid coordinates and section ids for a square grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndex {
    line: u32,
}

impl GridIndex {
    pub const fn new(line: u32) -> Self {
        Self { line }
    }

    /// Sections per grid edge
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Total number of sections
    pub const fn len(&self) -> usize {
        (self.line * self.line) as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.line == 0
    }

    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.line as i32 && coord.y < self.line as i32
    }

    /// Id of the section at `coord`, or `None` outside the grid
    pub const fn to_id(&self, coord: GridCoord) -> Option<SectionId> {
        if self.contains(coord) {
            Some(SectionId(coord.x as u32 * self.line + coord.y as u32))
        } else {
            None
        }
    }

    /// Like `to_id`, but reports the rejected coordinate
    pub fn try_id(&self, coord: GridCoord) -> Result<SectionId, GenError> {
        self.to_id(coord).ok_or(GenError::OutOfGridBounds {
            x: coord.x,
            y: coord.y,
        })
    }

    /// Coordinate of a valid section id
    pub const fn to_coord(&self, id: SectionId) -> GridCoord {
        let x = id.0 / self.line;
        let y = id.0 - x * self.line;
        GridCoord {
            x: x as i32,
            y: y as i32,
        }
    }

    /// Id of the neighbor of `id` in `dir`, or `None` past the grid edge
    pub const fn neighbor(&self, id: SectionId, dir: Direction) -> Option<SectionId> {
        self.to_id(self.to_coord(id).step(dir))
    }

    /// The direction leading from `from` to an adjacent `to`
    pub fn direction_between(&self, from: SectionId, to: SectionId) -> Option<Direction> {
        Direction::iter().find(|&dir| self.neighbor(from, dir) == Some(to))
    }

    /// All ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = SectionId> {
        (0..self.line * self.line).map(SectionId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_small_grid() {
        let grid = GridIndex::new(5);
        for x in 0..5 {
            for y in 0..5 {
                let coord = GridCoord::new(x, y);
                let id = grid.to_id(coord).unwrap();
                assert_eq!(grid.to_coord(id), coord);
            }
        }
    }

    #[test]
    fn test_id_layout() {
        let grid = GridIndex::new(12);
        assert_eq!(grid.to_id(GridCoord::new(0, 0)), Some(SectionId(0)));
        assert_eq!(grid.to_id(GridCoord::new(0, 11)), Some(SectionId(11)));
        assert_eq!(grid.to_id(GridCoord::new(1, 0)), Some(SectionId(12)));
        assert_eq!(grid.to_id(GridCoord::new(6, 6)), Some(SectionId(78)));
        // the y component must survive the inverse, not just x
        assert_eq!(grid.to_coord(SectionId(78)), GridCoord::new(6, 6));
        assert_eq!(grid.to_coord(SectionId(13)), GridCoord::new(1, 1));
    }

    #[test]
    fn test_out_of_bounds() {
        let grid = GridIndex::new(12);
        assert_eq!(grid.to_id(GridCoord::new(-1, 0)), None);
        assert_eq!(grid.to_id(GridCoord::new(0, -1)), None);
        assert_eq!(grid.to_id(GridCoord::new(12, 0)), None);
        assert_eq!(grid.to_id(GridCoord::new(0, 12)), None);
        assert_eq!(
            grid.try_id(GridCoord::new(12, 3)),
            Err(GenError::OutOfGridBounds { x: 12, y: 3 })
        );
    }

    #[test]
    fn test_neighbors() {
        let grid = GridIndex::new(4);
        let corner = SectionId(0);
        assert_eq!(grid.neighbor(corner, Direction::West), None);
        assert_eq!(grid.neighbor(corner, Direction::South), None);
        assert_eq!(grid.neighbor(corner, Direction::North), Some(SectionId(1)));
        assert_eq!(grid.neighbor(corner, Direction::East), Some(SectionId(4)));
        assert_eq!(
            grid.direction_between(SectionId(4), SectionId(0)),
            Some(Direction::West)
        );
        assert_eq!(grid.direction_between(SectionId(0), SectionId(5)), None);
    }

    #[test]
    fn test_direction_tables_agree() {
        for dir in Direction::iter() {
            let (dx, dy) = dir.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(dir));
            assert_eq!(dir.opposite().opposite(), dir);
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
    }

    #[test]
    fn test_dirmap_order() {
        let map = DirMap::from_fn(|d| d as u8);
        let collected: Vec<_> = map.iter().map(|(d, v)| (d, *v)).collect();
        assert_eq!(
            collected,
            vec![
                (Direction::North, 0),
                (Direction::East, 1),
                (Direction::South, 2),
                (Direction::West, 3)
            ]
        );
        let mut map = DirMap::splat(false);
        map[Direction::South] = true;
        assert!(map[Direction::South]);
        assert!(!map[Direction::North]);
    }
}
