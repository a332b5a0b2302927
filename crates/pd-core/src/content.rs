//! Content kinds placed in sections and the host ids they map to
//!
//! Slot order of `ItemKind` and `MonsterKind` is the slot order of the item
//! and monster distribution tables.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Host entity type used for every monster
pub const MONSTER_ENTITY_TYPE: u16 = 21;

/// Pickups, in distribution slot order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum ItemKind {
    Shells = 0,
    Bullets = 1,
    Rockets = 2,
    RifleRounds = 3,
    Grenades = 4,
    Cartridges = 5,
    Health = 6,
    HealthBoost = 7,
    Armour = 8,
    YellowArmour = 9,
    QuadDamage = 10,
}

impl ItemKind {
    pub const ALL: [ItemKind; 11] = [
        ItemKind::Shells,
        ItemKind::Bullets,
        ItemKind::Rockets,
        ItemKind::RifleRounds,
        ItemKind::Grenades,
        ItemKind::Cartridges,
        ItemKind::Health,
        ItemKind::HealthBoost,
        ItemKind::Armour,
        ItemKind::YellowArmour,
        ItemKind::QuadDamage,
    ];

    /// Kind stored in a distribution slot
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// Host entity type spawned for this item
    pub const fn entity_type(self) -> u16 {
        8 + self as u16
    }
}

/// Monsters, in distribution slot order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum MonsterKind {
    Ogro = 0,
    Rhino = 1,
    Ratamahatta = 2,
    Slith = 3,
    Bauul = 4,
    Hellpig = 5,
    Knight = 6,
    Goblin = 7,
    Spider = 8,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 9] = [
        MonsterKind::Ogro,
        MonsterKind::Rhino,
        MonsterKind::Ratamahatta,
        MonsterKind::Slith,
        MonsterKind::Bauul,
        MonsterKind::Hellpig,
        MonsterKind::Knight,
        MonsterKind::Goblin,
        MonsterKind::Spider,
    ];

    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }
}

/// Host texture ids selectable for floors
pub const FLOOR_TEXTURES: [u16; 6] = [2, 3, 4, 5, 6, 7];
/// Host texture ids selectable for walls
pub const WALL_TEXTURES: [u16; 11] = [9, 10, 11, 12, 13, 25, 26, 27, 31, 32, 33];
/// Host texture ids selectable for ceilings
pub const CEILING_TEXTURES: [u16; 2] = [24, 19];

/// Floor, wall and ceiling texture ids of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceStyle {
    pub floor: u16,
    pub wall: u16,
    pub ceiling: u16,
}

impl SurfaceStyle {
    /// Style baked into the pre-built spawn room
    pub const SPAWN: SurfaceStyle = SurfaceStyle {
        floor: 1,
        wall: 9,
        ceiling: 24,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_slot_order_matches_all() {
        for (slot, kind) in ItemKind::iter().enumerate() {
            assert_eq!(ItemKind::from_slot(slot), Some(kind));
        }
        for (slot, kind) in MonsterKind::iter().enumerate() {
            assert_eq!(MonsterKind::from_slot(slot), Some(kind));
        }
        assert_eq!(ItemKind::ALL.len(), ItemKind::COUNT);
        assert_eq!(MonsterKind::ALL.len(), MonsterKind::COUNT);
        assert_eq!(ItemKind::from_slot(11), None);
    }

    #[test]
    fn test_item_entity_types() {
        assert_eq!(ItemKind::Shells.entity_type(), 8);
        assert_eq!(ItemKind::Health.entity_type(), 14);
        assert_eq!(ItemKind::QuadDamage.entity_type(), 18);
        assert!(ItemKind::ALL.iter().all(|k| k.entity_type() != MONSTER_ENTITY_TYPE));
    }
}
