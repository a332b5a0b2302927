//! Boundary to the host engine
//!
//! Generation decides what to build; the host commits it. Geometry calls
//! paint permanent level geometry, entity calls spawn things into the level,
//! and telemetry reports how the player is doing. `RecordingHost` keeps
//! every request in memory and is what tests and the headless simulator use.

use serde::{Deserialize, Serialize};

use crate::content::{ItemKind, MONSTER_ENTITY_TYPE, MonsterKind};
use crate::geometry::{Region, Vec3};

/// Index handed to the host with every entity request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityIndex(pub u32);

/// Host-side handle of a spawned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// Level geometry editing
pub trait GeometryHost {
    fn paint_floor(&mut self, region: Region, texture: u16);
    /// Texture a wall face; `raise` first extrudes the solid wall
    fn paint_wall(&mut self, region: Region, texture: u16, raise: bool);
    fn paint_ceiling(&mut self, region: Region, texture: u16);
    /// Cut a door opening into an already raised wall
    fn paint_door_frame(&mut self, region: Region, texture: u16);
    /// Raise a small decorative block to use as cover
    fn raise_obstruction(&mut self, region: Region);
}

/// Entity spawning
pub trait EntityHost {
    fn spawn_item(&mut self, kind: ItemKind, position: Vec3, index: EntityIndex) -> EntityHandle;
    /// Spawn and initialize a monster
    fn spawn_monster(
        &mut self,
        kind: MonsterKind,
        position: Vec3,
        index: EntityIndex,
    ) -> EntityHandle;
    /// Spawn a door that opens once and reports back through the door callback
    fn spawn_door(&mut self, position: Vec3, yaw: i32, index: EntityIndex) -> EntityHandle;
    fn spawn_level_end(&mut self, position: Vec3, index: EntityIndex) -> EntityHandle;
}

/// Cumulative player statistics read at every difficulty refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: i32,
    pub shots_fired: u32,
    pub damage_dealt: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100,
            shots_fired: 0,
            damage_dealt: 0,
        }
    }
}

impl PlayerStats {
    /// Damage per shot as a percentage; no shots means no accuracy
    pub fn accuracy(&self) -> u32 {
        self.damage_dealt.saturating_mul(100) / self.shots_fired.max(1)
    }
}

/// Read-only view of the player
pub trait PlayerTelemetry {
    /// `None` when there is no player yet
    fn player_stats(&self) -> Option<PlayerStats>;
}

/// Everything a level needs from its host
pub trait LevelHost: GeometryHost + EntityHost + PlayerTelemetry {}

impl<T: GeometryHost + EntityHost + PlayerTelemetry> LevelHost for T {}

/// One request received by a `RecordingHost`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostCall {
    Floor { region: Region, texture: u16 },
    Wall { region: Region, texture: u16, raise: bool },
    Ceiling { region: Region, texture: u16 },
    DoorFrame { region: Region, texture: u16 },
    Obstruction { region: Region },
    Item {
        kind: ItemKind,
        entity_type: u16,
        position: Vec3,
        index: EntityIndex,
    },
    Monster {
        kind: MonsterKind,
        entity_type: u16,
        position: Vec3,
        index: EntityIndex,
    },
    Door { position: Vec3, yaw: i32, index: EntityIndex },
    LevelEnd { position: Vec3, index: EntityIndex },
}

impl HostCall {
    pub fn is_entity(&self) -> bool {
        matches!(
            self,
            HostCall::Item { .. }
                | HostCall::Monster { .. }
                | HostCall::Door { .. }
                | HostCall::LevelEnd { .. }
        )
    }

    pub fn entity_index(&self) -> Option<EntityIndex> {
        match self {
            HostCall::Item { index, .. }
            | HostCall::Monster { index, .. }
            | HostCall::Door { index, .. }
            | HostCall::LevelEnd { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Host entity type of an item or monster request
    pub fn entity_type(&self) -> Option<u16> {
        match self {
            HostCall::Item { entity_type, .. } | HostCall::Monster { entity_type, .. } => {
                Some(*entity_type)
            }
            _ => None,
        }
    }
}

/// Host that records every request instead of editing a map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub player: Option<PlayerStats>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(player: PlayerStats) -> Self {
        Self {
            calls: Vec::new(),
            player: Some(player),
        }
    }

    fn record(&mut self, call: HostCall) -> EntityHandle {
        self.calls.push(call);
        EntityHandle(self.calls.len() as u32 - 1)
    }

    pub fn items(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.calls.iter().filter_map(|c| match c {
            HostCall::Item { kind, .. } => Some(*kind),
            _ => None,
        })
    }

    pub fn monsters(&self) -> impl Iterator<Item = MonsterKind> + '_ {
        self.calls.iter().filter_map(|c| match c {
            HostCall::Monster { kind, .. } => Some(*kind),
            _ => None,
        })
    }

    pub fn doors(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::Door { .. }))
            .count()
    }

    pub fn level_ends(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::LevelEnd { .. }))
            .count()
    }

    pub fn entity_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_entity()).count()
    }
}

impl GeometryHost for RecordingHost {
    fn paint_floor(&mut self, region: Region, texture: u16) {
        self.record(HostCall::Floor { region, texture });
    }

    fn paint_wall(&mut self, region: Region, texture: u16, raise: bool) {
        self.record(HostCall::Wall {
            region,
            texture,
            raise,
        });
    }

    fn paint_ceiling(&mut self, region: Region, texture: u16) {
        self.record(HostCall::Ceiling { region, texture });
    }

    fn paint_door_frame(&mut self, region: Region, texture: u16) {
        self.record(HostCall::DoorFrame { region, texture });
    }

    fn raise_obstruction(&mut self, region: Region) {
        self.record(HostCall::Obstruction { region });
    }
}

impl EntityHost for RecordingHost {
    fn spawn_item(&mut self, kind: ItemKind, position: Vec3, index: EntityIndex) -> EntityHandle {
        self.record(HostCall::Item {
            kind,
            entity_type: kind.entity_type(),
            position,
            index,
        })
    }

    fn spawn_monster(
        &mut self,
        kind: MonsterKind,
        position: Vec3,
        index: EntityIndex,
    ) -> EntityHandle {
        self.record(HostCall::Monster {
            kind,
            entity_type: MONSTER_ENTITY_TYPE,
            position,
            index,
        })
    }

    fn spawn_door(&mut self, position: Vec3, yaw: i32, index: EntityIndex) -> EntityHandle {
        self.record(HostCall::Door {
            position,
            yaw,
            index,
        })
    }

    fn spawn_level_end(&mut self, position: Vec3, index: EntityIndex) -> EntityHandle {
        self.record(HostCall::LevelEnd { position, index })
    }
}

impl PlayerTelemetry for RecordingHost {
    fn player_stats(&self) -> Option<PlayerStats> {
        self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        let none = PlayerStats::default();
        assert_eq!(none.accuracy(), 0);

        let stats = PlayerStats {
            health: 80,
            shots_fired: 10,
            damage_dealt: 25,
        };
        assert_eq!(stats.accuracy(), 250);
    }

    #[test]
    fn test_recording_host_counts() {
        let mut host = RecordingHost::new();
        host.spawn_item(ItemKind::Rockets, Vec3::default(), EntityIndex(10));
        host.spawn_door(Vec3::default(), 90, EntityIndex(11));
        host.spawn_monster(MonsterKind::Knight, Vec3::default(), EntityIndex(12));
        host.spawn_level_end(Vec3::default(), EntityIndex(13));

        assert_eq!(host.items().collect::<Vec<_>>(), vec![ItemKind::Rockets]);
        assert_eq!(host.monsters().count(), 1);
        assert_eq!(host.doors(), 1);
        assert_eq!(host.level_ends(), 1);
        assert_eq!(host.entity_count(), 4);
        assert_eq!(host.calls[2].entity_index(), Some(EntityIndex(12)));
        assert_eq!(host.calls[0].entity_type(), Some(10));
        assert_eq!(host.calls[2].entity_type(), Some(MONSTER_ENTITY_TYPE));
        assert_eq!(host.calls[1].entity_type(), None);
        assert!(host.player_stats().is_none());
    }
}
