//! Section instantiation
//!
//! Instantiating commits a generated section: its door neighbors get
//! generated (growing the frontier), its open neighbors and whole compound
//! get instantiated with it, the exit may be chosen, difficulty is refreshed,
//! and geometry and content requests go out to the host.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::consts::{COVERS_PER_SECTION, CUBE_SIZE};
use crate::content::{ItemKind, MonsterKind};
use crate::generate::generate;
use crate::geometry::{Face, Region, Vec3};
use crate::grid::{Direction, SectionId};
use crate::host::LevelHost;
use crate::level::LevelState;
use crate::rng::GameRng;
use crate::section::{Connection, Section, SectionKind};

/// Outcome of an `instantiate` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instantiation {
    /// This call built the section
    Fresh,
    /// Not generated yet, or built earlier
    AlreadyDone,
}

impl Instantiation {
    pub fn is_fresh(self) -> bool {
        self == Instantiation::Fresh
    }
}

/// Build section `id` and everything that must appear together with it
pub fn instantiate(
    state: &mut LevelState,
    id: SectionId,
    host: &mut dyn LevelHost,
) -> Instantiation {
    let section = state.section(id);
    if !section.generated || section.instantiated {
        return Instantiation::AlreadyDone;
    }
    state.section_mut(id).instantiated = true;
    state.progression += 1;

    expand_neighbors(state, id, host);
    choose_exit(state, id);

    let player = host.player_stats();
    state
        .difficulty
        .refresh(&state.config, player, state.progression, &mut state.actions);

    let kind = state.section(id).kind;
    if matches!(kind, SectionKind::Normal | SectionKind::Exit) {
        build_geometry(state, id, host);
    }

    sweep_compound(state, id, host);

    match kind {
        SectionKind::Normal => {
            populate(state, id, host);
            state.last_normal_instantiated = Some(id);
        }
        SectionKind::Exit => {
            let position = state.section(id).exit_trigger_position();
            let index = state.next_entity_index();
            host.spawn_level_end(position, index);
        }
        SectionKind::Spawn => {}
    }

    tracing::trace!(
        section = id.0,
        %kind,
        progression = state.progression,
        frontier = state.frontier,
        "section instantiated"
    );
    Instantiation::Fresh
}

/// Generate door neighbors, instantiate open ones
fn expand_neighbors(state: &mut LevelState, id: SectionId, host: &mut dyn LevelHost) {
    for dir in Direction::iter() {
        let Some(neighbor) = state.neighbor(id, dir) else {
            continue;
        };
        match state.section(id).connections[dir] {
            Connection::Door => {
                generate(state, neighbor, Some(id));
            }
            Connection::Open => {
                instantiate(state, neighbor, host);
            }
            Connection::Wall | Connection::Unresolved => {}
        }
    }
}

fn choose_exit(state: &mut LevelState, id: SectionId) {
    if state.progression >= state.config.progression_min {
        state.exit_chance += state.config.exit_chance_step;
    }

    let eligible = !state.exit_created && state.section(id).kind == SectionKind::Normal;
    if eligible && state.exit_chance > 0 && state.rng.roll_under(state.exit_chance) {
        state.try_make_exit(id);
    }

    // the explorable frontier is about to run out
    if state.frontier <= 2 {
        state.try_make_exit(id);
    }
}

fn build_geometry(state: &mut LevelState, id: SectionId, host: &mut dyn LevelHost) {
    let section = state.section(id).clone();
    let style = section.style;

    host.paint_floor(section.floor_region(), style.floor);

    for (dir, connection) in section.connections.iter() {
        if !connection.has_wall() {
            continue;
        }
        // a built neighbor already raised the shared wall and its door
        let build = state
            .neighbor(id, dir)
            .is_none_or(|n| !state.section(n).instantiated);
        host.paint_wall(section.wall_region(dir), style.wall, build);

        if build && *connection == Connection::Door {
            host.paint_door_frame(section.door_frame_region(dir), style.wall);
            let index = state.next_entity_index();
            host.spawn_door(section.door_entity_position(dir), dir.door_yaw(), index);
        }
    }

    host.paint_ceiling(section.ceiling_region(), style.ceiling);

    for _ in 0..COVERS_PER_SECTION {
        host.raise_obstruction(cover_region(&section, &mut state.rng));
    }
}

/// Small block in one quadrant of the room, running along x or y
fn cover_region(section: &Section, rng: &mut GameRng) -> Region {
    let (hx, hy) = section.world_half();
    let sx = rng.rn2(2) as f32 * 2.0 - 1.0;
    let sy = rng.rn2(2) as f32 * 2.0 - 1.0;
    let origin = Vec3::new(
        section.position.x + sx * 0.5 * hx,
        section.position.y + sy * 0.5 * hy,
        section.position.z,
    );
    let along_x = rng.rn2(4) % 2 == 0;
    let length_x = ((section.half_extent.x * 0.5) as i32).max(1);
    let length_y = ((section.half_extent.y * 0.5) as i32).max(1);
    let cubes = if along_x {
        [length_x, 1, 2]
    } else {
        [1, length_y, 2]
    };
    Region::new(origin, cubes, Face::Up)
}

/// Instantiate the whole compound; fresh work found on the second pass
/// consumes frontier
fn sweep_compound(state: &mut LevelState, id: SectionId, host: &mut dyn LevelHost) {
    let members = compound_members(state, id);
    for member in members {
        instantiate(state, member, host);
        for other in compound_members(state, member) {
            if instantiate(state, other, host).is_fresh() {
                state.decrement_frontier();
            }
        }
    }
}

fn compound_members(state: &LevelState, id: SectionId) -> Vec<SectionId> {
    state
        .compound_of(id)
        .map(|group| group.members().to_vec())
        .unwrap_or_default()
}

/// Items and monsters of a normal room
fn populate(state: &mut LevelState, id: SectionId, host: &mut dyn LevelHost) {
    let section = state.section(id).clone();

    let bonus = if section.count_connections(Connection::Door) < 2 {
        state.config.dead_end_item_bonus
    } else {
        0
    };
    let item_chance = state.difficulty.item_spawn_chance + bonus;
    let mut placed = 0;
    while state.rng.roll_under(item_chance) && placed < state.config.items_max_per_section {
        let slot = state.difficulty.item_dist.sample(&mut state.rng);
        let Some(kind) = ItemKind::from_slot(slot) else {
            break;
        };
        let position = content_position(&section, &mut state.rng);
        let index = state.next_entity_index();
        host.spawn_item(kind, position, index);
        placed += 1;
    }

    let monster_chance = state.difficulty.monster_spawn_chance;
    let mut placed = 0;
    while state.rng.roll_under(monster_chance) && placed < state.config.monsters_max_per_section {
        let slot = state.difficulty.monster_dist.sample(&mut state.rng);
        let Some(kind) = MonsterKind::from_slot(slot) else {
            break;
        };
        let position = content_position(&section, &mut state.rng);
        let index = state.next_entity_index();
        host.spawn_monster(kind, position, index);
        placed += 1;
    }
}

/// Random spot inside the room, two cubes above the floor
pub(crate) fn content_position(section: &Section, rng: &mut GameRng) -> Vec3 {
    let axis = |center: f32, half: f32, rng: &mut GameRng| {
        let spread = (half * 0.75 * CUBE_SIZE) as u32;
        center + rng.rn2(spread) as f32 - (half + 1.0) * CUBE_SIZE * 0.75 + CUBE_SIZE
    };
    let x = axis(section.position.x, section.half_extent.x, rng);
    let y = axis(section.position.y, section.half_extent.y, rng);
    Vec3::new(x, y, section.position.z + 2.0 * CUBE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;
    use crate::grid::GridCoord;
    use crate::host::{HostCall, RecordingHost};

    fn quiet_level(seed: u64) -> LevelState {
        let config = GenConfig {
            door_chance: -1,
            merge_chance: -1,
            item_spawn_chance: -100,
            monster_spawn_chance: -100,
            dead_end_item_bonus: 0,
            ..Default::default()
        };
        LevelState::new(config, GameRng::new(seed)).unwrap()
    }

    #[test]
    fn test_ungenerated_section_is_not_built() {
        let mut state = quiet_level(1);
        let mut host = RecordingHost::new();
        assert_eq!(
            instantiate(&mut state, SectionId(40), &mut host),
            Instantiation::AlreadyDone
        );
        assert!(host.calls.is_empty());
        assert_eq!(state.progression, 0);
    }

    #[test]
    fn test_spawn_builds_nothing_but_grows_frontier() {
        let mut state = quiet_level(2);
        let mut host = RecordingHost::new();
        let spawn = state.spawn_id();
        generate(&mut state, spawn, None);

        assert!(instantiate(&mut state, spawn, &mut host).is_fresh());
        assert!(host.calls.is_empty());
        assert_eq!(state.progression, 1);

        let north = state.neighbor(spawn, Direction::North).unwrap();
        assert!(state.section(north).generated);
        assert!(!state.section(north).instantiated);
        assert_eq!(
            state.section(north).connections[Direction::South],
            Connection::Door
        );
        assert_eq!(state.section(spawn).kind, SectionKind::Spawn);
        assert!(!state.exit_created);
    }

    #[test]
    fn test_instantiate_is_idempotent() {
        let mut state = quiet_level(3);
        let mut host = RecordingHost::new();
        let id = state.grid.to_id(GridCoord::new(4, 4)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));

        assert!(instantiate(&mut state, id, &mut host).is_fresh());
        let calls = host.calls.len();
        let progression = state.progression;
        let frontier = state.frontier;
        let connections = state.section(id).connections;

        assert_eq!(
            instantiate(&mut state, id, &mut host),
            Instantiation::AlreadyDone
        );
        assert_eq!(host.calls.len(), calls);
        assert_eq!(state.progression, progression);
        assert_eq!(state.frontier, frontier);
        assert_eq!(state.section(id).connections, connections);
    }

    #[test]
    fn test_normal_room_geometry() {
        let mut state = quiet_level(4);
        // keep the forced exit out of the way
        state.frontier = 10;
        state.progression = state.config.progression_min;
        let mut host = RecordingHost::new();
        let id = state.grid.to_id(GridCoord::new(4, 4)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));
        assert_eq!(state.section(id).count_connections(Connection::Wall), 4);

        state.exit_created = true;
        instantiate(&mut state, id, &mut host);

        let floors = host
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Floor { .. }))
            .count();
        let raised_walls = host
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Wall { raise: true, .. }))
            .count();
        let covers = host
            .calls
            .iter()
            .filter(|c| matches!(c, HostCall::Obstruction { .. }))
            .count();
        assert_eq!(floors, 1);
        assert_eq!(raised_walls, 4);
        assert_eq!(covers, COVERS_PER_SECTION);
        assert_eq!(host.doors(), 0);
        assert_eq!(host.entity_count(), 0);
    }

    #[test]
    fn test_thin_frontier_forces_exit() {
        let mut state = quiet_level(5);
        let mut host = RecordingHost::new();
        let id = state.grid.to_id(GridCoord::new(4, 4)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));
        // one forced door: frontier 2
        assert_eq!(state.frontier, 2);
        // no more forced doors from here on
        state.progression = state.config.progression_min;

        instantiate(&mut state, id, &mut host);
        assert_eq!(state.section(id).kind, SectionKind::Exit);
        assert_eq!(state.exit_section, Some(id));
        assert_eq!(host.level_ends(), 1);
        assert_eq!(host.doors(), 1);
    }

    #[test]
    fn test_open_compound_builds_together() {
        let config = GenConfig {
            door_chance: -1,
            merge_chance: 100,
            ..Default::default()
        };
        let mut state = LevelState::new(config, GameRng::new(6)).unwrap();
        state.progression = state.config.progression_min;
        let mut host = RecordingHost::new();
        let id = state.grid.to_id(GridCoord::new(5, 5)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));

        instantiate(&mut state, id, &mut host);
        let members = compound_members(&state, id);
        assert!(members.len() > 1);
        for member in members {
            assert!(state.section(member).instantiated);
        }
    }

    #[test]
    fn test_item_dist_with_one_slot() {
        let config = GenConfig {
            door_chance: -1,
            merge_chance: -1,
            item_spawn_chance: 100,
            items_max_per_section: 6,
            monster_spawn_chance: -100,
            item_weights: vec![10, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            item_relief_weights: vec![0; 11],
            ..Default::default()
        };
        let mut state = LevelState::new(config, GameRng::new(7)).unwrap();
        state.frontier = 10;
        state.exit_created = true;
        let mut host = RecordingHost::new();
        let id = state.grid.to_id(GridCoord::new(4, 4)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));
        instantiate(&mut state, id, &mut host);

        let items: Vec<_> = host.items().collect();
        assert_eq!(items.len(), 6);
        assert!(items.iter().all(|&k| k == ItemKind::Shells));
    }

    #[test]
    fn test_content_position_stays_near_room() {
        let mut section = Section::new(GridCoord::new(3, 3));
        section.half_extent.z = 6.0;
        let mut rng = GameRng::new(8);
        for _ in 0..500 {
            let p = content_position(&section, &mut rng);
            assert!(p.x >= section.position.x - 28.0 && p.x <= section.position.x + 1.0);
            assert!(p.y >= section.position.y - 28.0 && p.y <= section.position.y + 1.0);
            assert_eq!(p.z, section.position.z + 16.0);
        }
    }
}
