//! Topology generation
//!
//! `generate` decides how a section meets each of its four neighbors and
//! grows open compounds by recursing into the neighbors it merges with. It
//! never builds geometry. The `generated` flag is set before any recursion,
//! so every section is generated at most once and the recursion is bounded
//! by the grid.

use strum::IntoEnumIterator;

use crate::consts::{
    BORDER_MARGIN, CUBE_SIZE, SECTION_MAX_HEIGHT, SECTION_MIN_HEIGHT, SPAWN_HEIGHT,
};
use crate::content::{CEILING_TEXTURES, FLOOR_TEXTURES, SurfaceStyle, WALL_TEXTURES};
use crate::geometry::Vec3;
use crate::grid::{Direction, SectionId};
use crate::level::LevelState;
use crate::section::{Connection, SectionKind};

/// Generate section `id`, reached from `parent`
///
/// `parent == None` marks the spawn room. Returns the number of sections
/// newly generated by this call, recursive merges included; 0 when `id` was
/// already generated.
pub fn generate(state: &mut LevelState, id: SectionId, parent: Option<SectionId>) -> u32 {
    if state.section(id).generated {
        return 0;
    }
    state.section_mut(id).generated = true;

    mirror_neighbors(state, id);

    if state.section(id).compound.is_none() {
        let compound = state.compounds.create(id);
        state.section_mut(id).compound = Some(compound);
    }

    let mut created = 1;
    match parent {
        None => make_spawn(state, id),
        Some(_) => {
            state.section_mut(id).kind = SectionKind::Normal;
            pick_style(state, id);
            created += decide_connections(state, id, created);
        }
    }

    let section = state.section_mut(id);
    section.compute_door_anchors();
    for dir in Direction::iter() {
        if !section.connections[dir].is_resolved() {
            section.connections[dir] = Connection::Wall;
        }
    }

    tracing::trace!(
        section = id.0,
        parent = parent.map(|p| p.0),
        created,
        "section generated"
    );
    created
}

/// Copy the connections already decided by generated neighbors
fn mirror_neighbors(state: &mut LevelState, id: SectionId) {
    for dir in Direction::iter() {
        let connection = match state.neighbor(id, dir) {
            None => Connection::Wall,
            Some(n) if state.section(n).generated => {
                let mirrored = state.section(n).connections[dir.opposite()];
                if mirrored == Connection::Open {
                    link_open(state, id, n);
                }
                mirrored
            }
            Some(_) => Connection::Unresolved,
        };
        state.section_mut(id).connections[dir] = connection;
    }
}

/// Put `id` and `other` into one compound group
fn link_open(state: &mut LevelState, id: SectionId, other: SectionId) {
    match (state.section(id).compound, state.section(other).compound) {
        (None, Some(theirs)) => {
            let live = state.compounds.resolve(theirs);
            state.compounds.join(live, id);
            state.section_mut(id).compound = Some(live);
        }
        (Some(ours), Some(theirs)) => {
            state.compounds.merge(ours, theirs);
        }
        // the other side joins when it gets generated
        (_, None) => {}
    }
}

fn make_spawn(state: &mut LevelState, id: SectionId) {
    let section = state.section_mut(id);
    section.kind = SectionKind::Spawn;
    section.style = SurfaceStyle::SPAWN;
    section.half_extent.z = SPAWN_HEIGHT;
    for dir in Direction::iter() {
        section.connections[dir] = Connection::Wall;
    }
    section.connections[Direction::North] = Connection::Door;
}

/// Fresh style for the first member of a compound, inherited otherwise
fn pick_style(state: &mut LevelState, id: SectionId) {
    let first = state
        .compound_of(id)
        .filter(|group| group.len() > 1)
        .and_then(|group| group.first());

    let (style, height) = match first {
        Some(first) if first != id => {
            let source = state.section(first);
            (source.style, source.height())
        }
        _ => {
            let rng = &mut state.rng;
            let style = SurfaceStyle {
                floor: rng.choose(&FLOOR_TEXTURES).copied().unwrap_or_default(),
                wall: rng.choose(&WALL_TEXTURES).copied().unwrap_or_default(),
                ceiling: rng.choose(&CEILING_TEXTURES).copied().unwrap_or_default(),
            };
            let height = SECTION_MIN_HEIGHT + rng.rn2(SECTION_MAX_HEIGHT - SECTION_MIN_HEIGHT);
            (style, height as f32)
        }
    };

    let section = state.section_mut(id);
    section.style = style;
    section.half_extent.z = height;
}

/// Sections too close to the map border keep their undecided sides closed
fn inside_margin(position: Vec3, map_size: u32) -> bool {
    let map_edge = map_size as f32 * CUBE_SIZE - 1.0;
    position.x > BORDER_MARGIN + 1.0
        && position.y > BORDER_MARGIN + 1.0
        && position.x + BORDER_MARGIN < map_edge
        && position.y + BORDER_MARGIN < map_edge
}

/// Roll doors, merges and walls for the still undecided directions
///
/// Returns the number of sections generated by recursive merges.
fn decide_connections(state: &mut LevelState, id: SectionId, already_created: u32) -> u32 {
    let in_bounds = inside_margin(state.section(id).position, state.config.map_size);
    let mut created = 0;
    let mut placed_door = false;

    for dir in Direction::iter() {
        if state.section(id).connections[dir].is_resolved() {
            continue;
        }
        let Some(neighbor) = state.neighbor(id, dir) else {
            continue;
        };

        // a merge chain may have looped round and decided this side already
        if state.section(neighbor).generated {
            let mirrored = state.section(neighbor).connections[dir.opposite()];
            if mirrored.is_resolved() {
                if mirrored == Connection::Open {
                    link_open(state, id, neighbor);
                }
                state.section_mut(id).connections[dir] = mirrored;
                continue;
            }
        }

        if !in_bounds {
            continue;
        }

        let door_roll = state.rng.roll_under(state.config.door_chance);
        let forced = state.progression < state.config.progression_min && state.frontier <= 3;
        if (door_roll || forced) && !placed_door {
            state.section_mut(id).connections[dir] = Connection::Door;
            state.frontier += 1;
            placed_door = true;
            continue;
        }

        let merge_roll = state.rng.roll_under(state.config.merge_chance);
        let group_size = state.compound_of(id).map_or(0, |g| g.len());
        let counted = group_size + (already_created + created) as usize;
        if merge_roll && counted < state.config.compound_max_size {
            state.section_mut(id).connections[dir] = Connection::Open;
            link_open(state, id, neighbor);
            created += generate(state, neighbor, Some(id));
        } else {
            state.section_mut(id).connections[dir] = Connection::Wall;
        }
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;
    use crate::grid::GridCoord;
    use crate::rng::GameRng;

    fn level_with(door_chance: i32, merge_chance: i32, seed: u64) -> LevelState {
        let config = GenConfig {
            door_chance,
            merge_chance,
            ..Default::default()
        };
        LevelState::new(config, GameRng::new(seed)).unwrap()
    }

    fn assert_symmetric(state: &LevelState) {
        for id in state.grid.ids() {
            let section = state.section(id);
            if !section.generated {
                continue;
            }
            for (dir, connection) in section.connections.iter() {
                assert!(connection.is_resolved());
                if let Some(n) = state.neighbor(id, dir) {
                    let other = state.section(n);
                    if other.generated {
                        assert_eq!(
                            *connection,
                            other.connections[dir.opposite()],
                            "{:?} {dir} disagrees with its neighbor",
                            section.coord
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_spawn_has_single_north_door() {
        let mut state = level_with(0, 0, 1);
        let spawn = state.spawn_id();
        assert_eq!(generate(&mut state, spawn, None), 1);

        let section = state.section(spawn);
        assert_eq!(section.kind, SectionKind::Spawn);
        assert_eq!(section.connections[Direction::North], Connection::Door);
        assert_eq!(section.count_connections(Connection::Door), 1);
        assert_eq!(section.count_connections(Connection::Wall), 3);
        assert_eq!(section.style, SurfaceStyle::SPAWN);
        assert_eq!(section.height(), SPAWN_HEIGHT);
        assert_eq!(state.generated_count(), 1);
        assert_eq!(state.frontier, 1);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let mut state = level_with(20, 30, 9);
        let id = state.grid.to_id(GridCoord::new(4, 4)).unwrap();
        let first = generate(&mut state, id, Some(SectionId(0)));
        assert!(first >= 1);

        let connections = state.section(id).connections;
        let frontier = state.frontier;
        let generated = state.generated_count();
        assert_eq!(generate(&mut state, id, Some(SectionId(0))), 0);
        assert_eq!(state.section(id).connections, connections);
        assert_eq!(state.frontier, frontier);
        assert_eq!(state.generated_count(), generated);
    }

    #[test]
    fn test_border_section_stays_closed() {
        let mut state = level_with(100, 100, 2);
        let id = state.grid.to_id(GridCoord::new(0, 5)).unwrap();
        assert_eq!(generate(&mut state, id, Some(SectionId(1))), 1);
        let section = state.section(id);
        assert_eq!(section.count_connections(Connection::Wall), 4);
        assert_eq!(state.frontier, 1);
    }

    #[test]
    fn test_at_most_one_door_per_call() {
        for seed in 0..20 {
            let mut state = level_with(100, -1, seed);
            let id = state.grid.to_id(GridCoord::new(5, 5)).unwrap();
            assert_eq!(generate(&mut state, id, Some(SectionId(0))), 1);
            let section = state.section(id);
            assert_eq!(section.count_connections(Connection::Door), 1);
            assert_eq!(section.connections[Direction::North], Connection::Door);
            assert_eq!(state.frontier, 2);
        }
    }

    #[test]
    fn test_merges_share_compound_and_style() {
        let mut state = level_with(-1, 100, 4);
        // keep the forced door rule from firing
        state.progression = state.config.progression_min;
        let id = state.grid.to_id(GridCoord::new(5, 5)).unwrap();
        let created = generate(&mut state, id, Some(SectionId(0)));
        assert!(created > 1);
        assert_eq!(created as usize, state.generated_count());

        let group = state.compound_of(id).unwrap();
        assert!(group.len() <= state.config.compound_max_size);
        let style = state.section(id).style;
        let height = state.section(id).height();
        for &member in group.members() {
            assert_eq!(state.section(member).style, style);
            assert_eq!(state.section(member).height(), height);
        }
        assert_symmetric(&state);
    }

    #[test]
    fn test_merge_cap_counts_group_and_created() {
        let grown = |cap: usize| {
            let mut state = level_with(-1, 100, 3);
            state.config.compound_max_size = cap;
            state.progression = state.config.progression_min;
            let id = state.grid.to_id(GridCoord::new(5, 5)).unwrap();
            let created = generate(&mut state, id, Some(SectionId(0)));
            let members = state.compound_of(id).map_or(0, |g| g.len());
            (created, members)
        };

        // the new section counts both as a member and as created
        assert_eq!(grown(2), (1, 1));
        assert_eq!(grown(3), (2, 2));
    }

    #[test]
    fn test_open_links_imply_same_compound() {
        for seed in 0..30 {
            let mut state = level_with(20, 60, seed);
            for x in 1..11 {
                for y in 1..11 {
                    let id = state.grid.to_id(GridCoord::new(x, y)).unwrap();
                    generate(&mut state, id, Some(SectionId(0)));
                }
            }
            assert_symmetric(&state);
            for id in state.grid.ids() {
                for (dir, connection) in state.section(id).connections.iter() {
                    if *connection == Connection::Open {
                        let n = state.neighbor(id, dir).unwrap();
                        assert_eq!(state.compound_id(id), state.compound_id(n));
                    }
                }
            }
        }
    }

    #[test]
    fn test_forced_door_when_frontier_is_thin() {
        // no random doors, yet progression below minimum forces one
        let mut state = level_with(-1, -1, 6);
        let id = state.grid.to_id(GridCoord::new(3, 3)).unwrap();
        generate(&mut state, id, Some(SectionId(0)));
        assert_eq!(state.section(id).count_connections(Connection::Door), 1);
    }

    #[test]
    fn test_margin_rule() {
        assert!(!inside_margin(Vec3::new(0.0, 480.0, 504.0), 128));
        assert!(inside_margin(Vec3::new(80.0, 80.0, 504.0), 128));
        assert!(inside_margin(Vec3::new(880.0, 880.0, 504.0), 128));
        assert!(!inside_margin(Vec3::new(1010.0, 80.0, 504.0), 128));
    }
}
