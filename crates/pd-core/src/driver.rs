//! Level driver: the entry points the host calls
//!
//! A `Generator` owns the `LevelState` of one level. The host starts the
//! level, reports doors the player reaches and player actions, and finally
//! tears the level down into a `LevelSummary`.

use serde::{Deserialize, Serialize};

use crate::config::GenConfig;
use crate::consts::DOOR_REACH_RADIUS;
use crate::difficulty::ActionKind;
use crate::error::{GenError, GenResult};
use crate::generate::generate;
use crate::geometry::Vec3;
use crate::grid::{Direction, SectionId};
use crate::host::LevelHost;
use crate::instantiate::{Instantiation, instantiate};
use crate::level::LevelState;
use crate::rng::GameRng;
use crate::section::Connection;

/// A door of a built section that leads into an unbuilt one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingDoor {
    pub from: SectionId,
    pub dir: Direction,
    pub to: SectionId,
    /// Point that opens the door when reached
    pub probe: Vec3,
}

/// Final numbers of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub seed: u64,
    pub progression: u32,
    pub frontier: u32,
    pub exit_section: Option<SectionId>,
    pub fallback_exit: bool,
    pub generated: usize,
    pub instantiated: usize,
    pub entities_spawned: u32,
}

/// Lazy generator of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    state: LevelState,
}

impl Generator {
    /// Set up a level and build its spawn room
    ///
    /// The spawn sits at the grid center and is generated and instantiated
    /// right away, which generates the room behind its door.
    pub fn start_level(
        config: GenConfig,
        seed: u64,
        host: &mut dyn LevelHost,
    ) -> GenResult<Self> {
        let mut state = LevelState::new(config, GameRng::new(seed))?;

        let spawn = state.spawn_id();
        generate(&mut state, spawn, None);
        instantiate(&mut state, spawn, host);

        tracing::info!(
            seed,
            spawn = spawn.0,
            frontier = state.frontier,
            "level started"
        );

        let mut generator = Self { state };
        generator.ensure_exit(host);
        Ok(generator)
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LevelState {
        &mut self.state
    }

    /// The player reached `position`; open the door there if there is one
    ///
    /// Returns true when a new section was built behind the door. Reaching a
    /// door whose far side is already built, or no door at all, returns
    /// false and changes nothing.
    pub fn on_door_reached(&mut self, position: Vec3, host: &mut dyn LevelHost) -> bool {
        let Some((from, dir)) = self.door_at(position) else {
            tracing::trace!(?position, "no door in reach");
            return false;
        };
        let Some(target) = self.state.neighbor(from, dir) else {
            return false;
        };

        match instantiate(&mut self.state, target, host) {
            Instantiation::Fresh => {
                self.state.decrement_frontier();
                tracing::info!(
                    from = from.0,
                    %dir,
                    section = target.0,
                    frontier = self.state.frontier,
                    progression = self.state.progression,
                    "door opened"
                );
                self.ensure_exit(host);
                true
            }
            Instantiation::AlreadyDone => false,
        }
    }

    /// First built section with a door whose probe is within reach of `position`
    fn door_at(&self, position: Vec3) -> Option<(SectionId, Direction)> {
        self.state
            .grid
            .ids()
            .filter(|&id| self.state.section(id).instantiated)
            .find_map(|id| {
                let section = self.state.section(id);
                section
                    .connections
                    .iter()
                    .find(|&(dir, connection)| {
                        *connection == Connection::Door
                            && section.door_probe(dir).distance(position) < DOOR_REACH_RADIUS
                    })
                    .map(|(dir, _)| (id, dir))
            })
    }

    /// Hook for monster deaths; nothing reacts to them yet
    pub fn on_monster_killed(&mut self) {
        tracing::trace!(progression = self.state.progression, "monster killed");
    }

    /// Count a player action for the next difficulty refresh
    pub fn record_action(&mut self, action: ActionKind) {
        self.state.actions.record(action);
    }

    /// First generated section whose box, widened by `tolerance`, holds `position`
    pub fn locate_section(&self, position: Vec3, tolerance: (f32, f32)) -> Option<SectionId> {
        self.state.grid.ids().find(|&id| {
            let section = self.state.section(id);
            section.generated && section.contains_point(position, tolerance)
        })
    }

    /// Doors of built sections that lead into unbuilt ones, in id order
    pub fn pending_doors(&self) -> Vec<PendingDoor> {
        let mut doors = Vec::new();
        for from in self.state.grid.ids() {
            let section = self.state.section(from);
            if !section.instantiated {
                continue;
            }
            for (dir, connection) in section.connections.iter() {
                if *connection != Connection::Door {
                    continue;
                }
                if let Some(to) = self.state.neighbor(from, dir)
                    && !self.state.section(to).instantiated
                {
                    doors.push(PendingDoor {
                        from,
                        dir,
                        to,
                        probe: section.door_probe(dir),
                    });
                }
            }
        }
        doors
    }

    /// Fails when no exit exists and no door is left to build one behind
    pub fn check_exit_reachable(&self) -> GenResult<()> {
        if self.state.exit_created || self.state.has_reachable_frontier() {
            return Ok(());
        }
        Err(GenError::FrontierExhausted {
            progression: self.state.progression,
        })
    }

    fn ensure_exit(&mut self, host: &mut dyn LevelHost) {
        if let Err(err) = self.check_exit_reachable() {
            tracing::error!(%err, "forcing a level exit");
            self.force_exit(host);
        }
    }

    /// Turn the last built normal room into the exit, or put the level end
    /// in the spawn room when there is none
    fn force_exit(&mut self, host: &mut dyn LevelHost) {
        let state = &mut self.state;
        state.fallback_exit = true;

        let last = state.last_normal_instantiated;
        let position = match last {
            Some(id) if state.try_make_exit(id) => state.section(id).exit_trigger_position(),
            _ => {
                state.exit_created = true;
                let spawn = state.spawn_id();
                state.section(spawn).exit_trigger_position()
            }
        };
        let index = state.next_entity_index();
        host.spawn_level_end(position, index);
    }

    fn summary(&self) -> LevelSummary {
        LevelSummary {
            seed: self.state.rng.seed(),
            progression: self.state.progression,
            frontier: self.state.frontier,
            exit_section: self.state.exit_section,
            fallback_exit: self.state.fallback_exit,
            generated: self.state.generated_count(),
            instantiated: self.state.instantiated_count(),
            entities_spawned: self.state.entities_spawned,
        }
    }

    /// Tear the level down
    pub fn finish(self) -> LevelSummary {
        let summary = self.summary();
        tracing::info!(
            progression = summary.progression,
            exit = summary.exit_section.map(|id| id.0),
            fallback = summary.fallback_exit,
            "level finished"
        );
        summary
    }
}
