//! Level state: the section grid and the counters shared by every
//! generation step of one level

use serde::{Deserialize, Serialize};

use crate::compound::{CompoundArena, CompoundGroup, CompoundId};
use crate::config::GenConfig;
use crate::consts::FIRST_ENTITY_INDEX;
use crate::difficulty::{ActionCounters, DifficultyModel};
use crate::distribution::DistributionTable;
use crate::error::GenResult;
use crate::grid::{Direction, GridCoord, GridIndex, SectionId};
use crate::host::EntityIndex;
use crate::rng::GameRng;
use crate::section::{Connection, Section, SectionKind};

/// Everything generation knows about the level being built
///
/// Created at level start, dropped at level end. Every generation step takes
/// it by mutable reference; nothing lives in statics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    pub config: GenConfig,
    pub rng: GameRng,
    pub grid: GridIndex,
    pub sections: Vec<Section>,
    pub compounds: CompoundArena,

    /// Sections instantiated so far
    pub progression: u32,
    /// Generated sections behind a door that nobody has reached yet
    pub frontier: u32,
    pub exit_created: bool,
    pub exit_section: Option<SectionId>,
    /// Set when the exit had to be forced after the frontier ran dry
    pub fallback_exit: bool,
    /// Exit percentage, grows once progression reaches the minimum
    pub exit_chance: i32,

    pub difficulty: DifficultyModel,
    pub actions: ActionCounters,

    pub last_normal_instantiated: Option<SectionId>,
    next_entity: u32,
    pub entities_spawned: u32,
}

impl LevelState {
    /// Fresh level: every section untouched, one pending door (the spawn's)
    ///
    /// Fails when `config` does not validate.
    pub fn new(config: GenConfig, rng: GameRng) -> GenResult<Self> {
        config.validate()?;
        let grid = config.grid();
        let sections = grid
            .ids()
            .map(|id| Section::new(grid.to_coord(id)))
            .collect();
        let difficulty = DifficultyModel::initial(&config)?;

        Ok(Self {
            config,
            rng,
            grid,
            sections,
            compounds: CompoundArena::new(),
            progression: 0,
            frontier: 1,
            exit_created: false,
            exit_section: None,
            fallback_exit: false,
            exit_chance: 0,
            difficulty,
            actions: ActionCounters::default(),
            last_normal_instantiated: None,
            next_entity: FIRST_ENTITY_INDEX,
            entities_spawned: 0,
        })
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    pub fn section_mut(&mut self, id: SectionId) -> &mut Section {
        &mut self.sections[id.index()]
    }

    /// Section at a grid coordinate
    pub fn section_at(&self, coord: GridCoord) -> GenResult<&Section> {
        let id = self.grid.try_id(coord)?;
        Ok(self.section(id))
    }

    /// Section id of the spawn room, the center of the grid
    pub fn spawn_id(&self) -> SectionId {
        let half = self.grid.line() / 2;
        SectionId(half * self.grid.line() + half)
    }

    pub fn neighbor(&self, id: SectionId, dir: Direction) -> Option<SectionId> {
        self.grid.neighbor(id, dir)
    }

    /// Live compound group of a section, if it has been assigned one
    pub fn compound_of(&self, id: SectionId) -> Option<&CompoundGroup> {
        self.section(id).compound.map(|c| self.compounds.get(c))
    }

    /// Live compound id of a section
    pub fn compound_id(&self, id: SectionId) -> Option<CompoundId> {
        self.section(id).compound.map(|c| self.compounds.resolve(c))
    }

    pub fn item_dist(&self) -> &DistributionTable {
        &self.difficulty.item_dist
    }

    pub fn monster_dist(&self) -> &DistributionTable {
        &self.difficulty.monster_dist
    }

    /// Hand out the next entity index
    pub fn next_entity_index(&mut self) -> EntityIndex {
        let index = EntityIndex(self.next_entity);
        self.next_entity += 1;
        self.entities_spawned += 1;
        index
    }

    /// One frontier section got built; never drops below zero
    pub fn decrement_frontier(&mut self) {
        match self.frontier.checked_sub(1) {
            Some(n) => self.frontier = n,
            None => tracing::warn!("frontier counter already at zero"),
        }
    }

    /// Turn `id` into the exit unless an exit exists or it is not a normal room
    ///
    /// Returns whether the section became the exit.
    pub fn try_make_exit(&mut self, id: SectionId) -> bool {
        if self.exit_created || self.section(id).kind != SectionKind::Normal {
            return false;
        }
        self.section_mut(id).kind = SectionKind::Exit;
        self.exit_created = true;
        self.exit_section = Some(id);
        tracing::info!(section = id.0, progression = self.progression, "exit created");
        true
    }

    /// Whether some built section still has a door into an unbuilt one
    pub fn has_reachable_frontier(&self) -> bool {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.instantiated)
            .any(|(i, s)| {
                s.connections.iter().any(|(dir, c)| {
                    *c == Connection::Door
                        && self
                            .neighbor(SectionId(i as u32), dir)
                            .is_some_and(|n| !self.section(n).instantiated)
                })
            })
    }

    pub fn generated_count(&self) -> usize {
        self.sections.iter().filter(|s| s.generated).count()
    }

    pub fn instantiated_count(&self) -> usize {
        self.sections.iter().filter(|s| s.instantiated).count()
    }
}
