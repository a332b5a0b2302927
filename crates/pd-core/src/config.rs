//! Generation tunables and config file loading
//!
//! Every field has a default reproducing the stock level rules, so a config
//! file only needs to name what it changes. Percentages are compared as
//! `roll <= chance` with `roll` drawn from `0..=100`, so a negative chance
//! never succeeds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAP_SIZE, SECTION_SIZE};
use crate::content::{ItemKind, MonsterKind};
use crate::distribution::DistributionTable;
use crate::error::{GenError, GenResult};
use crate::grid::GridIndex;

/// Level generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Map edge length in cubes; the section grid has `map_size / 10` sections per edge
    pub map_size: u32,

    // Topology
    pub door_chance: i32,
    pub merge_chance: i32,
    pub compound_max_size: usize,

    // Progression and exit
    pub progression_min: u32,
    pub exit_chance_step: i32,

    // Content
    pub item_spawn_chance: i32,
    pub monster_spawn_chance: i32,
    pub items_max_per_section: u32,
    pub monsters_max_per_section: u32,
    pub dead_end_item_bonus: i32,

    // Distribution weights, in `ItemKind` / `MonsterKind` slot order
    pub item_weights: Vec<u32>,
    pub item_relief_weights: Vec<u32>,
    pub monster_weights: Vec<u32>,
    pub monster_progression_weights: Vec<u32>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,

            door_chance: 20,
            merge_chance: 30,
            compound_max_size: 8,

            progression_min: 6,
            exit_chance_step: 8,

            item_spawn_chance: 50,
            monster_spawn_chance: 60,
            items_max_per_section: 6,
            monsters_max_per_section: 8,
            dead_end_item_bonus: 30,

            item_weights: vec![35, 25, 10, 10, 10, 5, 10, 5, 5, 5, 2],
            item_relief_weights: vec![10, 0, 10, 0, 0, 0, 20, 15, 10, 8, 8],
            monster_weights: vec![25, 20, 15, 4, 0, 12, 4, 12, 2],
            monster_progression_weights: vec![2, 2, 5, 10, 6, 8, 10, 5, 10],
        }
    }
}

impl GenConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> GenResult<Self> {
        let config: GenConfig =
            toml::from_str(text).map_err(|e| GenError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> GenResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Sections per grid edge
    pub fn sections_line(&self) -> u32 {
        self.map_size / SECTION_SIZE
    }

    pub fn grid(&self) -> GridIndex {
        GridIndex::new(self.sections_line())
    }

    /// Check lengths, ranges and that both distributions can be sampled
    pub fn validate(&self) -> GenResult<()> {
        if self.sections_line() < 3 {
            return Err(GenError::InvalidConfig(format!(
                "map_size {} leaves fewer than 3 sections per edge",
                self.map_size
            )));
        }
        if self.compound_max_size < 1 {
            return Err(GenError::InvalidConfig(
                "compound_max_size must be at least 1".to_string(),
            ));
        }
        if self.progression_min < 1 {
            return Err(GenError::InvalidConfig(
                "progression_min must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("door_chance", self.door_chance),
            ("merge_chance", self.merge_chance),
            ("exit_chance_step", self.exit_chance_step),
            ("item_spawn_chance", self.item_spawn_chance),
            ("monster_spawn_chance", self.monster_spawn_chance),
            ("dead_end_item_bonus", self.dead_end_item_bonus),
        ] {
            if value > 100 {
                return Err(GenError::InvalidConfig(format!(
                    "{name} must be at most 100, got {value}"
                )));
            }
        }

        check_len("item_weights", &self.item_weights, ItemKind::ALL.len())?;
        check_len(
            "item_relief_weights",
            &self.item_relief_weights,
            ItemKind::ALL.len(),
        )?;
        check_len("monster_weights", &self.monster_weights, MonsterKind::ALL.len())?;
        check_len(
            "monster_progression_weights",
            &self.monster_progression_weights,
            MonsterKind::ALL.len(),
        )?;

        // base weights alone must be sampleable, whatever the multipliers become
        DistributionTable::from_weights(&self.item_weights)?;
        DistributionTable::from_weights(&self.monster_weights)?;
        Ok(())
    }
}

fn check_len(name: &str, weights: &[u32], expected: usize) -> GenResult<()> {
    if weights.len() != expected {
        return Err(GenError::InvalidConfig(format!(
            "{name} needs {expected} entries, got {}",
            weights.len()
        )));
    }
    Ok(())
}
