//! Adaptive difficulty
//!
//! After every built section the spawn chances and both content
//! distributions are recomputed from how the player is doing: low health
//! raises "noobness" (more relief items, fewer monsters), progress and
//! accuracy raise monster pressure.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::config::GenConfig;
use crate::distribution::DistributionTable;
use crate::error::GenResult;
use crate::host::PlayerStats;

/// Player actions counted between refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ActionKind {
    Movement,
    Attack,
    Jump,
}

/// Actions since the last refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounters {
    pub movement: u32,
    pub attack: u32,
    pub jump: u32,
}

impl ActionCounters {
    pub fn record(&mut self, action: ActionKind) {
        let counter = match action {
            ActionKind::Movement => &mut self.movement,
            ActionKind::Attack => &mut self.attack,
            ActionKind::Jump => &mut self.jump,
        };
        *counter = counter.saturating_add(1);
    }

    /// Hand back the counts and start over from zero
    pub fn take(&mut self) -> ActionCounters {
        std::mem::take(self)
    }
}

/// Derived spawn chances and the content distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyModel {
    pub item_spawn_chance: i32,
    pub monster_spawn_chance: i32,
    pub item_dist: DistributionTable,
    pub monster_dist: DistributionTable,
    pub noobness: f32,
    pub progress: f32,
}

/// Relief score stepped by health thresholds
pub fn noobness_for_health(health: i32) -> f32 {
    match health {
        h if h < 25 => 2.0,
        h if h < 50 => 1.0,
        h if h < 75 => 0.5,
        _ => 0.0,
    }
}

impl DifficultyModel {
    /// Model at level start: base weights with no progression bonus
    pub fn initial(config: &GenConfig) -> GenResult<Self> {
        let item_dist =
            DistributionTable::build(&config.item_weights, 0.0, &config.item_relief_weights)?;
        let monster_dist = DistributionTable::build(
            &config.monster_weights,
            0.0,
            &config.monster_progression_weights,
        )?;

        Ok(Self {
            item_spawn_chance: config.item_spawn_chance,
            monster_spawn_chance: config.monster_spawn_chance,
            item_dist,
            monster_dist,
            noobness: 0.0,
            progress: 0.0,
        })
    }

    /// Recompute everything from the player's state and the level progression
    ///
    /// Consumes the action counters. An absent player counts as full health
    /// with no accuracy.
    pub fn refresh(
        &mut self,
        config: &GenConfig,
        player: Option<PlayerStats>,
        progression: u32,
        actions: &mut ActionCounters,
    ) {
        let player = player.unwrap_or_default();
        let accuracy = player.accuracy();
        let actions = actions.take();

        let noobness = noobness_for_health(player.health);
        let progress =
            progression as f32 / config.progression_min as f32 + accuracy as f32 / 150.0;

        self.item_spawn_chance = config.item_spawn_chance
            + (5.0 * noobness) as i32
            + (0.2 * actions.attack as f32) as i32;
        self.monster_spawn_chance =
            config.monster_spawn_chance + (8.0 * progress) as i32 - (10.0 * noobness) as i32;

        match DistributionTable::build(
            &config.monster_weights,
            progress,
            &config.monster_progression_weights,
        ) {
            Ok(table) => self.monster_dist = table,
            Err(err) => tracing::warn!(%err, "keeping previous monster distribution"),
        }
        match DistributionTable::build(&config.item_weights, noobness, &config.item_relief_weights)
        {
            Ok(table) => self.item_dist = table,
            Err(err) => tracing::warn!(%err, "keeping previous item distribution"),
        }

        self.noobness = noobness;
        self.progress = progress;

        tracing::debug!(
            progress,
            noobness,
            accuracy,
            item_chance = self.item_spawn_chance,
            monster_chance = self.monster_spawn_chance,
            "difficulty refreshed"
        );
    }
}
