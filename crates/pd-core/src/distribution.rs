//! Cumulative weighted distributions over a fixed set of kind slots
//!
//! Tables are rebuilt, never edited: a difficulty refresh produces a new
//! table from the base weights, a multiplier and a second weight vector.

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::rng::GameRng;

/// Cumulative weights, one entry per slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTable {
    cumulative: Vec<u32>,
}

impl DistributionTable {
    /// Build `cumulative[i] = cumulative[i-1] + base[i] + floor(multiplier * extra[i])`
    ///
    /// Negative or non-finite multipliers contribute nothing. Fails when the
    /// resulting total weight is below 1, since such a table cannot be sampled.
    pub fn build(base: &[u32], multiplier: f32, extra: &[u32]) -> Result<Self, GenError> {
        let mut cumulative = Vec::with_capacity(base.len());
        let mut running: u32 = 0;
        for (i, &weight) in base.iter().enumerate() {
            let bonus = extra.get(i).map_or(0, |&w| scaled_weight(multiplier, w));
            running = running.saturating_add(weight).saturating_add(bonus);
            cumulative.push(running);
        }

        if running < 1 {
            return Err(GenError::InvalidDistribution { total: running });
        }
        Ok(Self { cumulative })
    }

    /// Table from plain weights
    pub fn from_weights(weights: &[u32]) -> Result<Self, GenError> {
        Self::build(weights, 0.0, &[])
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Sum of all slot weights
    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn cumulative(&self) -> &[u32] {
        &self.cumulative
    }

    /// Weight of a single slot
    pub fn weight(&self, slot: usize) -> u32 {
        match slot {
            0 => self.cumulative.first().copied().unwrap_or(0),
            _ => self
                .cumulative
                .get(slot)
                .map_or(0, |&c| c - self.cumulative[slot - 1]),
        }
    }

    /// Draw a slot with probability proportional to its weight
    ///
    /// Draws `s` uniformly from `1..=total` and returns the first slot whose
    /// cumulative weight reaches `s`.
    pub fn sample(&self, rng: &mut GameRng) -> usize {
        let s = rng.rnd(self.total());
        self.cumulative.partition_point(|&c| c < s)
    }
}

fn scaled_weight(multiplier: f32, weight: u32) -> u32 {
    let scaled = (multiplier * weight as f32).floor();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u32
    } else {
        0
    }
}
