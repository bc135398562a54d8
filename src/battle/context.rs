//! Per-tick battle context shared by the AI and physics engines
//!
//! Clock, random source and turn ownership are passed explicitly to every
//! operation instead of living in globals.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, Tick};

/// How the battle advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleMode {
    #[default]
    RealTime,
    TurnBased,
}

impl BattleMode {
    pub fn is_real_time(&self) -> bool {
        matches!(self, BattleMode::RealTime)
    }
}

/// Shared simulation state for one battle
#[derive(Debug, Clone)]
pub struct BattleContext {
    pub tick: Tick,
    pub mode: BattleMode,
    /// Faction holding the turn (meaningful in turn-based mode)
    pub active_faction: FactionId,
    pub rng: ChaCha8Rng,
}

impl BattleContext {
    pub fn new(mode: BattleMode, active_faction: FactionId, seed: u64) -> Self {
        Self {
            tick: 0,
            mode,
            active_faction,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn is_real_time(&self) -> bool {
        self.mode.is_real_time()
    }

    /// Does this faction currently hold the turn?
    pub fn holds_turn(&self, faction: FactionId) -> bool {
        self.active_faction == faction
    }

    /// Uniformly pick one element of a finite candidate list
    pub fn choose<'a, T>(&mut self, candidates: &'a [T]) -> Option<&'a T> {
        candidates.choose(&mut self.rng)
    }

    pub fn advance(&mut self, ticks: Tick) {
        self.tick += ticks;
    }
}
