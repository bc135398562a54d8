//! Unit AI for battle decision-making
//!
//! Architecture: Trait + Data hybrid
//! - UnitAi trait defines the interface for swappable per-unit behaviours
//! - DefaultUnitAi is the fallback behaviour for units nobody else controls
//! - DecisionContext provides the read-only battle view a decision is made from

mod decision;
mod decision_context;
mod default_ai;
mod targeting;

pub use decision::{AiAction, AiDecision, AiMovement};
pub use decision_context::{CombatantFacts, DecisionContext};
pub use default_ai::DefaultUnitAi;
pub use targeting::{rank_by_distance, RankedCandidate};

use glam::Vec3;

use crate::battle::context::BattleContext;
use crate::battle::units::Combatant;

/// Trait for per-unit AI implementations
pub trait UnitAi {
    /// Forget timers and attacker memory (e.g. when the unit wakes up)
    fn reset(&mut self, context: &BattleContext, unit: &Combatant);

    /// Someone fired at the unit from `position` (relative to the unit)
    fn notify_under_fire(&mut self, position: Vec3);

    /// The unit was hit by a shot fired from `position` (relative to the unit)
    fn notify_hit(&mut self, position: Vec3);

    /// Decide what the unit should do this tick
    ///
    /// Returns the decision and whether anything was decided. Nothing is
    /// applied here; the caller owns the consequences.
    fn think(
        &mut self,
        context: &mut BattleContext,
        view: &DecisionContext<'_>,
        unit: &Combatant,
        interrupt: bool,
    ) -> (AiDecision, bool);
}
