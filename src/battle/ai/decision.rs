//! What a unit AI hands back to the orchestrator

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::battle::units::{Gait, Stance, WeaponStatus};
use crate::core::types::UnitId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiAction {
    AttackTarget {
        target: UnitId,
        weapon_status: WeaponStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AiMovement {
    /// Face towards a location without moving
    Turn { target_location: Vec3 },
    /// Walk or run to a tile
    Patrol {
        target_location: IVec3,
        stance: Stance,
        gait: Gait,
    },
}

/// Result of one `think()` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AiDecision {
    pub action: Option<AiAction>,
    pub movement: Option<AiMovement>,
}

impl AiDecision {
    pub fn new(action: Option<AiAction>, movement: Option<AiMovement>) -> Self {
        Self { action, movement }
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.movement.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decision_is_empty() {
        assert!(AiDecision::default().is_empty());
    }

    #[test]
    fn test_decision_with_movement_is_not_empty() {
        let decision = AiDecision::new(
            None,
            Some(AiMovement::Turn {
                target_location: Vec3::X,
            }),
        );
        assert!(!decision.is_empty());
    }
}
