//! Combatants and the facts the default AI reads from them
//!
//! A combatant is owned by the battle roster. The AI only ever borrows it
//! immutably; everything it decides is applied later by the orchestrator.

use std::collections::VecDeque;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, UnitId};

/// Whether a unit is allowed to open fire on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirePermission {
    #[default]
    Normal,
    CeaseFire,
}

/// Body posture, carried into movement orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Kneeling,
}

/// Movement speed of a patrol order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gait {
    Walking,
    Running,
}

/// Behaviour class of a unit; `None` marks things that pose no threat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiType {
    None,
    Civilian,
    #[default]
    Combatant,
}

/// Entries of a unit's mission queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Mission {
    /// Do nothing until the given tick; suppresses auto-attack while at the front
    Snooze { until: u64 },
    Turn { target: Vec3 },
    GotoLocation { target: IVec3 },
}

/// Hand slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentSlot {
    RightHand,
    LeftHand,
}

/// Resolved way a unit would attack a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponStatus {
    NotFiring,
    FiringLeftHand,
    FiringRightHand,
    FiringBothHands,
}

impl WeaponStatus {
    /// Combine per-hand feasibility into a status
    pub fn from_hands(right: bool, left: bool) -> Self {
        match (right, left) {
            (true, true) => WeaponStatus::FiringBothHands,
            (true, false) => WeaponStatus::FiringRightHand,
            (false, true) => WeaponStatus::FiringLeftHand,
            (false, false) => WeaponStatus::NotFiring,
        }
    }

    pub fn is_firing(&self) -> bool {
        !matches!(self, WeaponStatus::NotFiring)
    }
}

/// Item held in a hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub name: String,
    /// Loaded weapon able to fire right now
    pub can_fire: bool,
    /// Maximum firing distance in tiles
    pub range: f32,
}

impl EquippedItem {
    pub fn weapon(name: &str, range: f32) -> Self {
        Self {
            name: name.to_string(),
            can_fire: true,
            range,
        }
    }

    pub fn tool(name: &str) -> Self {
        Self {
            name: name.to_string(),
            can_fire: false,
            range: 0.0,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.can_fire
    }

    /// Can this item hit something at the given distance?
    pub fn reaches(&self, distance: f32) -> bool {
        self.can_fire && distance <= self.range
    }
}

/// A unit taking part in the battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: UnitId,
    pub owner: FactionId,
    pub ai_type: AiType,

    // Position
    pub position: Vec3,
    pub facing: Vec3,

    // State
    pub conscious: bool,
    pub busy: bool,
    pub moving: bool,
    pub attacking: bool,
    pub immobile: bool,
    pub can_run: bool,
    pub stance: Stance,
    pub fire_permission: FirePermission,
    pub enzyme_debuff_intensity: u32,

    // Equipment
    pub right_hand: Option<EquippedItem>,
    pub left_hand: Option<EquippedItem>,

    // Orders and awareness
    pub missions: VecDeque<Mission>,
    /// Locked-on enemy; may refer to a unit that no longer exists
    pub focus_unit: Option<UnitId>,
    /// Units this combatant can currently see, in enumeration order
    pub visible_units: Vec<UnitId>,
}

impl Combatant {
    pub fn new(id: UnitId, owner: FactionId, position: Vec3) -> Self {
        Self {
            id,
            owner,
            ai_type: AiType::default(),
            position,
            facing: Vec3::X,
            conscious: true,
            busy: false,
            moving: false,
            attacking: false,
            immobile: false,
            can_run: true,
            stance: Stance::default(),
            fire_permission: FirePermission::default(),
            enzyme_debuff_intensity: 0,
            right_hand: None,
            left_hand: None,
            missions: VecDeque::new(),
            focus_unit: None,
            visible_units: Vec::new(),
        }
    }

    pub fn is_conscious(&self) -> bool {
        self.conscious
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn can_move(&self) -> bool {
        self.conscious && !self.immobile
    }

    /// Poses no threat and should never be auto-targeted
    pub fn is_harmless(&self) -> bool {
        matches!(self.ai_type, AiType::None)
    }

    /// Is the front of the mission queue a snooze?
    pub fn is_snoozing(&self) -> bool {
        matches!(self.missions.front(), Some(Mission::Snooze { .. }))
    }

    pub fn first_equipped(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        match slot {
            EquipmentSlot::RightHand => self.right_hand.as_ref(),
            EquipmentSlot::LeftHand => self.left_hand.as_ref(),
        }
    }

    /// Does either hand hold something that can fire?
    pub fn has_firing_weapon(&self) -> bool {
        [EquipmentSlot::RightHand, EquipmentSlot::LeftHand]
            .iter()
            .filter_map(|slot| self.first_equipped(*slot))
            .any(|item| item.can_fire())
    }

    /// Is the unit allowed and able to open fire?
    pub fn may_open_fire(&self) -> bool {
        self.fire_permission != FirePermission::CeaseFire && self.has_firing_weapon()
    }

    /// Fastest gait the unit's equipment and condition allow
    pub fn fastest_gait(&self) -> Gait {
        if self.can_run {
            Gait::Running
        } else {
            Gait::Walking
        }
    }

    pub fn can_see(&self, other: UnitId) -> bool {
        self.visible_units.contains(&other)
    }

    /// Tile the unit stands in
    pub fn tile(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }

    pub fn distance_to(&self, other: &Combatant) -> f32 {
        self.position.distance(other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_unit() -> Combatant {
        Combatant::new(UnitId::new(), FactionId(1), Vec3::new(2.5, 3.5, 1.0))
    }

    #[test]
    fn test_new_unit_is_idle_and_conscious() {
        let unit = create_test_unit();
        assert!(unit.is_conscious());
        assert!(!unit.is_busy());
        assert!(!unit.is_moving());
        assert!(!unit.is_attacking());
        assert!(unit.can_move());
    }

    #[test]
    fn test_has_firing_weapon() {
        let mut unit = create_test_unit();
        assert!(!unit.has_firing_weapon());

        unit.left_hand = Some(EquippedItem::tool("medikit"));
        assert!(!unit.has_firing_weapon());

        unit.right_hand = Some(EquippedItem::weapon("pistol", 12.0));
        assert!(unit.has_firing_weapon());
        assert!(unit.may_open_fire());

        unit.fire_permission = FirePermission::CeaseFire;
        assert!(!unit.may_open_fire());
    }

    #[test]
    fn test_snooze_only_counts_at_front() {
        let mut unit = create_test_unit();
        unit.missions.push_back(Mission::Turn { target: Vec3::ZERO });
        unit.missions.push_back(Mission::Snooze { until: 100 });
        assert!(!unit.is_snoozing());

        unit.missions.pop_front();
        assert!(unit.is_snoozing());
    }

    #[test]
    fn test_tile_floors_position() {
        let unit = create_test_unit();
        assert_eq!(unit.tile(), IVec3::new(2, 3, 1));
    }

    #[test]
    fn test_fastest_gait() {
        let mut unit = create_test_unit();
        assert_eq!(unit.fastest_gait(), Gait::Running);
        unit.can_run = false;
        assert_eq!(unit.fastest_gait(), Gait::Walking);
    }

    #[test]
    fn test_weapon_status_from_hands() {
        assert_eq!(WeaponStatus::from_hands(true, true), WeaponStatus::FiringBothHands);
        assert_eq!(WeaponStatus::from_hands(false, true), WeaponStatus::FiringLeftHand);
        assert!(!WeaponStatus::from_hands(false, false).is_firing());
    }

    #[test]
    fn test_unconscious_unit_cannot_move() {
        let mut unit = create_test_unit();
        unit.conscious = false;
        assert!(!unit.can_move());
    }
}
