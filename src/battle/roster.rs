//! Battle roster: every combatant plus who can see and shoot whom
//!
//! Visibility is refreshed once per tick from the map. Sight lines ignore
//! features; firing lines do not, so a unit can see an enemy it cannot hit.

use ahash::{AHashMap, AHashSet};
use glam::Vec3;

use crate::battle::ai::CombatantFacts;
use crate::battle::battle_map::BattleMap;
use crate::battle::constants::UNIT_EYE_HEIGHT;
use crate::battle::units::{Combatant, EquipmentSlot, FirePermission, WeaponStatus};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{FactionId, UnitId};

fn eye_position(position: Vec3) -> Vec3 {
    position + Vec3::Z * UNIT_EYE_HEIGHT
}

/// All combatants in enumeration order
#[derive(Debug, Clone, Default)]
pub struct BattleRoster {
    units: Vec<Combatant>,
    index: AHashMap<UnitId, usize>,
    visible_enemies: AHashMap<FactionId, Vec<UnitId>>,
    fire_lines: AHashSet<(UnitId, UnitId)>,
}

impl BattleRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, unit: Combatant) -> UnitId {
        let id = unit.id;
        self.index.insert(id, self.units.len());
        self.units.push(unit);
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Combatant> {
        self.index.get(&id).and_then(|i| self.units.get(*i))
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Combatant> {
        match self.index.get(&id) {
            Some(i) => self.units.get_mut(*i),
            None => None,
        }
    }

    pub fn require_mut(&mut self, id: UnitId) -> Result<&mut Combatant> {
        self.get_mut(id).ok_or(SkirmishError::UnitNotFound(id))
    }

    /// Unit ids in enumeration order
    pub fn ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.units.iter()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Record that `viewer` sees `target`, and whether it has a line of fire
    pub fn record_sighting(&mut self, viewer: UnitId, target: UnitId, line_of_fire: bool) {
        let target_owner = match self.get(target) {
            Some(unit) => unit.owner,
            None => return,
        };
        let Some(unit) = self.get_mut(viewer) else {
            return;
        };
        if !unit.visible_units.contains(&target) {
            unit.visible_units.push(target);
        }
        let owner = unit.owner;

        if owner != target_owner {
            let enemies = self.visible_enemies.entry(owner).or_default();
            if !enemies.contains(&target) {
                enemies.push(target);
            }
        }
        if line_of_fire {
            self.fire_lines.insert((viewer, target));
        } else {
            self.fire_lines.remove(&(viewer, target));
        }
    }

    /// Recompute what every conscious unit can see and shoot
    pub fn refresh_visibility(&mut self, map: &BattleMap, vision_range: f32) {
        let snapshot: Vec<(UnitId, FactionId, Vec3)> = self
            .units
            .iter()
            .map(|u| (u.id, u.owner, u.position))
            .collect();

        let mut seen_enemies: AHashMap<FactionId, AHashSet<UnitId>> = AHashMap::new();
        let mut fire_lines = AHashSet::new();

        for unit in &mut self.units {
            unit.visible_units.clear();
            if !unit.conscious {
                continue;
            }
            let eye = eye_position(unit.position);

            for (other_id, other_owner, other_position) in &snapshot {
                if *other_id == unit.id || unit.position.distance(*other_position) > vision_range {
                    continue;
                }
                let target_eye = eye_position(*other_position);
                if !map.has_clear_line(eye, target_eye, false) {
                    continue;
                }

                unit.visible_units.push(*other_id);
                if map.has_clear_line(eye, target_eye, true) {
                    fire_lines.insert((unit.id, *other_id));
                }
                if *other_owner != unit.owner {
                    seen_enemies.entry(unit.owner).or_default().insert(*other_id);
                }
            }
        }

        // Keep faction lists in roster order
        self.visible_enemies = seen_enemies
            .into_iter()
            .map(|(faction, seen)| {
                let ordered = snapshot
                    .iter()
                    .map(|(id, _, _)| *id)
                    .filter(|id| seen.contains(id))
                    .collect();
                (faction, ordered)
            })
            .collect();
        self.fire_lines = fire_lines;
    }
}

impl CombatantFacts for BattleRoster {
    fn unit(&self, id: UnitId) -> Option<&Combatant> {
        self.get(id)
    }

    fn visible_enemies(&self, faction: FactionId) -> &[UnitId] {
        self.visible_enemies
            .get(&faction)
            .map(|enemies| enemies.as_slice())
            .unwrap_or(&[])
    }

    fn has_line_to_unit(&self, from: &Combatant, to: &Combatant) -> bool {
        self.fire_lines.contains(&(from.id, to.id))
    }

    fn can_attack_unit(&self, attacker: &Combatant, target: &Combatant) -> WeaponStatus {
        if attacker.fire_permission == FirePermission::CeaseFire
            || !self.has_line_to_unit(attacker, target)
        {
            return WeaponStatus::NotFiring;
        }

        let distance = attacker.distance_to(target);
        let reaches = |slot| {
            attacker
                .first_equipped(slot)
                .is_some_and(|item| item.reaches(distance))
        };
        WeaponStatus::from_hands(
            reaches(EquipmentSlot::RightHand),
            reaches(EquipmentSlot::LeftHand),
        )
    }
}
