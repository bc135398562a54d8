//! AI's read-only view of the battle state
//!
//! Everything a decision needs is reached through here, so all units of a
//! tick decide from the same snapshot.

use crate::battle::spatial::SpatialQuery;
use crate::battle::units::{Combatant, WeaponStatus};
use crate::core::types::{FactionId, UnitId};

/// Per-unit facts the battle answers for the AI
pub trait CombatantFacts {
    /// Look a unit up; `None` for stale references
    fn unit(&self, id: UnitId) -> Option<&Combatant>;

    /// Enemies visible to anyone in the faction, in enumeration order
    fn visible_enemies(&self, faction: FactionId) -> &[UnitId];

    /// Does `from` have a clear line of fire to `to`?
    fn has_line_to_unit(&self, from: &Combatant, to: &Combatant) -> bool;

    /// How `attacker` could attack `target` right now
    fn can_attack_unit(&self, attacker: &Combatant, target: &Combatant) -> WeaponStatus;
}

/// AI's decision-making context
pub struct DecisionContext<'a> {
    pub facts: &'a dyn CombatantFacts,
    pub map: &'a dyn SpatialQuery,
}

impl<'a> DecisionContext<'a> {
    pub fn new(facts: &'a dyn CombatantFacts, map: &'a dyn SpatialQuery) -> Self {
        Self { facts, map }
    }

    /// Ids of enemies visible to the unit's faction
    pub fn visible_enemy_ids(&self, unit: &Combatant) -> &'a [UnitId] {
        self.facts.visible_enemies(unit.owner)
    }

    /// Visible enemies resolved to units, dropping stale ids
    pub fn visible_enemies(&self, unit: &Combatant) -> Vec<&'a Combatant> {
        self.visible_enemy_ids(unit)
            .iter()
            .filter_map(|id| self.facts.unit(*id))
            .collect()
    }

    pub fn is_visible_enemy(&self, unit: &Combatant, other: UnitId) -> bool {
        self.visible_enemy_ids(unit).contains(&other)
    }

    /// The unit's focus target, if it still exists, is conscious and visible
    pub fn valid_focus(&self, unit: &Combatant) -> Option<&'a Combatant> {
        let focus = self.facts.unit(unit.focus_unit?)?;
        (focus.is_conscious() && self.is_visible_enemy(unit, focus.id)).then_some(focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battle_map::BattleMap;
    use crate::battle::roster::BattleRoster;
    use glam::Vec3;

    fn create_test_unit(owner: u32, x: f32) -> Combatant {
        Combatant::new(UnitId::new(), FactionId(owner), Vec3::new(x, 0.5, 1.0))
    }

    #[test]
    fn test_visible_enemies_skip_stale_ids() {
        let map = BattleMap::flat(8, 2, 2);
        let mut roster = BattleRoster::new();
        let own = roster.add(create_test_unit(0, 0.5));
        let enemy = roster.add(create_test_unit(1, 4.5));
        roster.record_sighting(own, enemy, true);

        let context = DecisionContext::new(&roster, &map);
        let unit = roster.get(own).unwrap();

        assert_eq!(context.visible_enemies(unit).len(), 1);
        assert!(context.is_visible_enemy(unit, enemy));
        assert!(!context.is_visible_enemy(unit, UnitId::new()));
    }

    #[test]
    fn test_valid_focus() {
        let map = BattleMap::flat(8, 2, 2);
        let mut roster = BattleRoster::new();
        let own = roster.add(create_test_unit(0, 0.5));
        let seen = roster.add(create_test_unit(1, 4.5));
        let hidden = roster.add(create_test_unit(1, 6.5));
        roster.record_sighting(own, seen, true);

        // No focus
        {
            let context = DecisionContext::new(&roster, &map);
            assert!(context.valid_focus(roster.get(own).unwrap()).is_none());
        }

        // Visible focus
        roster.get_mut(own).unwrap().focus_unit = Some(seen);
        {
            let context = DecisionContext::new(&roster, &map);
            let focus = context.valid_focus(roster.get(own).unwrap());
            assert_eq!(focus.map(|u| u.id), Some(seen));
        }

        // Hidden focus
        roster.get_mut(own).unwrap().focus_unit = Some(hidden);
        {
            let context = DecisionContext::new(&roster, &map);
            assert!(context.valid_focus(roster.get(own).unwrap()).is_none());
        }

        // Stale focus
        roster.get_mut(own).unwrap().focus_unit = Some(UnitId::new());
        {
            let context = DecisionContext::new(&roster, &map);
            assert!(context.valid_focus(roster.get(own).unwrap()).is_none());
        }

        // Unconscious focus
        roster.get_mut(own).unwrap().focus_unit = Some(seen);
        roster.get_mut(seen).unwrap().conscious = false;
        let context = DecisionContext::new(&roster, &map);
        assert!(context.valid_focus(roster.get(own).unwrap()).is_none());
    }
}
