//! Default behaviour for units not under direct or scripted control
//!
//! Every tick the unit may:
//! - turn towards whoever last shot at it,
//! - attack the nearest enemy it can hit (or just face one if it cannot fire),
//! - stumble to a random neighbouring tile while under an enzyme debuff.
//!
//! Scans only rerun once the matching cooldown has expired.

use glam::{IVec3, Vec3};

use super::decision::{AiAction, AiDecision, AiMovement};
use super::decision_context::DecisionContext;
use super::targeting::{nearest, rank_by_distance};
use super::UnitAi;
use crate::battle::context::BattleContext;
use crate::battle::units::{Combatant, WeaponStatus};
use crate::core::config::AiConfig;
use crate::core::types::Tick;

/// Per-unit state of the default behaviour
#[derive(Debug, Clone)]
pub struct DefaultUnitAi {
    config: AiConfig,
    /// Tick from which the unit may look for a target again
    pub ticks_auto_target_available: Tick,
    /// Tick from which the unit may turn on its own again
    pub ticks_auto_turn_available: Tick,
    /// Where the last shot came from, relative to the unit; consumed by `think()`
    pub attacker_position: Option<Vec3>,
    /// Whether the last `think()` ran
    pub active: bool,
}

impl DefaultUnitAi {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            ticks_auto_target_available: 0,
            ticks_auto_turn_available: 0,
            attacker_position: None,
            active: false,
        }
    }

    fn turn_available(&self, now: Tick) -> bool {
        self.ticks_auto_turn_available <= now
    }

    fn target_available(&self, now: Tick) -> bool {
        self.ticks_auto_target_available <= now
    }

    fn start_turn_cooldown(&mut self, now: Tick) {
        self.ticks_auto_turn_available = now + self.config.auto_turn_cooldown;
    }

    /// Pick an enemy to look at when the unit cannot or may not shoot
    fn pick_facing_target<'a>(
        &self,
        real_time: bool,
        view: &DecisionContext<'a>,
        unit: &Combatant,
    ) -> Option<&'a Combatant> {
        if let Some(focus) = view.valid_focus(unit) {
            return Some(focus);
        }
        // In turn based having a focus means we may only deal with that unit
        if !real_time {
            return None;
        }

        let candidates: Vec<&Combatant> = view
            .visible_enemies(unit)
            .into_iter()
            .filter(|enemy| enemy.is_conscious() && !enemy.is_harmless())
            .collect();

        let (in_line, out_of_line): (Vec<&Combatant>, Vec<&Combatant>) = candidates
            .into_iter()
            .partition(|enemy| view.facts.has_line_to_unit(unit, enemy));

        // Something we can see but not shoot at, in case nothing is in line
        let backup = nearest(
            unit.position,
            out_of_line.into_iter().filter(|enemy| unit.can_see(enemy.id)),
        );

        nearest(unit.position, in_line).or(backup)
    }

    /// Pick an enemy to shoot, with the weapon status to shoot it with
    fn pick_attack_target<'a>(
        &self,
        real_time: bool,
        view: &DecisionContext<'a>,
        unit: &Combatant,
    ) -> Option<(&'a Combatant, WeaponStatus)> {
        if let Some(focus) = view.valid_focus(unit) {
            let status = view.facts.can_attack_unit(unit, focus);
            if status.is_firing() {
                return Some((focus, status));
            }
        }
        if !real_time {
            return None;
        }

        let candidates = view
            .visible_enemies(unit)
            .into_iter()
            .filter(|enemy| enemy.is_conscious() && !enemy.is_harmless());

        rank_by_distance(unit.position, candidates)
            .into_iter()
            .find_map(|candidate| {
                let status = view.facts.can_attack_unit(unit, candidate.unit);
                status.is_firing().then_some((candidate.unit, status))
            })
    }

    /// Neighbouring tiles the unit could stumble into
    fn wander_destinations(view: &DecisionContext<'_>, unit: &Combatant) -> Vec<IVec3> {
        let from = unit.tile();
        let mut destinations = Vec::new();
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    if x == 0 && y == 0 && z == 0 {
                        continue;
                    }
                    let to = from + IVec3::new(x, y, z);
                    if view.map.tile_is_valid(to) && view.map.can_enter_tile(unit, from, to) {
                        destinations.push(to);
                    }
                }
            }
        }
        destinations
    }
}

impl UnitAi for DefaultUnitAi {
    fn reset(&mut self, _context: &BattleContext, _unit: &Combatant) {
        self.ticks_auto_target_available = 0;
        self.ticks_auto_turn_available = 0;
        self.attacker_position = None;
    }

    fn notify_under_fire(&mut self, position: Vec3) {
        self.attacker_position = Some(position);
    }

    fn notify_hit(&mut self, position: Vec3) {
        self.attacker_position = Some(position);
    }

    fn think(
        &mut self,
        context: &mut BattleContext,
        view: &DecisionContext<'_>,
        unit: &Combatant,
        interrupt: bool,
    ) -> (AiDecision, bool) {
        let real_time = context.is_real_time();
        let now = context.tick;

        // When it's our own turn in turn based, scripted AI drives the unit.
        // Outside our turn every call is an interrupt, so the flag adds nothing.
        self.active = real_time || !context.holds_turn(unit.owner);
        if !self.active {
            return (AiDecision::default(), false);
        }

        let mut action = None;
        let mut movement = None;

        // Turn to attacker if idle
        if let Some(attacker) = self.attacker_position {
            if !unit.is_busy() && unit.is_conscious() && self.turn_available(now) {
                movement = Some(AiMovement::Turn {
                    target_location: unit.position + attacker,
                });
                self.start_turn_cooldown(now);
            }
        }

        // Attack or face enemy
        if unit.is_conscious()
            && !unit.is_attacking()
            && !view.visible_enemy_ids(unit).is_empty()
            && !unit.is_snoozing()
        {
            if !unit.may_open_fire() {
                if self.turn_available(now) && !unit.is_moving() {
                    if let Some(target) = self.pick_facing_target(real_time, view, unit) {
                        movement = Some(AiMovement::Turn {
                            target_location: target.position,
                        });
                        self.start_turn_cooldown(now);
                    }
                }
            } else if self.target_available(now) {
                match self.pick_attack_target(real_time, view, unit) {
                    Some((target, weapon_status)) => {
                        action = Some(AiAction::AttackTarget {
                            target: target.id,
                            weapon_status,
                        });
                    }
                    None => {
                        self.ticks_auto_target_available = now + self.config.auto_target_cooldown;
                    }
                }
            }
        }

        // Enzyme random running (real time only)
        if real_time && unit.enzyme_debuff_intensity > 0 && !unit.is_moving() && unit.can_move() {
            let destinations = Self::wander_destinations(view, unit);
            if let Some(to) = context.choose(&destinations) {
                movement = Some(AiMovement::Patrol {
                    target_location: *to,
                    stance: unit.stance,
                    gait: unit.fastest_gait(),
                });
            }
        }

        self.attacker_position = None;

        let decision = AiDecision::new(action, movement);
        let decided = !decision.is_empty();
        if decided {
            tracing::debug!(
                "Unit {:?} decided {:?} (interrupt: {})",
                unit.id,
                decision,
                interrupt
            );
        }
        (decision, decided)
    }
}
