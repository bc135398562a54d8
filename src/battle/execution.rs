//! Skirmish execution loop
//!
//! Each tick: visibility -> decisions -> apply decisions -> items -> advance

use ahash::AHashMap;
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::battle::ai::{AiAction, AiDecision, AiMovement, DecisionContext, DefaultUnitAi, UnitAi};
use crate::battle::battle_map::BattleMap;
use crate::battle::context::BattleContext;
use crate::battle::items::{BattleItems, ItemDefinition};
use crate::battle::physics::{ItemEnvironment, ItemPhysicsEngine, ItemState};
use crate::battle::projection::{ProjectionKind, ProjectionRegistry};
use crate::battle::roster::BattleRoster;
use crate::battle::sound::SoundSink;
use crate::battle::spatial::{Collision, SpatialQuery};
use crate::battle::units::{Combatant, WeaponStatus};
use crate::core::config::SkirmishConfig;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{FactionId, ItemId, Tick, UnitId};

/// Log entry for skirmish events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkirmishEvent {
    pub tick: Tick,
    pub event_type: SkirmishEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkirmishEventType {
    UnitTurned { unit_id: UnitId, target: Vec3 },
    UnitAttacked {
        unit_id: UnitId,
        target: UnitId,
        weapon_status: WeaponStatus,
    },
    UnitMoved { unit_id: UnitId, tile: IVec3 },
    UnitKnockedOut { unit_id: UnitId },
    UnitRevived { unit_id: UnitId },
    ItemDropped { item_id: ItemId },
    ItemLanded { item_id: ItemId },
    ItemDestroyed { item_id: ItemId },
}

/// Log of events from a single tick
#[derive(Debug, Clone, Default)]
pub struct SkirmishEventLog {
    pub events: Vec<SkirmishEvent>,
}

impl SkirmishEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: SkirmishEventType, description: String, tick: Tick) {
        self.events.push(SkirmishEvent {
            tick,
            event_type,
            description,
        });
    }
}

/// A running skirmish: map, combatants, loose items and their AIs
pub struct Skirmish<S: SoundSink> {
    pub context: BattleContext,
    pub map: BattleMap,
    pub roster: BattleRoster,
    pub items: BattleItems,
    pub projections: ProjectionRegistry,
    pub sound: S,
    pub battle_log: Vec<SkirmishEvent>,
    ais: AHashMap<UnitId, DefaultUnitAi>,
    physics: ItemPhysicsEngine,
    config: SkirmishConfig,
}

impl<S: SoundSink> Skirmish<S> {
    pub fn new(map: BattleMap, context: BattleContext, config: SkirmishConfig, sound: S) -> Self {
        Self {
            context,
            map,
            roster: BattleRoster::new(),
            items: BattleItems::new(),
            projections: ProjectionRegistry::new(),
            sound,
            battle_log: Vec::new(),
            ais: AHashMap::new(),
            physics: ItemPhysicsEngine::new(config.physics.clone()),
            config,
        }
    }

    pub fn config(&self) -> &SkirmishConfig {
        &self.config
    }

    /// Put a unit on the map under default AI control
    pub fn add_unit(&mut self, unit: Combatant) -> UnitId {
        self.map.place_unit(unit.id, unit.tile());
        self.ais
            .insert(unit.id, DefaultUnitAi::new(self.config.ai.clone()));
        self.roster.add(unit)
    }

    pub fn ai(&self, unit: UnitId) -> Option<&DefaultUnitAi> {
        self.ais.get(&unit)
    }

    /// Hand the turn to another faction (turn-based mode)
    pub fn set_active_faction(&mut self, faction: FactionId) {
        self.context.active_faction = faction;
    }

    /// Run a complete skirmish tick
    pub fn run_tick(&mut self) -> SkirmishEventLog {
        let mut events = SkirmishEventLog::new();

        // ===== PHASE 1: VISIBILITY =====
        self.roster
            .refresh_visibility(&self.map, self.config.battle.vision_range);

        // ===== PHASE 2: DECISIONS =====
        let decisions = self.phase_decisions();

        // ===== PHASE 3: APPLY =====
        for (unit_id, decision) in decisions {
            self.apply_decision(unit_id, decision, &mut events);
        }

        // ===== PHASE 4: ITEMS =====
        self.phase_items(&mut events);

        self.context.advance(1);
        self.battle_log.extend(events.events.iter().cloned());
        events
    }

    /// Every unit decides from the same snapshot
    fn phase_decisions(&mut self) -> Vec<(UnitId, AiDecision)> {
        let view = DecisionContext::new(&self.roster, &self.map);
        let mut decisions = Vec::new();
        for unit in self.roster.iter() {
            let Some(ai) = self.ais.get_mut(&unit.id) else {
                continue;
            };
            let (decision, decided) = ai.think(&mut self.context, &view, unit, false);
            if decided {
                decisions.push((unit.id, decision));
            }
        }
        decisions
    }

    fn apply_decision(
        &mut self,
        unit_id: UnitId,
        decision: AiDecision,
        events: &mut SkirmishEventLog,
    ) {
        let tick = self.context.tick;

        if let Some(AiAction::AttackTarget {
            target,
            weapon_status,
        }) = decision.action
        {
            let attacker = self.roster.get(unit_id).map(|u| u.position);
            let defender = self.roster.get(target).map(|u| u.position);
            if let (Some(from), Some(at)) = (attacker, defender) {
                if let Some(ai) = self.ais.get_mut(&target) {
                    ai.notify_under_fire(from - at);
                }
                events.push(
                    SkirmishEventType::UnitAttacked {
                        unit_id,
                        target,
                        weapon_status,
                    },
                    format!("{:?} opens fire on {:?} ({:?})", unit_id, target, weapon_status),
                    tick,
                );
            }
        }

        match decision.movement {
            Some(AiMovement::Turn { target_location }) => {
                let Some(unit) = self.roster.get_mut(unit_id) else {
                    return;
                };
                let facing = (target_location - unit.position).normalize_or_zero();
                if facing != Vec3::ZERO {
                    unit.facing = facing;
                }
                events.push(
                    SkirmishEventType::UnitTurned {
                        unit_id,
                        target: target_location,
                    },
                    format!("{:?} turns towards {:?}", unit_id, target_location),
                    tick,
                );
            }
            Some(AiMovement::Patrol {
                target_location,
                stance,
                ..
            }) => {
                let Some(unit) = self.roster.get(unit_id) else {
                    return;
                };
                let from = unit.tile();
                // Someone may have taken the tile earlier this tick
                if !self.map.can_enter_tile(unit, from, target_location) {
                    tracing::debug!("{:?} cannot enter {:?} any more", unit_id, target_location);
                    return;
                }
                self.map.move_unit(unit_id, from, target_location);
                if let Some(unit) = self.roster.get_mut(unit_id) {
                    unit.position = target_location.as_vec3() + Vec3::new(0.5, 0.5, 0.0);
                    unit.stance = stance;
                }
                events.push(
                    SkirmishEventType::UnitMoved {
                        unit_id,
                        tile: target_location,
                    },
                    format!("{:?} stumbles to {:?}", unit_id, target_location),
                    tick,
                );
            }
            None => {}
        }
    }

    fn phase_items(&mut self, events: &mut SkirmishEventLog) {
        let tick = self.context.tick;
        let mut env = ItemEnvironment::new(&mut self.map, &mut self.projections, &mut self.sound);

        for item_id in self.items.airborne_ids() {
            match self.physics.update(&mut self.items, item_id, 1, &mut env) {
                ItemState::Supported => events.push(
                    SkirmishEventType::ItemLanded { item_id },
                    format!("Item {:?} landed", item_id),
                    tick,
                ),
                ItemState::Destroyed => events.push(
                    SkirmishEventType::ItemDestroyed { item_id },
                    format!("Item {:?} left the battlefield", item_id),
                    tick,
                ),
                ItemState::Airborne => {}
            }
        }
    }

    /// Drop or throw an item into the battle
    ///
    /// An owned item ignores its owner's body for a short while.
    pub fn drop_item(
        &mut self,
        definition: ItemDefinition,
        position: Vec3,
        velocity: Vec3,
        owner: Option<UnitId>,
    ) -> Result<ItemId> {
        if let Some(owner) = owner {
            if self.roster.get(owner).is_none() {
                return Err(SkirmishError::UnitNotFound(owner));
            }
        }
        let invulnerable = if owner.is_some() {
            self.config.physics.owner_invulnerable_ticks
        } else {
            0
        };

        let name = definition.name.clone();
        let id = self
            .items
            .spawn(definition, position, velocity, owner, invulnerable);
        let visual = self.projections.add(id, ProjectionKind::Visual, position);
        let shadow = self.projections.add(id, ProjectionKind::Shadow, position);
        if let Some(item) = self.items.get_mut(id) {
            item.visual = Some(visual);
            item.shadow = Some(shadow);
        }

        let tick = self.context.tick;
        self.battle_log.push(SkirmishEvent {
            tick,
            event_type: SkirmishEventType::ItemDropped { item_id: id },
            description: format!("{} dropped at {:?}", name, position),
        });
        Ok(id)
    }

    /// Something struck an item; it is destroyed
    pub fn strike_item(&mut self, item_id: ItemId, collision: &Collision) -> Result<()> {
        self.items.require(item_id)?;
        let mut env = ItemEnvironment::new(&mut self.map, &mut self.projections, &mut self.sound);
        self.physics
            .handle_collision(&mut self.items, item_id, collision, &mut env);

        self.battle_log.push(SkirmishEvent {
            tick: self.context.tick,
            event_type: SkirmishEventType::ItemDestroyed { item_id },
            description: format!("Item {:?} destroyed by {:?}", item_id, collision.obstruction),
        });
        Ok(())
    }

    /// A shot from `source` hit the unit
    pub fn report_hit(&mut self, unit_id: UnitId, source: Vec3) -> Result<()> {
        let position = self
            .roster
            .get(unit_id)
            .map(|u| u.position)
            .ok_or(SkirmishError::UnitNotFound(unit_id))?;
        if let Some(ai) = self.ais.get_mut(&unit_id) {
            ai.notify_hit(source - position);
        }
        Ok(())
    }

    /// Knock a unit out or bring it round; waking up resets its AI
    pub fn set_conscious(&mut self, unit_id: UnitId, conscious: bool) -> Result<()> {
        let unit = self.roster.require_mut(unit_id)?;
        if unit.conscious == conscious {
            return Ok(());
        }
        unit.conscious = conscious;

        let tick = self.context.tick;
        let (event_type, description) = if conscious {
            let unit = &*unit;
            if let Some(ai) = self.ais.get_mut(&unit_id) {
                ai.reset(&self.context, unit);
            }
            (
                SkirmishEventType::UnitRevived { unit_id },
                format!("{:?} regains consciousness", unit_id),
            )
        } else {
            (
                SkirmishEventType::UnitKnockedOut { unit_id },
                format!("{:?} is knocked out", unit_id),
            )
        };
        self.battle_log.push(SkirmishEvent {
            tick,
            event_type,
            description,
        });
        Ok(())
    }
}
