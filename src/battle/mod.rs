//! Battle system - default unit behaviour and loose items on a tactical map
//!
//! Two engines run every tick and never call each other:
//! - the default unit AI decides turns, attacks and stumbling for units
//!   nobody else is controlling
//! - item physics drops, bounces and lands everything that is not at rest
//!
//! They meet only through shared state (the roster, the map and its
//! supported-item registry), and the orchestrator in `execution` applies
//! every decision after all units have made theirs.

pub mod ai;
pub mod battle_map;
pub mod constants;
pub mod context;
pub mod execution;
pub mod items;
pub mod physics;
pub mod projection;
pub mod roster;
pub mod sound;
pub mod spatial;
pub mod units;

// Re-exports for convenient access
pub use ai::{
    AiAction, AiDecision, AiMovement, CombatantFacts, DecisionContext, DefaultUnitAi, UnitAi,
};
pub use battle_map::{BattleMap, MapPart, PartKind};
pub use constants::*;
pub use context::{BattleContext, BattleMode};
pub use execution::{Skirmish, SkirmishEvent, SkirmishEventLog, SkirmishEventType};
pub use items::{BattleItem, BattleItems, ItemDefinition};
pub use physics::{ItemEnvironment, ItemPhysicsEngine, ItemState};
pub use projection::{Projection, ProjectionKind, ProjectionRegistry};
pub use roster::BattleRoster;
pub use sound::{PlayedSample, RecordingSound, SampleId, SoundSink, TracingSound};
pub use spatial::{Collision, Obstruction, SpatialQuery, SupportingObject};
pub use units::{
    AiType, Combatant, EquipmentSlot, EquippedItem, FirePermission, Gait, Mission, Stance,
    WeaponStatus,
};
