//! Battle system constants - all tunable values in one place
//!
//! These are the defaults behind `core::config::SkirmishConfig`.

use crate::core::types::Tick;

// Time
pub const TICKS_PER_SECOND: Tick = 60;
pub const TICKS_PER_TURN: Tick = TICKS_PER_SECOND * 4;

// Default AI
pub const AUTO_TURN_COOLDOWN: Tick = TICKS_PER_TURN;
pub const AUTO_TARGET_COOLDOWN: Tick = TICKS_PER_TURN / 4;

// Item physics
pub const FALLING_ACCELERATION_ITEM: f32 = 1.0 / 6.0;
pub const TICK_SCALE: f32 = 36.0;
pub const VELOCITY_SCALE_BATTLE: [f32; 3] = [24.0, 24.0, 40.0];
pub const RESTING_HEIGHT_DIVISOR: f32 = 40.0;
pub const DROP_SOUND_GAIN: f32 = 0.25;
pub const CEILING_MARGIN: f32 = 0.01;
pub const OWNER_INVULNERABLE_TICKS: i32 = 24;

// Map
/// Height units per tile for map parts
pub const PART_HEIGHT_UNITS: u32 = 40;
/// Sampling step when tracing a segment through the map (tiles)
pub const COLLISION_STEP: f32 = 0.05;
/// Eye height of a standing unit above its tile floor
pub const UNIT_EYE_HEIGHT: f32 = 0.6;

// Vision (tiles)
pub const DEFAULT_VISION_RANGE: f32 = 20.0;
