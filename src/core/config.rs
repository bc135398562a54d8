//! Skirmish configuration with documented constants
//!
//! Every tunable used by the AI and physics engines is collected here. The
//! defaults come from `battle::constants`; a TOML file may override any
//! subset of them.

use std::path::Path;

use serde::Deserialize;

use crate::battle::constants::{
    AUTO_TARGET_COOLDOWN, AUTO_TURN_COOLDOWN, CEILING_MARGIN, DEFAULT_VISION_RANGE,
    DROP_SOUND_GAIN, FALLING_ACCELERATION_ITEM, OWNER_INVULNERABLE_TICKS,
    RESTING_HEIGHT_DIVISOR, TICK_SCALE, VELOCITY_SCALE_BATTLE,
};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::Tick;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkirmishConfig {
    pub ai: AiConfig,
    pub physics: PhysicsConfig,
    pub battle: BattleSettings,
}

/// Cooldowns of the default unit AI
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Ticks before a unit will turn automatically again after doing it once
    pub auto_turn_cooldown: Tick,

    /// Ticks before a unit will look for a target again after failing to find one
    pub auto_target_cooldown: Tick,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            auto_turn_cooldown: AUTO_TURN_COOLDOWN,
            auto_target_cooldown: AUTO_TARGET_COOLDOWN,
        }
    }
}

/// Dropped-item physics tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward velocity added every tick
    pub falling_acceleration: f32,

    /// Velocity units per tile per tick: position advances by
    /// `velocity / tick_scale / velocity_scale` each tick
    pub tick_scale: f32,
    pub velocity_scale: [f32; 3],

    /// Supporting object height units per tile
    pub resting_height_divisor: f32,

    /// Gain used for the drop sound
    pub drop_sound_gain: f32,

    /// Distance kept below the map ceiling when an item hits it
    pub ceiling_margin: f32,

    /// Ticks during which an item ignores the body of the unit that dropped it
    pub owner_invulnerable_ticks: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            falling_acceleration: FALLING_ACCELERATION_ITEM,
            tick_scale: TICK_SCALE,
            velocity_scale: VELOCITY_SCALE_BATTLE,
            resting_height_divisor: RESTING_HEIGHT_DIVISOR,
            drop_sound_gain: DROP_SOUND_GAIN,
            ceiling_margin: CEILING_MARGIN,
            owner_invulnerable_ticks: OWNER_INVULNERABLE_TICKS,
        }
    }
}

/// Battle-wide settings used by the reference orchestrator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BattleSettings {
    /// How far units see, in tiles
    pub vision_range: f32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            vision_range: DEFAULT_VISION_RANGE,
        }
    }
}

impl SkirmishConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SkirmishConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.ai.auto_turn_cooldown == 0 || self.ai.auto_target_cooldown == 0 {
            return Err(SkirmishError::InvalidConfig(
                "AI cooldowns must be at least one tick".into(),
            ));
        }

        let physics = &self.physics;
        if physics.tick_scale <= 0.0 || physics.velocity_scale.iter().any(|s| *s <= 0.0) {
            return Err(SkirmishError::InvalidConfig(format!(
                "tick_scale ({}) and velocity_scale ({:?}) must be positive",
                physics.tick_scale, physics.velocity_scale
            )));
        }

        if physics.resting_height_divisor <= 0.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "resting_height_divisor ({}) must be positive",
                physics.resting_height_divisor
            )));
        }

        if physics.falling_acceleration < 0.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "falling_acceleration ({}) must not point upward",
                physics.falling_acceleration
            )));
        }

        if self.battle.vision_range <= 0.0 {
            return Err(SkirmishError::InvalidConfig(format!(
                "vision_range ({}) must be positive",
                self.battle.vision_range
            )));
        }

        Ok(())
    }
}
