pub mod config;
pub mod error;
pub mod types;

pub use config::{AiConfig, BattleSettings, PhysicsConfig, SkirmishConfig};
pub use error::{Result, SkirmishError};
pub use types::{FactionId, ItemId, ProjectionId, SupportId, Tick, UnitId};
