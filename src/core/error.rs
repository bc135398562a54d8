use thiserror::Error;

use crate::core::types::{ItemId, ProjectionId, UnitId};

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Item not found: {0:?}")]
    ItemNotFound(ItemId),

    #[error("Projection not found: {0:?}")]
    ProjectionNotFound(ProjectionId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
