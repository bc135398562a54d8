//! Visual and shadow projections of items on the tile view
//!
//! Projections never own the item they depict; they hold its id and are
//! resolved through the item registry when needed.

use ahash::AHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};
use crate::core::types::{ItemId, ProjectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionKind {
    Visual,
    Shadow,
}

/// One object placed on the tile view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub owner: ItemId,
    pub kind: ProjectionKind,
    pub position: Vec3,
}

/// All projections currently on the map
#[derive(Debug, Clone, Default)]
pub struct ProjectionRegistry {
    projections: AHashMap<ProjectionId, Projection>,
    next_id: u32,
}

impl ProjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new projection on the map
    pub fn add(&mut self, owner: ItemId, kind: ProjectionKind, position: Vec3) -> ProjectionId {
        let id = ProjectionId(self.next_id);
        self.next_id += 1;
        self.projections.insert(
            id,
            Projection {
                owner,
                kind,
                position,
            },
        );
        id
    }

    pub fn get(&self, id: ProjectionId) -> Option<&Projection> {
        self.projections.get(&id)
    }

    /// Move a projection; fails if it was already removed from the map
    pub fn set_position(&mut self, id: ProjectionId, position: Vec3) -> Result<()> {
        let projection = self
            .projections
            .get_mut(&id)
            .ok_or(SkirmishError::ProjectionNotFound(id))?;
        projection.position = position;
        Ok(())
    }

    /// Take a projection off the map
    pub fn remove(&mut self, id: ProjectionId) -> Option<Projection> {
        self.projections.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }
}
