//! Spatial queries the engines need from the battle map
//!
//! The map itself is a collaborator: anything implementing [`SpatialQuery`]
//! can host units and dropped items. `battle_map::BattleMap` is the grid
//! implementation used by the orchestrator and the tests.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::battle::sound::SampleId;
use crate::battle::units::Combatant;
use crate::core::types::{ItemId, SupportId, UnitId};

/// What a traced segment ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstruction {
    Unit(UnitId),
    LeftWall,
    RightWall,
    Feature,
    Ground,
    Item(ItemId),
    Doodad,
}

/// First obstruction found along a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub position: Vec3,
    pub obstruction: Obstruction,
}

impl Collision {
    pub fn new(position: Vec3, obstruction: Obstruction) -> Self {
        Self {
            position,
            obstruction,
        }
    }
}

/// A map part an item can come to rest on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportingObject {
    pub id: SupportId,
    /// Base of the part (tile centre at floor level)
    pub position: Vec3,
    /// Height in part units (see `PART_HEIGHT_UNITS`)
    pub height: u32,
}

/// Map queries used by the AI and item physics
pub trait SpatialQuery {
    /// First obstruction on the segment `from -> to`, if any
    fn find_collision(&self, from: Vec3, to: Vec3) -> Option<Collision>;

    /// Is this tile inside the map?
    fn tile_is_valid(&self, tile: IVec3) -> bool;

    /// Can the unit step from one tile into a neighbouring one?
    fn can_enter_tile(&self, unit: &Combatant, from: IVec3, to: IVec3) -> bool;

    /// Object in (or directly under) the tile that items rest on
    fn supporting_object(&self, tile: IVec3) -> Option<SupportingObject>;

    /// Sound played when an item lands in this tile
    fn drop_sound(&self, tile: IVec3) -> Option<SampleId>;

    /// Map extent in tiles; valid positions are `0 <= p < size`
    fn size(&self) -> Vec3;

    /// Record that `item` now rests on `support`
    fn register_supported_item(&mut self, support: SupportId, item: ItemId);

    /// Forget that `item` rests on `support`
    fn release_supported_item(&mut self, support: SupportId, item: ItemId);
}
