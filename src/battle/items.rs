//! Dropped items and the battle's item registry
//!
//! The registry exclusively owns every item on the ground or in flight.
//! Iteration order is by id so replays stay deterministic.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};
use crate::core::types::{ItemId, ProjectionId, SupportId, UnitId};

/// Static description of an item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub name: String,
}

impl ItemDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// An item lying on the battlefield or falling through it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleItem {
    pub id: ItemId,
    pub definition: ItemDefinition,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Resting on a supporting object; physics no longer applies
    pub supported: bool,
    /// Already bounced once during the current flight
    pub bounced: bool,
    /// Unit that dropped or threw the item
    pub owner: Option<UnitId>,
    /// While positive, the owner's body does not block the item
    pub owner_invulnerable_ticks: i32,
    pub visual: Option<ProjectionId>,
    pub shadow: Option<ProjectionId>,
    /// Part the item rests on, set together with `supported`
    pub supported_by: Option<SupportId>,
}

impl BattleItem {
    pub fn is_airborne(&self) -> bool {
        !self.supported
    }
}

/// Registry of all items in the battle
#[derive(Debug, Clone, Default)]
pub struct BattleItems {
    items: BTreeMap<ItemId, BattleItem>,
    next_id: u32,
}

impl BattleItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly dropped, unsupported item
    pub fn spawn(
        &mut self,
        definition: ItemDefinition,
        position: Vec3,
        velocity: Vec3,
        owner: Option<UnitId>,
        owner_invulnerable_ticks: i32,
    ) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(
            id,
            BattleItem {
                id,
                definition,
                position,
                velocity,
                supported: false,
                bounced: false,
                owner,
                owner_invulnerable_ticks,
                visual: None,
                shadow: None,
                supported_by: None,
            },
        );
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&BattleItem> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut BattleItem> {
        self.items.get_mut(&id)
    }

    /// Like [`get`](Self::get) but reports unknown ids as errors
    pub fn require(&self, id: ItemId) -> Result<&BattleItem> {
        self.items.get(&id).ok_or(SkirmishError::ItemNotFound(id))
    }

    pub fn remove(&mut self, id: ItemId) -> Option<BattleItem> {
        self.items.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Snapshot of all ids; safe to iterate while removing items
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.keys().copied().collect()
    }

    /// Snapshot of the ids still under physics
    pub fn airborne_ids(&self) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|item| item.is_airborne())
            .map(|item| item.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
