//! Dropped-item physics
//!
//! Items fall under constant acceleration, bounce once off walls, units and
//! features, and come to rest on the first supporting object they reach.
//! Resting items are left alone until something external disturbs them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::battle::items::{BattleItem, BattleItems};
use crate::battle::projection::ProjectionRegistry;
use crate::battle::sound::SoundSink;
use crate::battle::spatial::{Collision, Obstruction, SpatialQuery};
use crate::core::config::PhysicsConfig;
use crate::core::types::ItemId;

/// Collaborators an item update touches
pub struct ItemEnvironment<'a> {
    pub map: &'a mut dyn SpatialQuery,
    pub projections: &'a mut ProjectionRegistry,
    pub sound: &'a mut dyn SoundSink,
}

impl<'a> ItemEnvironment<'a> {
    pub fn new(
        map: &'a mut dyn SpatialQuery,
        projections: &'a mut ProjectionRegistry,
        sound: &'a mut dyn SoundSink,
    ) -> Self {
        Self {
            map,
            projections,
            sound,
        }
    }
}

/// Where an item stands after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    Airborne,
    Supported,
    Destroyed,
}

/// Integrates gravity and resolves collisions for unsupported items
#[derive(Debug, Clone, Default)]
pub struct ItemPhysicsEngine {
    config: PhysicsConfig,
}

impl ItemPhysicsEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Move the item and both of its projections
    pub fn set_position(
        &self,
        item: &mut BattleItem,
        position: Vec3,
        projections: &mut ProjectionRegistry,
    ) {
        item.position = position;
        for (projection, label) in [(item.visual, "visual"), (item.shadow, "shadow")] {
            let Some(projection) = projection else {
                tracing::error!(
                    "set_position called on item {:?} with no {} projection",
                    item.id,
                    label
                );
                continue;
            };
            if let Err(e) = projections.set_position(projection, position) {
                tracing::error!("Item {:?} lost its {} projection: {}", item.id, label, e);
            }
        }
    }

    /// First obstruction between two positions, ignoring the owner's body
    /// while the item is still invulnerable to it
    pub fn check_collision(
        &self,
        item: &BattleItem,
        previous: Vec3,
        next: Vec3,
        map: &dyn SpatialQuery,
    ) -> Option<Collision> {
        let collision = map.find_collision(previous, next)?;
        match collision.obstruction {
            Obstruction::Unit(unit)
                if item.owner_invulnerable_ticks > 0 && item.owner == Some(unit) =>
            {
                None
            }
            _ => Some(collision),
        }
    }

    /// Advance an unsupported item by `ticks`
    pub fn update(
        &self,
        items: &mut BattleItems,
        id: ItemId,
        ticks: u32,
        env: &mut ItemEnvironment<'_>,
    ) -> ItemState {
        let Some(item) = items.get_mut(id) else {
            tracing::error!("update called on item {:?} that is no longer in the battle", id);
            return ItemState::Destroyed;
        };

        match self.step(item, ticks, env) {
            ItemState::Destroyed => {
                self.die(items, id, false, env);
                ItemState::Destroyed
            }
            state => state,
        }
    }

    fn step(&self, item: &mut BattleItem, ticks: u32, env: &mut ItemEnvironment<'_>) -> ItemState {
        if item.supported {
            return ItemState::Supported;
        }

        if item.owner_invulnerable_ticks > 0 {
            item.owner_invulnerable_ticks -= ticks as i32;
        }

        let previous = item.position;
        let mut next = item.position;
        let scale = self.config.tick_scale * Vec3::from_array(self.config.velocity_scale);
        for _ in 0..ticks {
            item.velocity.z -= self.config.falling_acceleration;
            next += item.velocity / scale;
        }

        let mut collision = false;
        if let Some(hit) = self.check_collision(item, previous, next, &*env.map) {
            collision = true;
            match hit.obstruction {
                Obstruction::Unit(_)
                | Obstruction::LeftWall
                | Obstruction::RightWall
                | Obstruction::Feature => {
                    if !item.bounced {
                        // A bounce never looks for support straight away
                        collision = false;
                        item.bounced = true;
                        next = previous;
                        item.velocity = Vec3::new(
                            -item.velocity.x / 4.0,
                            -item.velocity.y / 4.0,
                            (item.velocity.z / 4.0).abs(),
                        );
                    } else {
                        // Drop straight down so it can land on whatever it hit
                        next = Vec3::new(previous.x, previous.y, next.z.min(previous.z));
                    }
                }
                Obstruction::Ground => {
                    self.set_position(item, hit.position, env.projections);
                    if self.find_support(item, true, true, env) {
                        return ItemState::Supported;
                    }
                    // Ground that gives no support is fallen through
                }
                other => {
                    tracing::error!("Item {:?} collided with unexpected {:?}", item.id, other);
                    collision = false;
                }
            }
        }

        if next != previous {
            let size = env.map.size();

            if next.z >= size.z {
                collision = true;
                next.z = size.z - self.config.ceiling_margin;
                item.velocity = Vec3::ZERO;
            }
            if next.x < 0.0 || next.y < 0.0 || next.x >= size.x || next.y >= size.y {
                collision = true;
                item.velocity = Vec3::new(-item.velocity.x / 4.0, -item.velocity.y / 4.0, 0.0);
                next = previous;
            }
            if next.z < 0.0 {
                tracing::error!("Item {:?} fell off the end of the world at {:?}", item.id, next);
                return ItemState::Destroyed;
            }
            self.set_position(item, next, env.projections);
        }

        if collision && self.find_support(item, false, false, env) {
            return ItemState::Supported;
        }
        ItemState::Airborne
    }

    /// Try to bring the item to rest on the object in its tile
    ///
    /// Unless `forced`, the item has to be at or below the resting height.
    pub fn find_support(
        &self,
        item: &mut BattleItem,
        emit_sound: bool,
        forced: bool,
        env: &mut ItemEnvironment<'_>,
    ) -> bool {
        if item.supported {
            return true;
        }

        let tile = item.position.floor().as_ivec3();
        let Some(support) = env.map.supporting_object(tile) else {
            return false;
        };
        let resting = support.position
            + Vec3::Z * (support.height as f32 / self.config.resting_height_divisor);
        if !forced && item.position.z > resting.z {
            return false;
        }

        item.supported = true;
        item.bounced = false;
        item.velocity = Vec3::ZERO;
        item.supported_by = Some(support.id);
        env.map.register_supported_item(support.id, item.id);
        if item.position != resting {
            self.set_position(item, resting, env.projections);
        }
        tracing::debug!("Item {:?} came to rest at {:?}", item.id, item.position);

        if emit_sound {
            if let Some(sample) = env.map.drop_sound(tile) {
                env.sound
                    .play_sample(&sample, item.position, self.config.drop_sound_gain);
            }
        }
        true
    }

    /// Remove the item from the battle together with everything tied to it
    pub fn die(
        &self,
        items: &mut BattleItems,
        id: ItemId,
        violently: bool,
        env: &mut ItemEnvironment<'_>,
    ) -> Option<BattleItem> {
        let item = items.remove(id)?;
        if violently {
            tracing::warn!("Item {:?} ({}) destroyed", id, item.definition.name);
        }

        for projection in [item.visual, item.shadow].into_iter().flatten() {
            env.projections.remove(projection);
        }
        if let Some(support) = item.supported_by {
            env.map.release_supported_item(support, id);
        }
        Some(item)
    }

    /// Something hit the item; any hit destroys it
    pub fn handle_collision(
        &self,
        items: &mut BattleItems,
        id: ItemId,
        _collision: &Collision,
        env: &mut ItemEnvironment<'_>,
    ) -> Option<BattleItem> {
        self.die(items, id, true, env)
    }
}
