//! Battle map: a tile grid of map parts, unit occupancy and item supports
//!
//! Each tile holds at most one part. A part fills its tile from the floor up
//! to `height / PART_HEIGHT_UNITS`. Items rest on ground and features; walls
//! only ever deflect them.

use ahash::AHashMap;
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::battle::constants::{COLLISION_STEP, PART_HEIGHT_UNITS};
use crate::battle::sound::SampleId;
use crate::battle::spatial::{Collision, Obstruction, SpatialQuery, SupportingObject};
use crate::battle::units::Combatant;
use crate::core::types::{ItemId, SupportId, UnitId};

/// Kind of map part in a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartKind {
    Ground,
    LeftWall,
    RightWall,
    Feature,
}

impl PartKind {
    pub fn obstruction(&self) -> Obstruction {
        match self {
            PartKind::Ground => Obstruction::Ground,
            PartKind::LeftWall => Obstruction::LeftWall,
            PartKind::RightWall => Obstruction::RightWall,
            PartKind::Feature => Obstruction::Feature,
        }
    }

    /// Features (crates, fences, consoles) can be seen over but not shot through
    pub fn blocks_sight(&self) -> bool {
        !matches!(self, PartKind::Feature)
    }

    pub fn supports_items(&self) -> bool {
        matches!(self, PartKind::Ground | PartKind::Feature)
    }
}

/// A single part placed in a tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapPart {
    pub id: SupportId,
    pub kind: PartKind,
    pub height: u32,
    pub drop_sound: Option<SampleId>,
}

impl MapPart {
    /// Top of the part relative to its tile floor
    pub fn top(&self) -> f32 {
        self.height as f32 / PART_HEIGHT_UNITS as f32
    }

    /// Is `point` (inside `tile`) within the solid part?
    pub fn contains(&self, tile: IVec3, point: Vec3) -> bool {
        point.z - (tile.z as f32) < self.top()
    }

    pub fn is_full_height(&self) -> bool {
        self.height >= PART_HEIGHT_UNITS
    }

    pub fn blocks_movement(&self) -> bool {
        match self.kind {
            PartKind::LeftWall | PartKind::RightWall => true,
            PartKind::Ground | PartKind::Feature => self.height > PART_HEIGHT_UNITS / 2,
        }
    }
}

/// The full battle map
#[derive(Debug, Clone)]
pub struct BattleMap {
    size: IVec3,
    parts: AHashMap<IVec3, MapPart>,
    occupants: AHashMap<IVec3, UnitId>,
    supported_items: AHashMap<SupportId, Vec<ItemId>>,
    next_part: u32,
}

impl BattleMap {
    /// Create an empty map (no floor at all)
    pub fn new(size: IVec3) -> Self {
        Self {
            size,
            parts: AHashMap::new(),
            occupants: AHashMap::new(),
            supported_items: AHashMap::new(),
            next_part: 0,
        }
    }

    /// Create a map with a full-height ground layer at `z = 0`
    pub fn flat(width: i32, length: i32, height: i32) -> Self {
        let mut map = Self::new(IVec3::new(width, length, height));
        for x in 0..width {
            for y in 0..length {
                map.add_part(IVec3::new(x, y, 0), PartKind::Ground, PART_HEIGHT_UNITS);
            }
        }
        map
    }

    pub fn dimensions(&self) -> IVec3 {
        self.size
    }

    /// Check if a tile is within map bounds
    pub fn in_bounds(&self, tile: IVec3) -> bool {
        tile.cmpge(IVec3::ZERO).all() && tile.cmplt(self.size).all()
    }

    /// Place a part, replacing whatever was in the tile
    pub fn add_part(&mut self, tile: IVec3, kind: PartKind, height: u32) -> SupportId {
        let id = SupportId(self.next_part);
        self.next_part += 1;
        self.parts.insert(
            tile,
            MapPart {
                id,
                kind,
                height,
                drop_sound: None,
            },
        );
        id
    }

    pub fn remove_part(&mut self, tile: IVec3) -> Option<MapPart> {
        self.parts.remove(&tile)
    }

    pub fn part(&self, tile: IVec3) -> Option<&MapPart> {
        self.parts.get(&tile)
    }

    /// Set the landing sound of the part in a tile
    pub fn set_drop_sound(&mut self, tile: IVec3, sample: SampleId) {
        if let Some(part) = self.parts.get_mut(&tile) {
            part.drop_sound = Some(sample);
        }
    }

    pub fn occupant(&self, tile: IVec3) -> Option<UnitId> {
        self.occupants.get(&tile).copied()
    }

    pub fn place_unit(&mut self, unit: UnitId, tile: IVec3) {
        self.occupants.insert(tile, unit);
    }

    /// Move a unit's body between tiles
    pub fn move_unit(&mut self, unit: UnitId, from: IVec3, to: IVec3) {
        if self.occupants.get(&from) == Some(&unit) {
            self.occupants.remove(&from);
        }
        self.occupants.insert(to, unit);
    }

    /// Items resting on a part, in landing order
    pub fn supported_items(&self, support: SupportId) -> &[ItemId] {
        self.supported_items
            .get(&support)
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    /// Is there nothing between two points that blocks sight (or fire)?
    ///
    /// The tiles of both endpoints are ignored, as are unit bodies.
    pub fn has_clear_line(&self, from: Vec3, to: Vec3, for_fire: bool) -> bool {
        let start = from.floor().as_ivec3();
        let end = to.floor().as_ivec3();

        sample_segment(from, to).all(|point| {
            let tile = point.floor().as_ivec3();
            if tile == start || tile == end {
                return true;
            }
            match self.parts.get(&tile) {
                Some(part) if part.contains(tile, point) => {
                    !(for_fire || part.kind.blocks_sight())
                }
                _ => true,
            }
        })
    }

    fn obstruction_at(&self, point: Vec3) -> Option<Obstruction> {
        let tile = point.floor().as_ivec3();
        if !self.in_bounds(tile) {
            return None;
        }
        if let Some(unit) = self.occupants.get(&tile) {
            return Some(Obstruction::Unit(*unit));
        }
        self.parts
            .get(&tile)
            .filter(|part| part.contains(tile, point))
            .map(|part| part.kind.obstruction())
    }

    fn supporting_part(&self, tile: IVec3) -> Option<(IVec3, &MapPart)> {
        if let Some(part) = self.parts.get(&tile) {
            if part.kind.supports_items() {
                return Some((tile, part));
            }
        }
        let below = tile - IVec3::Z;
        self.parts
            .get(&below)
            .filter(|part| part.kind.supports_items() && part.is_full_height())
            .map(|part| (below, part))
    }
}

/// Evenly spaced points along `from -> to`, excluding `from`, including `to`
fn sample_segment(from: Vec3, to: Vec3) -> impl Iterator<Item = Vec3> {
    let steps = ((from.distance(to) / COLLISION_STEP).ceil() as u32).max(1);
    (1..=steps).map(move |i| from.lerp(to, i as f32 / steps as f32))
}

impl SpatialQuery for BattleMap {
    fn find_collision(&self, from: Vec3, to: Vec3) -> Option<Collision> {
        sample_segment(from, to).find_map(|point| {
            self.obstruction_at(point)
                .map(|obstruction| Collision::new(point, obstruction))
        })
    }

    fn tile_is_valid(&self, tile: IVec3) -> bool {
        self.in_bounds(tile)
    }

    fn can_enter_tile(&self, unit: &Combatant, from: IVec3, to: IVec3) -> bool {
        if !self.in_bounds(to) || (to - from).abs().max_element() > 1 {
            return false;
        }
        if let Some(occupant) = self.occupants.get(&to) {
            if *occupant != unit.id {
                return false;
            }
        }
        if self.parts.get(&to).is_some_and(|part| part.blocks_movement()) {
            return false;
        }
        self.supporting_part(to).is_some()
    }

    fn supporting_object(&self, tile: IVec3) -> Option<SupportingObject> {
        self.supporting_part(tile).map(|(part_tile, part)| SupportingObject {
            id: part.id,
            position: Vec3::new(
                part_tile.x as f32 + 0.5,
                part_tile.y as f32 + 0.5,
                part_tile.z as f32,
            ),
            height: part.height,
        })
    }

    fn drop_sound(&self, tile: IVec3) -> Option<SampleId> {
        self.supporting_part(tile)
            .and_then(|(_, part)| part.drop_sound.clone())
    }

    fn size(&self) -> Vec3 {
        self.size.as_vec3()
    }

    fn register_supported_item(&mut self, support: SupportId, item: ItemId) {
        let items = self.supported_items.entry(support).or_default();
        if !items.contains(&item) {
            items.push(item);
        }
    }

    fn release_supported_item(&mut self, support: SupportId, item: ItemId) {
        if let Some(items) = self.supported_items.get_mut(&support) {
            items.retain(|existing| *existing != item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FactionId;

    fn unit_at(tile: IVec3) -> Combatant {
        Combatant::new(
            UnitId::new(),
            FactionId(0),
            tile.as_vec3() + Vec3::new(0.5, 0.5, 0.0),
        )
    }

    #[test]
    fn test_flat_map_bounds() {
        let map = BattleMap::flat(10, 8, 4);
        assert!(map.in_bounds(IVec3::new(9, 7, 3)));
        assert!(!map.in_bounds(IVec3::new(10, 0, 0)));
        assert!(!map.in_bounds(IVec3::new(0, -1, 0)));
        assert_eq!(map.size(), Vec3::new(10.0, 8.0, 4.0));
        assert_eq!(map.dimensions(), IVec3::new(10, 8, 4));
    }

    #[test]
    fn test_falling_segment_hits_ground() {
        let map = BattleMap::flat(4, 4, 4);
        let collision = map
            .find_collision(Vec3::new(1.5, 1.5, 3.0), Vec3::new(1.5, 1.5, 0.5))
            .expect("ground below");

        assert_eq!(collision.obstruction, Obstruction::Ground);
        assert!(collision.position.z < 1.0 && collision.position.z > 0.9);
    }

    #[test]
    fn test_segment_through_open_air_is_clear() {
        let map = BattleMap::flat(4, 4, 4);
        let collision = map.find_collision(Vec3::new(0.5, 0.5, 2.0), Vec3::new(3.5, 3.5, 2.5));
        assert!(collision.is_none());
    }

    #[test]
    fn test_segment_hits_unit_body() {
        let mut map = BattleMap::flat(4, 4, 4);
        let unit = UnitId::new();
        map.place_unit(unit, IVec3::new(2, 1, 1));

        let collision = map
            .find_collision(Vec3::new(0.5, 1.5, 1.5), Vec3::new(3.5, 1.5, 1.5))
            .expect("unit in the way");
        assert_eq!(collision.obstruction, Obstruction::Unit(unit));
    }

    #[test]
    fn test_low_part_only_blocks_below_its_top() {
        let mut map = BattleMap::new(IVec3::new(4, 4, 4));
        map.add_part(IVec3::new(1, 1, 1), PartKind::Feature, 10);

        // Passes above the quarter-height crate
        assert!(map
            .find_collision(Vec3::new(0.5, 1.5, 1.5), Vec3::new(2.5, 1.5, 1.5))
            .is_none());
        // Runs into it
        let collision = map
            .find_collision(Vec3::new(0.5, 1.5, 1.1), Vec3::new(2.5, 1.5, 1.1))
            .expect("crate in the way");
        assert_eq!(collision.obstruction, Obstruction::Feature);
    }

    #[test]
    fn test_supporting_object_in_tile_and_below() {
        let mut map = BattleMap::flat(4, 4, 4);
        let table = map.add_part(IVec3::new(2, 2, 1), PartKind::Feature, 16);

        let on_table = map.supporting_object(IVec3::new(2, 2, 1)).expect("table");
        assert_eq!(on_table.id, table);
        assert_eq!(on_table.height, 16);

        let on_floor = map.supporting_object(IVec3::new(1, 1, 1)).expect("floor below");
        assert_eq!(on_floor.position, Vec3::new(1.5, 1.5, 0.0));
        assert_eq!(on_floor.height, PART_HEIGHT_UNITS);

        assert!(map.supporting_object(IVec3::new(1, 1, 3)).is_none());
    }

    #[test]
    fn test_walls_never_support_items() {
        let mut map = BattleMap::new(IVec3::new(4, 4, 4));
        map.add_part(IVec3::new(1, 1, 0), PartKind::LeftWall, PART_HEIGHT_UNITS);
        assert!(map.supporting_object(IVec3::new(1, 1, 1)).is_none());
        assert!(map.supporting_object(IVec3::new(1, 1, 0)).is_none());
    }

    #[test]
    fn test_drop_sound_follows_support() {
        let mut map = BattleMap::flat(4, 4, 4);
        map.set_drop_sound(IVec3::new(1, 1, 0), SampleId::new("metal"));

        assert_eq!(map.drop_sound(IVec3::new(1, 1, 1)), Some(SampleId::new("metal")));
        assert_eq!(map.drop_sound(IVec3::new(2, 1, 1)), None);
    }

    #[test]
    fn test_can_enter_tile() {
        let mut map = BattleMap::flat(5, 5, 3);
        let unit = unit_at(IVec3::new(2, 2, 1));
        map.place_unit(unit.id, unit.tile());
        map.add_part(IVec3::new(3, 2, 1), PartKind::RightWall, PART_HEIGHT_UNITS);
        map.place_unit(UnitId::new(), IVec3::new(1, 2, 1));

        let from = unit.tile();
        assert!(map.can_enter_tile(&unit, from, IVec3::new(2, 3, 1)));
        assert!(!map.can_enter_tile(&unit, from, IVec3::new(3, 2, 1)), "wall");
        assert!(!map.can_enter_tile(&unit, from, IVec3::new(1, 2, 1)), "occupied");
        assert!(!map.can_enter_tile(&unit, from, IVec3::new(2, 2, 2)), "nothing to stand on");
        assert!(!map.can_enter_tile(&unit, from, IVec3::new(4, 2, 1)), "not adjacent");
        assert!(!map.can_enter_tile(&unit, from, IVec3::new(2, 2, 0)), "inside the ground");
    }

    #[test]
    fn test_clear_line_sight_versus_fire() {
        let mut map = BattleMap::flat(8, 3, 3);
        map.add_part(IVec3::new(3, 1, 1), PartKind::Feature, PART_HEIGHT_UNITS);

        let from = Vec3::new(0.5, 1.5, 1.6);
        let to = Vec3::new(6.5, 1.5, 1.6);
        assert!(map.has_clear_line(from, to, false));
        assert!(!map.has_clear_line(from, to, true));

        map.add_part(IVec3::new(4, 1, 1), PartKind::LeftWall, PART_HEIGHT_UNITS);
        assert!(!map.has_clear_line(from, to, false));
    }

    #[test]
    fn test_supported_item_registry() {
        let mut map = BattleMap::flat(2, 2, 2);
        let support = map.supporting_object(IVec3::new(0, 0, 1)).unwrap().id;

        map.register_supported_item(support, ItemId(3));
        map.register_supported_item(support, ItemId(3));
        map.register_supported_item(support, ItemId(4));
        assert_eq!(map.supported_items(support), &[ItemId(3), ItemId(4)]);

        map.release_supported_item(support, ItemId(3));
        assert_eq!(map.supported_items(support), &[ItemId(4)]);
    }

    #[test]
    fn test_move_unit_updates_occupancy() {
        let mut map = BattleMap::flat(3, 3, 2);
        let unit = UnitId::new();
        map.place_unit(unit, IVec3::new(0, 0, 1));
        map.move_unit(unit, IVec3::new(0, 0, 1), IVec3::new(1, 0, 1));

        assert_eq!(map.occupant(IVec3::new(0, 0, 1)), None);
        assert_eq!(map.occupant(IVec3::new(1, 0, 1)), Some(unit));
    }
}
