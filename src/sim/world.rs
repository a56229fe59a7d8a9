//! Procedural world population
//!
//! One countdown timer per spawn channel. Collidable entities (traffic,
//! cones, potholes, collectibles) live in removable lists that are culled
//! once they fall behind the vehicle. High-volume scenery (trees, buildings,
//! lamps) goes into fixed-capacity slot arrays with a wrapping write cursor:
//! always occupied, content replaced, never destroyed.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::SimEvent;
use crate::consts::*;

/// Collidable entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    TrafficCar,
    Truck,
    Lorry,
    Obstacle,
    Pothole,
    Collectible,
}

impl EntityKind {
    /// Axis-aligned half extents (lateral, longitudinal).
    pub fn half_extents(self) -> (f32, f32) {
        match self {
            EntityKind::TrafficCar => (0.9, 2.0),
            EntityKind::Truck => (1.05, 2.5),
            EntityKind::Lorry => (1.15, 4.0),
            EntityKind::Obstacle => (0.8, 0.8),
            EntityKind::Pothole => (0.6, 0.6),
            EntityKind::Collectible => (0.8, 0.8),
        }
    }

    /// Traffic kinds move along +z on their own.
    pub fn is_traffic(self) -> bool {
        matches!(
            self,
            EntityKind::TrafficCar | EntityKind::Truck | EntityKind::Lorry
        )
    }
}

/// One active traffic/hazard/collectible instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub x: f32,
    pub z: f32,
    /// Longitudinal speed; zero for everything but traffic
    pub speed: f32,
    /// False once removed; removal is idempotent
    pub alive: bool,
    /// Cosmetic: set after the vehicle crashes into this entity
    pub struck: bool,
}

impl Entity {
    pub fn half_extents(&self) -> (f32, f32) {
        self.kind.half_extents()
    }
}

/// Mark an entity removed and emit the despawn event exactly once.
/// Calling this on an already-removed entity is a no-op.
pub fn mark_removed(entity: &mut Entity, events: &mut Vec<SimEvent>) {
    if entity.alive {
        entity.alive = false;
        events.push(SimEvent::EntityDespawned(entity.id));
    }
}

/// Cosmetic scenery categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneryKind {
    Tree,
    Building,
    Lamp,
}

/// One scenery instance. No collision geometry, no lifecycle beyond being
/// overwritten in its slot.
#[derive(Debug, Clone)]
pub struct Scenery {
    pub kind: SceneryKind,
    pub x: f32,
    pub z: f32,
    pub rotation: f32,
    pub size: Vec3,
}

/// Fixed-capacity slot array with a wrapping write cursor.
#[derive(Debug)]
pub struct SceneryPool {
    slots: Vec<Option<Scenery>>,
    cursor: usize,
}

impl SceneryPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Write into the next slot, overwriting whatever was there. Returns the
    /// slot index used.
    pub fn push(&mut self, scenery: Scenery) -> usize {
        let index = self.cursor;
        self.slots[index] = Some(scenery);
        self.cursor = (self.cursor + 1) % self.slots.len();
        index
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding an instance.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Scenery> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenery> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }
}

/// Per-channel spawn countdowns. Zero-initialized so every channel fires on
/// the first tick.
#[derive(Debug, Default)]
struct SpawnTimers {
    traffic: f32,
    obstacle: f32,
    pothole: f32,
    collectible: f32,
    tree: f32,
    building: f32,
    lamp: f32,
}

/// Owns every spawned entity and the spawn/cull machinery.
#[derive(Debug)]
pub struct World {
    pub traffic: Vec<Entity>,
    pub obstacles: Vec<Entity>,
    pub potholes: Vec<Entity>,
    pub collectibles: Vec<Entity>,
    pub trees: SceneryPool,
    pub buildings: SceneryPool,
    pub lamps: SceneryPool,
    timers: SpawnTimers,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            traffic: Vec::new(),
            obstacles: Vec::new(),
            potholes: Vec::new(),
            collectibles: Vec::new(),
            trees: SceneryPool::new(MAX_TREES),
            buildings: SceneryPool::new(MAX_BUILDINGS),
            lamps: SceneryPool::new(MAX_LAMPS),
            timers: SpawnTimers::default(),
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Advance traffic, cull what fell behind, then run the spawn timers.
    /// Spawn bands keep every new collidable at least ~95 units ahead of the
    /// vehicle, so nothing can spawn into the vehicle's AABB this tick.
    pub fn update(&mut self, dt: f32, vehicle_z: f32, rng: &mut Pcg32, events: &mut Vec<SimEvent>) {
        // Traffic closes the gap on its own; everything else just sits there
        for car in &mut self.traffic {
            car.z += car.speed * dt;
        }

        cull(&mut self.traffic, vehicle_z + 60.0, events);
        cull(&mut self.obstacles, vehicle_z + 50.0, events);
        cull(&mut self.potholes, vehicle_z + 50.0, events);
        cull(&mut self.collectibles, vehicle_z + 50.0, events);

        self.timers.traffic -= dt;
        self.timers.obstacle -= dt;
        self.timers.pothole -= dt;
        self.timers.collectible -= dt;
        self.timers.tree -= dt;
        self.timers.building -= dt;
        self.timers.lamp -= dt;

        if self.timers.traffic <= 0.0 {
            self.spawn_traffic(vehicle_z, rng, events);
            self.timers.traffic = 1.2 + rng.random_range(0.0..1.0);
        }
        if self.timers.obstacle <= 0.0 {
            self.spawn_hazard(EntityKind::Obstacle, vehicle_z, rng, events);
            self.timers.obstacle = 2.8 + rng.random_range(0.0..1.5);
        }
        if self.timers.pothole <= 0.0 {
            self.spawn_hazard(EntityKind::Pothole, vehicle_z, rng, events);
            self.timers.pothole = 2.0 + rng.random_range(0.0..2.0);
        }
        if self.timers.collectible <= 0.0 {
            self.spawn_hazard(EntityKind::Collectible, vehicle_z, rng, events);
            self.timers.collectible = 5.0 + rng.random_range(0.0..5.0);
        }
        if self.timers.tree <= 0.0 {
            // Two at a time, one roll per side
            self.spawn_tree(vehicle_z, rng);
            self.spawn_tree(vehicle_z, rng);
            self.timers.tree = 0.8 + rng.random_range(0.0..0.7);
        }
        if self.timers.building <= 0.0 {
            self.spawn_building(vehicle_z, rng);
            self.timers.building = 3.5 + rng.random_range(0.0..3.0);
        }
        if self.timers.lamp <= 0.0 {
            self.spawn_lamp(vehicle_z, rng);
            self.timers.lamp = 1.8 + rng.random_range(0.0..0.6);
        }
    }

    fn push_entity(
        &mut self,
        kind: EntityKind,
        x: f32,
        z: f32,
        speed: f32,
        events: &mut Vec<SimEvent>,
    ) {
        let id = self.next_entity_id();
        let entity = Entity {
            id,
            kind,
            x,
            z,
            speed,
            alive: true,
            struck: false,
        };
        events.push(SimEvent::EntitySpawned { id, kind, x, z });
        let list = match kind {
            EntityKind::TrafficCar | EntityKind::Truck | EntityKind::Lorry => &mut self.traffic,
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Pothole => &mut self.potholes,
            EntityKind::Collectible => &mut self.collectibles,
        };
        list.push(entity);
    }

    fn random_lane(rng: &mut Pcg32) -> f32 {
        LANES[rng.random_range(0..LANES.len())]
    }

    fn spawn_traffic(&mut self, vehicle_z: f32, rng: &mut Pcg32, events: &mut Vec<SimEvent>) {
        let roll: f32 = rng.random_range(0.0..1.0);
        let (kind, speed) = if roll < 0.6 {
            (EntityKind::TrafficCar, 20.0 + rng.random_range(0.0..10.0))
        } else if roll < 0.85 {
            (EntityKind::Truck, 15.0 + rng.random_range(0.0..8.0))
        } else {
            (EntityKind::Lorry, 12.0 + rng.random_range(0.0..5.0))
        };
        let x = Self::random_lane(rng);
        let z = vehicle_z - 140.0 - rng.random_range(0.0..60.0);
        self.push_entity(kind, x, z, speed, events);
    }

    fn spawn_hazard(
        &mut self,
        kind: EntityKind,
        vehicle_z: f32,
        rng: &mut Pcg32,
        events: &mut Vec<SimEvent>,
    ) {
        let x = Self::random_lane(rng);
        let z = vehicle_z - 100.0 - rng.random_range(0.0..40.0);
        self.push_entity(kind, x, z, 0.0, events);
    }

    fn spawn_tree(&mut self, vehicle_z: f32, rng: &mut Pcg32) {
        let side = if rng.random_range(0.0..1.0) > 0.5 {
            1.0
        } else {
            -1.0
        };
        self.trees.push(Scenery {
            kind: SceneryKind::Tree,
            x: side * (18.0 + rng.random_range(0.0..8.0)),
            z: vehicle_z - 120.0 - rng.random_range(0.0..80.0),
            rotation: rng.random_range(0.0..std::f32::consts::TAU),
            size: Vec3::ONE,
        });
    }

    fn spawn_building(&mut self, vehicle_z: f32, rng: &mut Pcg32) {
        let side = if rng.random_range(0.0..1.0) > 0.5 {
            1.0
        } else {
            -1.0
        };
        self.buildings.push(Scenery {
            kind: SceneryKind::Building,
            x: side * (25.0 + rng.random_range(0.0..15.0)),
            z: vehicle_z - 150.0 - rng.random_range(0.0..100.0),
            rotation: if side > 0.0 {
                std::f32::consts::FRAC_PI_2
            } else {
                -std::f32::consts::FRAC_PI_2
            },
            size: Vec3::new(
                4.0 + rng.random_range(0.0..3.0),
                8.0 + rng.random_range(0.0..6.0),
                3.0 + rng.random_range(0.0..2.0),
            ),
        });
    }

    fn spawn_lamp(&mut self, vehicle_z: f32, rng: &mut Pcg32) {
        // Alternating road edges
        let side = if self.lamps.cursor % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        self.lamps.push(Scenery {
            kind: SceneryKind::Lamp,
            x: side * (ROAD_BOUNDARY + 0.5),
            z: vehicle_z - 110.0 - rng.random_range(0.0..30.0),
            rotation: 0.0,
            size: Vec3::new(0.2, 5.0, 0.2),
        });
    }

    /// Total live collidable entities, for the HUD/debug line.
    pub fn active_count(&self) -> usize {
        self.traffic.len() + self.obstacles.len() + self.potholes.len() + self.collectibles.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop entities past the despawn horizon, plus anything already marked
/// removed by the collision pass. Backward iteration keeps in-place removal
/// safe.
fn cull(list: &mut Vec<Entity>, despawn_z: f32, events: &mut Vec<SimEvent>) {
    for i in (0..list.len()).rev() {
        if !list[i].alive {
            list.remove(i);
        } else if list[i].z > despawn_z {
            mark_removed(&mut list[i], events);
            list.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(99)
    }

    fn entity(id: u32, z: f32) -> Entity {
        Entity {
            id,
            kind: EntityKind::Obstacle,
            x: 0.0,
            z,
            speed: 0.0,
            alive: true,
            struck: false,
        }
    }

    #[test]
    fn test_spawns_stay_in_lanes_and_ahead_of_vehicle() {
        let mut world = World::new();
        let mut rng = rng();
        let mut events = Vec::new();
        let vehicle_z = 20.0;
        // Run long enough for every channel to fire several times
        for _ in 0..600 {
            world.update(1.0 / 60.0, vehicle_z, &mut rng, &mut events);
        }
        for e in world
            .traffic
            .iter()
            .chain(&world.obstacles)
            .chain(&world.potholes)
            .chain(&world.collectibles)
        {
            assert!(LANES.contains(&e.x), "{:?} off lane: x={}", e.kind, e.x);
            // Traffic closes in over time but never survives past the horizon
            assert!(e.z <= vehicle_z + 60.0, "{:?} past horizon: z={}", e.kind, e.z);
        }
        // Static spawns never appear near the vehicle at all
        for e in world
            .obstacles
            .iter()
            .chain(&world.potholes)
            .chain(&world.collectibles)
        {
            assert!(e.z <= vehicle_z - 100.0, "{:?} too close: z={}", e.kind, e.z);
        }
    }

    #[test]
    fn test_traffic_advances_toward_vehicle() {
        let mut world = World::new();
        let mut events = Vec::new();
        world.traffic.push(Entity {
            id: 1,
            kind: EntityKind::TrafficCar,
            x: 1.8,
            z: -100.0,
            speed: 25.0,
            alive: true,
            struck: false,
        });
        // Timers already expired would add noise; push them out
        world.timers = SpawnTimers {
            traffic: 100.0,
            obstacle: 100.0,
            pothole: 100.0,
            collectible: 100.0,
            tree: 100.0,
            building: 100.0,
            lamp: 100.0,
        };
        world.update(1.0, 0.0, &mut rng(), &mut events);
        assert_eq!(world.traffic[0].z, -75.0);
    }

    #[test]
    fn test_cull_removes_entities_behind_vehicle() {
        let mut list = vec![entity(1, -50.0), entity(2, 70.0), entity(3, 10.0)];
        let mut events = Vec::new();
        cull(&mut list, 60.0, &mut events);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|e| e.id != 2));
        assert_eq!(events, vec![SimEvent::EntityDespawned(2)]);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut e = entity(7, 0.0);
        let mut events = Vec::new();
        mark_removed(&mut e, &mut events);
        mark_removed(&mut e, &mut events);
        assert!(!e.alive);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cull_compacts_already_removed() {
        let mut list = vec![entity(1, -50.0), entity(2, -60.0)];
        let mut events = Vec::new();
        mark_removed(&mut list[0], &mut events);
        cull(&mut list, 60.0, &mut events);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 2);
        // No second despawn for the pre-marked entity
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_scenery_pool_fills_distinct_slots() {
        let mut pool = SceneryPool::new(8);
        for i in 0..5 {
            let slot = pool.push(Scenery {
                kind: SceneryKind::Tree,
                x: i as f32,
                z: 0.0,
                rotation: 0.0,
                size: Vec3::ONE,
            });
            assert_eq!(slot, i);
        }
        assert_eq!(pool.occupied(), 5);
        assert_eq!(pool.capacity(), 8);
    }

    #[test]
    fn test_scenery_pool_wraps_and_overwrites() {
        let mut pool = SceneryPool::new(4);
        for i in 0..5 {
            pool.push(Scenery {
                kind: SceneryKind::Lamp,
                x: i as f32,
                z: 0.0,
                rotation: 0.0,
                size: Vec3::ONE,
            });
        }
        // Fifth write wrapped onto slot 0
        assert_eq!(pool.occupied(), 4);
        assert_eq!(pool.get(0).unwrap().x, 4.0);
        assert_eq!(pool.get(1).unwrap().x, 1.0);
    }

    #[test]
    fn test_traffic_mix_uses_all_kinds() {
        let mut world = World::new();
        let mut rng = rng();
        let mut events = Vec::new();
        for _ in 0..200 {
            world.spawn_traffic(0.0, &mut rng, &mut events);
        }
        let kinds: Vec<_> = world.traffic.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EntityKind::TrafficCar));
        assert!(kinds.contains(&EntityKind::Truck));
        assert!(kinds.contains(&EntityKind::Lorry));
    }

    #[test]
    fn test_spawn_emits_event_with_matching_id() {
        let mut world = World::new();
        let mut events = Vec::new();
        world.spawn_hazard(EntityKind::Pothole, 0.0, &mut rng(), &mut events);
        let e = &world.potholes[0];
        assert!(matches!(
            events[0],
            SimEvent::EntitySpawned { id, kind: EntityKind::Pothole, .. } if id == e.id
        ));
    }
}
