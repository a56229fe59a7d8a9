//! Collision detection and consequences
//!
//! Plain axis-aligned overlap tests between the vehicle's footprint and every
//! live entity. The vehicle box is not rotated with heading; at arcade speeds
//! the error is invisible and the test stays two comparisons per entity.
//!
//! Consequences are per category, at most one hit each per tick:
//! - traffic / cones: crash, velocity cut to 20%, entity marked struck
//! - potholes: velocity cut to 85%, camera shake, pothole consumed
//! - collectibles: score reward, collectible consumed

use super::snark::flash_snark;
use super::state::{SimEvent, SimState, VehicleState};
use super::world::{Entity, mark_removed};
use crate::consts::*;

/// Overlap test between the vehicle footprint and one entity.
pub fn vehicle_overlaps(vehicle: &VehicleState, entity: &Entity) -> bool {
    let (half_x, half_z) = entity.half_extents();
    (vehicle.position.x - entity.x).abs() <= VEHICLE_HALF_X + half_x
        && (vehicle.position.y - entity.z).abs() <= VEHICLE_HALF_Z + half_z
}

/// Run all collision passes for this tick.
pub fn resolve(state: &mut SimState) {
    let mut crashed = false;
    let mut pothole_hit = false;
    let mut collected = false;

    {
        let vehicle = &mut state.vehicle;
        let world = &mut state.world;
        let events = &mut state.events;

        // Crash passes: first unstruck overlap wins, entity stays in the
        // world wearing its dent
        for list in [&mut world.traffic, &mut world.obstacles] {
            for entity in list.iter_mut() {
                if entity.alive && !entity.struck && vehicle_overlaps(vehicle, entity) {
                    entity.struck = true;
                    vehicle.velocity *= 0.2;
                    crashed = true;
                    break;
                }
            }
        }

        for pothole in world.potholes.iter_mut() {
            if pothole.alive && vehicle_overlaps(vehicle, pothole) {
                vehicle.velocity *= 0.85;
                mark_removed(pothole, events);
                pothole_hit = true;
                break;
            }
        }

        for collectible in world.collectibles.iter_mut() {
            if collectible.alive && vehicle_overlaps(vehicle, collectible) {
                vehicle.score += COLLECTIBLE_REWARD;
                vehicle.collected += 1;
                mark_removed(collectible, events);
                collected = true;
                break;
            }
        }
    }

    if crashed {
        log::debug!("crash at z={:.1}", state.vehicle.position.y);
        flash_snark(state, None);
    }
    if pothole_hit {
        let shake = state.settings.camera_shake_scale();
        if shake > 0.0 {
            state.emit(SimEvent::CameraShakeRequested(0.4 * shake));
        }
    }
    if collected {
        let count = state.vehicle.collected;
        state.emit(SimEvent::CollectedChanged(count));
    }
}
