//! Vehicle motion integration
//!
//! Consumes the drivetrain's signed drive force plus the control axes and
//! advances velocity, heading and position. The slip model is a single knob:
//! how fast lateral velocity decays. Low decay while drifting keeps the car
//! sliding; high decay snaps it back behind the nose.

use super::snark::flash_snark;
use super::state::{ControlAxes, SimState};
use crate::consts::*;
use crate::lerp;

/// Integrate one tick of vehicle motion.
pub fn update(state: &mut SimState, axes: &ControlAxes, drive_force: f32, dt: f32) {
    let vehicle = &mut state.vehicle;
    let forward = vehicle.forward();

    // Drive force along the heading, then linear drag on everything
    vehicle.velocity += forward * (drive_force / MASS) * dt;
    vehicle.velocity -= vehicle.velocity * DRAG * dt;

    // Decompose and bleed off the lateral remainder
    let speed_forward = vehicle.velocity.dot(forward);
    let lateral = vehicle.velocity - forward * speed_forward;
    let grip = if axes.drift { GRIP_DRIFT } else { GRIP_NORMAL };
    vehicle.velocity -= lateral * (grip * dt).min(1.0);

    if axes.handbrake {
        vehicle.velocity *= HANDBRAKE_DAMPING;
    }

    if axes.brake > 0.1 {
        // Brake opposes the forward component and can never exceed it
        let brake_force = speed_forward.abs().min(axes.brake * MAX_BRAKE_DECEL);
        let direction = if speed_forward == 0.0 {
            1.0
        } else {
            speed_forward.signum()
        };
        vehicle.velocity += forward * (-brake_force * dt * direction);
    }

    // Steering: stronger while drifting, with a low-speed assist so parking
    // maneuvers do not take a county. Sense flips while reversing.
    let steer_multiplier = if axes.drift { 1.6 } else { 1.05 };
    let speed_factor = (speed_forward.abs() * 0.035).clamp(0.2, if axes.drift { 3.0 } else { 2.2 });
    let low_speed_assist = lerp(1.4, 0.45, (speed_forward.abs() / 30.0).min(1.0));
    let steering_direction = if speed_forward < -0.1 { 1.0 } else { -1.0 };
    let heading_delta =
        axes.steer * steer_multiplier * (speed_factor + low_speed_assist) * steering_direction;
    vehicle.heading += heading_delta * dt;

    vehicle.position += vehicle.velocity * DISTANCE_SCALE * dt;

    // Soft corridor boundary: proportional pushback plus a counter impulse,
    // no hard wall
    let x = vehicle.position.x;
    if x.abs() > ROAD_BOUNDARY {
        let sign = x.signum();
        let excess = x.abs() - ROAD_BOUNDARY;
        vehicle.position.x -= sign * excess * 0.5;
        vehicle.velocity.x += -sign * 5.0 * dt;
        if excess > 1.0 {
            flash_snark(state, Some("Surprise, the road ends there. Back you go."));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::state::SimEvent;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> SimState {
        SimState::new(5, Settings::default())
    }

    fn rolling(velocity: Vec2) -> SimState {
        let mut state = sim();
        state.vehicle.velocity = velocity;
        state
    }

    #[test]
    fn test_drag_decays_speed() {
        let mut state = rolling(Vec2::new(0.0, -10.0));
        let axes = ControlAxes::default();
        let before = state.vehicle.speed();
        for _ in 0..60 {
            update(&mut state, &axes, 0.0, DT);
        }
        assert!(state.vehicle.speed() < before);
        assert!(state.vehicle.speed() > 0.0);
    }

    #[test]
    fn test_drive_force_accelerates_forward() {
        let mut state = sim();
        let axes = ControlAxes::default();
        update(&mut state, &axes, 6000.0, DT);
        assert!(state.vehicle.forward_speed() > 0.0);
    }

    #[test]
    fn test_normal_grip_kills_lateral_velocity() {
        // Pure sideways motion with heading 0
        let mut state = rolling(Vec2::new(4.0, 0.0));
        let axes = ControlAxes::default();
        for _ in 0..120 {
            update(&mut state, &axes, 0.0, DT);
        }
        assert!(state.vehicle.velocity.x.abs() < 0.1);
    }

    #[test]
    fn test_drift_preserves_lateral_velocity() {
        let normal_axes = ControlAxes::default();
        let drift_axes = ControlAxes {
            drift: true,
            ..Default::default()
        };
        let mut gripping = rolling(Vec2::new(4.0, -4.0));
        let mut drifting = rolling(Vec2::new(4.0, -4.0));
        for _ in 0..30 {
            update(&mut gripping, &normal_axes, 0.0, DT);
            update(&mut drifting, &drift_axes, 0.0, DT);
        }
        assert!(drifting.vehicle.velocity.x.abs() > gripping.vehicle.velocity.x.abs() * 2.0);
    }

    #[test]
    fn test_brake_reduces_but_never_reverses() {
        let mut state = rolling(Vec2::new(0.0, -8.0));
        let axes = ControlAxes {
            brake: 1.0,
            ..Default::default()
        };
        for _ in 0..600 {
            update(&mut state, &axes, 0.0, DT);
            assert!(state.vehicle.forward_speed() >= -1e-3);
        }
        assert!(state.vehicle.forward_speed() < 0.2);
    }

    #[test]
    fn test_handbrake_damps_everything() {
        let mut free = rolling(Vec2::new(1.0, -8.0));
        let mut held = rolling(Vec2::new(1.0, -8.0));
        let axes = ControlAxes::default();
        let handbrake = ControlAxes {
            handbrake: true,
            ..Default::default()
        };
        for _ in 0..60 {
            update(&mut free, &axes, 0.0, DT);
            update(&mut held, &handbrake, 0.0, DT);
        }
        assert!(held.vehicle.speed() < free.vehicle.speed());
    }

    #[test]
    fn test_steering_sense_flips_in_reverse() {
        let axes_right = ControlAxes {
            steer: 1.0,
            ..Default::default()
        };
        let mut moving_forward = rolling(Vec2::new(0.0, -10.0));
        update(&mut moving_forward, &axes_right, 0.0, DT);
        assert!(moving_forward.vehicle.heading < 0.0);

        let mut reversing = rolling(Vec2::new(0.0, 10.0));
        update(&mut reversing, &axes_right, 0.0, DT);
        assert!(reversing.vehicle.heading > 0.0);
    }

    #[test]
    fn test_heading_integrates_continuously() {
        let axes = ControlAxes {
            steer: 1.0,
            ..Default::default()
        };
        let mut state = rolling(Vec2::new(0.0, -10.0));
        update(&mut state, &axes, 0.0, DT);
        let after_one = state.vehicle.heading;
        update(&mut state, &axes, 0.0, DT);
        // Two small steps, not a snap to some quantized angle
        assert!(state.vehicle.heading < after_one);
        assert!(after_one.abs() < 0.2);
    }

    #[test]
    fn test_soft_boundary_pushes_back() {
        let mut state = sim();
        state.vehicle.position.x = ROAD_BOUNDARY + 2.0;
        let axes = ControlAxes::default();
        update(&mut state, &axes, 0.0, DT);
        assert!(state.vehicle.position.x < ROAD_BOUNDARY + 2.0);
        assert!(state.vehicle.velocity.x < 0.0);
        let events = state.drain_events();
        assert!(
            events.iter().any(|e| matches!(e, SimEvent::Snark(_))),
            "expected a boundary warning"
        );
    }

    #[test]
    fn test_boundary_quiet_when_on_road() {
        let mut state = rolling(Vec2::new(0.0, -5.0));
        let axes = ControlAxes::default();
        update(&mut state, &axes, 0.0, DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_position_integration_scale() {
        let mut state = rolling(Vec2::new(0.0, -1.0));
        // Large grip does not touch pure forward motion; one tick should
        // advance roughly velocity * scale * dt (minus one tick of drag)
        let z_before = state.vehicle.position.y;
        update(&mut state, &ControlAxes::default(), 0.0, 0.1);
        let moved = z_before - state.vehicle.position.y;
        assert!(moved > 0.9 && moved < 1.1, "moved {moved}");
    }
}
