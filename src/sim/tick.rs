//! Per-tick orchestration
//!
//! One call per rendered frame, single-threaded, fixed stage order:
//! drain commands, run assists, drivetrain, kinematics, world population,
//! collisions, stall check, score accrual, instruction refresh. Collisions
//! see the post-movement position; spawn clearance bands guarantee nothing
//! spawns into the vehicle on the same tick.

use super::state::{Command, ControlAxes, SimEvent, SimState};
use super::{collision, drivetrain, kinematics, snark};
use crate::consts::*;

/// Advance the simulation by one frame's delta.
///
/// `dt` is clamped to [`MAX_TICK_DT`]; a multi-second frame (backgrounded
/// window, debugger pause) integrates as one short step instead of teleporting
/// the vehicle through the world.
pub fn tick(state: &mut SimState, axes: &ControlAxes, dt: f32) {
    let dt = dt.clamp(0.0, MAX_TICK_DT);
    if dt == 0.0 {
        return;
    }
    state.time += dt as f64;
    let axes = axes.clamped();

    for command in state.take_commands() {
        match command {
            Command::EngineToggle => drivetrain::toggle_engine(state, false, &axes),
            Command::ShiftUp => drivetrain::shift_up(state, false, &axes),
            Command::ShiftDown => drivetrain::shift_down(state, false, &axes),
        }
    }

    update_assists(state, &axes, dt);

    let drive_force = drivetrain::update(state, &axes, dt);
    kinematics::update(state, &axes, drive_force, dt);

    {
        let SimState {
            world,
            vehicle,
            rng,
            events,
            ..
        } = state;
        world.update(dt, vehicle.position.y, rng, events);
    }

    collision::resolve(state);
    drivetrain::stall_check(state, &axes);
    accrue_score(state, axes.drift, dt);
    refresh_instruction(state, &axes);
}

/// Optional driving assists: auto-start on throttle, auto first gear after
/// throttle is held in neutral. Both act through the same forced command
/// paths a player would use.
fn update_assists(state: &mut SimState, axes: &ControlAxes, dt: f32) {
    state.assist.auto_start_cooldown = (state.assist.auto_start_cooldown - dt).max(0.0);

    if state.settings.auto_start
        && !state.vehicle.engine_on
        && axes.throttle > 0.2
        && state.vehicle.stall_cooldown <= 0.0
        && state.assist.auto_start_cooldown <= 0.0
    {
        drivetrain::toggle_engine(state, true, axes);
        if state.vehicle.engine_on {
            state.assist.auto_start_cooldown = 3.5;
        }
    }

    let wants_first_gear = state.settings.auto_first_gear
        && state.vehicle.engine_on
        && state.vehicle.gear == 0
        && axes.throttle > 0.2;
    if wants_first_gear {
        if state.assist.pending_shift {
            state.assist.shift_timer -= dt;
            if state.assist.shift_timer <= 0.0 {
                state.assist.pending_shift = false;
                drivetrain::shift_up(state, true, axes);
                snark::flash_instruction(state, "Dropped it into first for you.", 2.0);
            }
        } else {
            state.assist.pending_shift = true;
            state.assist.shift_timer = 0.35;
        }
    } else {
        state.assist.pending_shift = false;
    }
}

/// Distance scoring with a drift bonus. `ScoreChanged` is published only when
/// the integer part moves, so the HUD is not spammed at 60 Hz.
fn accrue_score(state: &mut SimState, drifting: bool, dt: f32) {
    let vehicle = &mut state.vehicle;
    let speed_z = vehicle.velocity.y.abs();
    if vehicle.engine_on && speed_z > 0.1 {
        let mut gain = (speed_z * dt) as f64 * 0.1;
        if drifting {
            gain += (speed_z * dt) as f64 * 0.5;
        }
        vehicle.score += gain;
    }
    let integer = state.vehicle.score as u64;
    if integer != state.published_score {
        state.published_score = integer;
        state.emit(SimEvent::ScoreChanged(integer));
    }
}

/// Publish the ambient instruction line whenever the contextual default
/// changes. Timed flashes go out separately and take display priority on the
/// presentation side.
fn refresh_instruction(state: &mut SimState, axes: &ControlAxes) {
    let text = snark::default_instruction(state, axes);
    if text != state.current_instruction {
        state.current_instruction = text;
        state.emit(SimEvent::InstructionChanged {
            text,
            duration: None,
        });
    }
}
