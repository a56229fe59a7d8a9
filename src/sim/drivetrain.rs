//! Engine, clutch and gearbox model
//!
//! Three-state engine (off / running / stalled-with-cooldown), rpm tracking
//! with three integration regimes, a sine torque curve and the shift-lag
//! window. Nothing here is physically rigorous; it is tuned to make a manual
//! gearbox feel teachable.

use super::snark::{flash_instruction, flash_snark};
use super::state::{ControlAxes, SimState};
use crate::consts::*;
use crate::{approach, lerp};

/// Effective drive ratio for a gear: gearbox ratio times final drive.
/// Neutral is zero; reverse is negative.
#[inline]
pub fn drive_ratio(gear: i8) -> f32 {
    if gear > 0 {
        GEAR_RATIOS[(gear - 1) as usize] * DIFF_RATIO
    } else if gear < 0 {
        -REVERSE_RATIO * DIFF_RATIO
    } else {
        0.0
    }
}

/// Naturally-aspirated torque curve: zero at idle and redline, peaking
/// mid-band.
#[inline]
pub fn torque_from_rpm(rpm: f32) -> f32 {
    let normalized = ((rpm - IDLE_RPM) / (MAX_RPM - IDLE_RPM)).clamp(0.0, 1.0);
    PEAK_TORQUE * (normalized * std::f32::consts::PI).sin()
}

/// Toggle the engine. Starting requires the clutch pedal down (or `force`,
/// used by the auto-start assist) and no stall cooldown. Rejections leave
/// state untouched and only produce commentary.
pub fn toggle_engine(state: &mut SimState, force: bool, axes: &ControlAxes) {
    if state.vehicle.engine_on {
        state.vehicle.engine_on = false;
        state.vehicle.rpm = 0.0;
        log::info!("engine switched off");
        flash_snark(state, Some("Engine's taking a break. You can too."));
        flash_instruction(state, "Engine off. Hold C and press F to resurrect it.", 3.2);
        return;
    }
    if state.vehicle.stall_cooldown > 0.0 {
        flash_snark(state, Some("Give it a second, the engine is still sulking."));
        return;
    }
    if !force && !axes.clutch_pressed() {
        flash_snark(state, Some("Clutch first, then start."));
        return;
    }
    state.vehicle.engine_on = true;
    state.vehicle.rpm = IDLE_RPM + 200.0;
    log::info!("engine started (forced: {force})");
    flash_snark(
        state,
        Some(if force {
            "Auto-start done, off to the road."
        } else {
            "Engine's alive, don't choke it right away."
        }),
    );
    flash_instruction(state, "Engine running, grab a gear and move.", 2.8);
}

/// Shift one gear up. Needs the clutch down unless forced.
pub fn shift_up(state: &mut SimState, force: bool, axes: &ControlAxes) {
    if !force && !axes.clutch_pressed() {
        flash_snark(state, Some("Press the clutch and try that again."));
        return;
    }
    if state.vehicle.gear < MAX_GEAR {
        state.vehicle.gear += 1;
        trigger_shift_lag(state);
        log::debug!("shifted up to {}", state.vehicle.gear);
    }
}

/// Shift one gear down, through neutral into reverse.
pub fn shift_down(state: &mut SimState, force: bool, axes: &ControlAxes) {
    if !force && !axes.clutch_pressed() {
        flash_snark(state, Some("The clutch exists for a reason."));
        return;
    }
    if state.vehicle.gear > -1 {
        state.vehicle.gear -= 1;
        if state.vehicle.gear == 0 {
            flash_snark(state, Some("Neutral? Also a fine way to take a break."));
        }
        trigger_shift_lag(state);
        log::debug!("shifted down to {}", state.vehicle.gear);
    }
}

fn trigger_shift_lag(state: &mut SimState) {
    state.vehicle.shift_timer = SHIFT_LAG;
    flash_snark(state, None);
}

/// Advance rpm and produce the signed drive force for this tick.
///
/// Called before kinematics; the stall check runs separately afterwards so it
/// sees the post-integration forward speed.
pub fn update(state: &mut SimState, axes: &ControlAxes, dt: f32) -> f32 {
    let vehicle = &mut state.vehicle;
    vehicle.stall_cooldown = (vehicle.stall_cooldown - dt).max(0.0);

    let speed_forward = vehicle.forward_speed();
    let wheel_rpm = speed_forward.abs() / WHEEL_CIRC * 60.0;
    let engagement = axes.clutch_engagement();
    let ratio = drive_ratio(vehicle.gear);

    if !vehicle.engine_on {
        // Spinning down
        vehicle.rpm = approach(vehicle.rpm, 0.0, 3.5, dt);
    } else if vehicle.gear == 0 || ratio.abs() < 0.01 || engagement < 0.1 {
        // Free revving: drivetrain disconnected, rpm follows the pedal
        let target = IDLE_RPM + axes.throttle * (MAX_RPM - IDLE_RPM);
        vehicle.rpm = approach(vehicle.rpm, target, 4.5, dt);
    } else {
        // Clutch biting: blend between free revving and what the wheels
        // dictate, weighted by engagement
        let wheel_target = (wheel_rpm * ratio.abs()).clamp(IDLE_RPM, MAX_RPM);
        let free_rev = IDLE_RPM + axes.throttle * (MAX_RPM - IDLE_RPM);
        let blended = lerp(free_rev, wheel_target, engagement);
        vehicle.rpm = approach(vehicle.rpm, blended, 6.0, dt);
    }
    vehicle.rpm = vehicle.rpm.clamp(0.0, MAX_RPM);

    let mut torque = 0.0;
    if vehicle.engine_on {
        torque = torque_from_rpm(vehicle.rpm) * axes.throttle * engagement;
        if vehicle.shift_timer > 0.0 {
            vehicle.shift_timer = (vehicle.shift_timer - dt).max(0.0);
            torque *= SHIFT_TORQUE_FACTOR;
        }
    } else {
        vehicle.shift_timer = (vehicle.shift_timer - dt).max(0.0);
    }

    if ratio == 0.0 { 0.0 } else { torque * ratio }
}

/// Stall the engine if it is being lugged: gear engaged, clutch out, nearly
/// stationary, no throttle. A stall is gameplay, not an error; it locks out
/// restarts for a short cooldown.
pub fn stall_check(state: &mut SimState, axes: &ControlAxes) {
    let vehicle = &state.vehicle;
    if !vehicle.engine_on || vehicle.stall_cooldown > 0.0 {
        return;
    }
    let stalling = vehicle.gear != 0
        && axes.clutch_engagement() > 0.85
        && vehicle.forward_speed().abs() < 0.5
        && axes.throttle < 0.05;
    if stalling {
        state.vehicle.engine_on = false;
        state.vehicle.rpm = 0.0;
        state.vehicle.stall_cooldown = STALL_COOLDOWN;
        log::info!("engine stalled");
        flash_snark(state, Some("You choked it. Hold C and start with F."));
        flash_instruction(state, "Stalled. Hold C, press F, and use first gear.", 4.0);
    }
}
