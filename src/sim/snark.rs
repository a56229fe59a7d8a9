//! Driving-school commentary and HUD instruction text
//!
//! The sim never touches UI text elements directly; everything here goes out
//! as `SimEvent::Snark` / `SimEvent::InstructionChanged` and the presentation
//! layer decides where to put it.

use super::state::{ControlAxes, SimEvent, SimState};
use crate::consts::CLUTCH_THRESHOLD;

/// Shown until the engine is running for the first time.
pub const START_TIP: &str =
    "Start: hold the clutch (C) and press F. Then shift with Q/E and ease the clutch out.";

/// Rotating backseat-instructor lines, cycled on shifts and other milestones.
pub const SNARK_LINES: [&str; 12] = [
    "Careful, your insurer is already drafting an exit plan.",
    "Did your cousin stamp that roadworthiness cert? It shows.",
    "You drive like you're hauling soup. All stress, no speed.",
    "Watch the cones, they have friends at city hall.",
    "Oncoming cars are from the tax office. They tax bumpers heavily.",
    "Shift faster than the officer can write the ticket.",
    "Drift? More like artistic sliding. Fine, carry on.",
    "Don't ration the throttle, fuel isn't rationed yet.",
    "At this pace you won't make the mountains by midnight.",
    "The car has more electronics than you have brain, and it still works better.",
    "Your mother would shift faster.",
    "Brakes exist, though I understand they're an extra expense.",
];

/// Emit a snark line: a specific one, or the next in rotation.
/// Silently dropped when snark is disabled in settings.
pub fn flash_snark(state: &mut SimState, line: Option<&'static str>) {
    state.snark_index = (state.snark_index + 1) % SNARK_LINES.len();
    if !state.settings.snark {
        return;
    }
    let text = line.unwrap_or(SNARK_LINES[state.snark_index]);
    state.emit(SimEvent::Snark(text));
}

/// Emit a timed instruction flash that overrides the contextual line.
pub fn flash_instruction(state: &mut SimState, text: &'static str, duration: f32) {
    state.emit(SimEvent::InstructionChanged {
        text,
        duration: Some(duration),
    });
}

/// Contextual default instruction for the current vehicle state, used when no
/// timed flash is active.
pub fn default_instruction(state: &SimState, axes: &ControlAxes) -> &'static str {
    let v = &state.vehicle;
    let speed_kmh = v.speed_kmh();
    if !v.engine_on {
        return START_TIP;
    }
    if speed_kmh < 5.0 && v.gear > 0 {
        return "Feed in throttle (W) and release the clutch (C) slowly.";
    }
    if v.gear == 0 {
        return if axes.clutch >= CLUTCH_THRESHOLD {
            "Press Q (down) or E (up) to select a gear."
        } else {
            "Hold C and use Q/E to select a gear."
        };
    }
    if axes.clutch >= CLUTCH_THRESHOLD && v.speed() < 0.5 {
        return "Ease off C and add W to pull away.";
    }
    if speed_kmh > 80.0 && v.gear < 5 {
        return "The engine is screaming, grab a higher gear with E.";
    }
    if axes.drift {
        return "Drift mode: hold your line with A/D and work the throttle.";
    }
    "W = throttle, S = brake, A/D = steer, Shift = drift, Space = handbrake."
}

/// Short phrase for the rpm gauge.
pub fn describe_rpm(percent: f32, engine_on: bool) -> &'static str {
    if !engine_on {
        return "engine asleep";
    }
    if percent > 0.92 {
        "limiter on fire"
    } else if percent > 0.75 {
        "rally scream"
    } else if percent > 0.45 {
        "healthy growl"
    } else {
        "lazy burble"
    }
}

/// Short phrase for the gear indicator.
pub fn describe_gear(label: &str, speed_kmh: f32, engine_on: bool) -> &'static str {
    if !engine_on || label == "OFF" {
        return "engine dead";
    }
    match label {
        "N" => {
            if speed_kmh < 2.0 {
                "neutral chill"
            } else {
                "coasting in neutral"
            }
        }
        "R" => "reversing like a lot boss",
        _ => "in gear, keep the throttle on",
    }
}
