//! Panelak Drive entry point
//!
//! Headless scripted demo: drives the simulation through a short lesson
//! (start, first gear, cruise, drift, brake) at a fixed cadence and logs the
//! HUD lines and events a front end would render.

use std::time::SystemTime;

use panelak_drive::Settings;
use panelak_drive::sim::{Command, ControlAxes, SimEvent, SimState, describe_gear, describe_rpm, tick};

const DT: f32 = 1.0 / 60.0;

/// One phase of the scripted lesson: held axes plus commands queued on the
/// phase's first tick.
struct Phase {
    name: &'static str,
    seconds: f32,
    axes: ControlAxes,
    commands: &'static [Command],
}

fn lesson() -> Vec<Phase> {
    let clutch_down = ControlAxes {
        clutch: 1.0,
        ..Default::default()
    };
    vec![
        Phase {
            name: "sitting there",
            seconds: 0.5,
            axes: ControlAxes::default(),
            commands: &[],
        },
        Phase {
            name: "clutch in, engine start",
            seconds: 0.5,
            axes: clutch_down,
            commands: &[Command::EngineToggle],
        },
        Phase {
            name: "first gear",
            seconds: 0.3,
            axes: clutch_down,
            commands: &[Command::ShiftUp],
        },
        Phase {
            name: "pulling away",
            seconds: 3.0,
            axes: ControlAxes {
                throttle: 0.7,
                ..Default::default()
            },
            commands: &[],
        },
        Phase {
            name: "second gear",
            seconds: 0.4,
            axes: ControlAxes {
                throttle: 0.3,
                clutch: 1.0,
                ..Default::default()
            },
            commands: &[Command::ShiftUp],
        },
        Phase {
            name: "cruising",
            seconds: 3.5,
            axes: ControlAxes {
                throttle: 0.8,
                ..Default::default()
            },
            commands: &[],
        },
        Phase {
            name: "drifting about",
            seconds: 3.0,
            axes: ControlAxes {
                throttle: 0.8,
                steer: 1.0,
                drift: true,
                ..Default::default()
            },
            commands: &[],
        },
        Phase {
            name: "braking",
            seconds: 2.0,
            axes: ControlAxes {
                brake: 1.0,
                ..Default::default()
            },
            commands: &[],
        },
    ]
}

fn log_events(events: &[SimEvent]) {
    for event in events {
        match event {
            SimEvent::InstructionChanged { text, .. } => log::info!("instruction: {text}"),
            SimEvent::Snark(line) => log::info!("snark: {line}"),
            SimEvent::CameraShakeRequested(intensity) => {
                log::info!("camera shake {intensity:.2}")
            }
            SimEvent::ScoreChanged(score) => log::debug!("score {score}"),
            SimEvent::CollectedChanged(count) => log::info!("collected {count}"),
            SimEvent::EntitySpawned { id, kind, x, z } => {
                log::trace!("spawn #{id} {kind:?} at ({x:.1}, {z:.1})")
            }
            SimEvent::EntityDespawned(id) => log::trace!("despawn #{id}"),
        }
    }
}

fn main() {
    env_logger::init();

    let settings = Settings::load();
    let seed = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Panelak Drive starting, seed {seed}");

    let mut state = SimState::new(seed, settings);

    for phase in lesson() {
        log::info!("--- {} ---", phase.name);
        for command in phase.commands {
            state.queue_command(*command);
        }
        let steps = (phase.seconds / DT).round() as u32;
        for _ in 0..steps {
            tick(&mut state, &phase.axes, DT);
            log_events(&state.drain_events());
        }
        let v = &state.vehicle;
        log::info!(
            "{:5.1} km/h | gear {} ({}) | {:4.0} rpm ({}) | z {:7.1} | score {}",
            v.speed_kmh(),
            v.gear_label(),
            describe_gear(v.gear_label(), v.speed_kmh(), v.engine_on),
            v.rpm,
            describe_rpm(v.rpm / panelak_drive::consts::MAX_RPM, v.engine_on),
            v.position.y,
            state.published_score,
        );
    }

    log::info!(
        "lesson over: score {}, {} pickups, {} entities on the road",
        state.published_score,
        state.vehicle.collected,
        state.world.active_count(),
    );
    state.settings.save();
}
