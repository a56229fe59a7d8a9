//! Simulation state and core types
//!
//! Everything the per-tick orchestrator owns lives here: the vehicle, the
//! procedural world, assist bookkeeping, the command queue and the outbound
//! event buffer. There are no module-level globals; presentation code gets a
//! `&SimState` to read and `drain_events` for the rest.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::world::{EntityKind, World};
use crate::Settings;
use crate::consts::*;
use crate::forward_from_heading;

/// Continuous control inputs, sampled once per tick by the input collaborator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlAxes {
    /// Accelerator pedal, 0..=1
    pub throttle: f32,
    /// Brake pedal, 0..=1
    pub brake: f32,
    /// Steering, -1 (left) / 0 / 1 (right)
    pub steer: f32,
    /// Drift mode held
    pub drift: bool,
    /// Handbrake held
    pub handbrake: bool,
    /// Clutch pedal, 0 (released) ..= 1 (floored). Engagement is `1 - clutch`.
    pub clutch: f32,
}

impl ControlAxes {
    /// Clutch engagement: 1.0 = fully engaged (pedal released).
    #[inline]
    pub fn clutch_engagement(&self) -> f32 {
        1.0 - self.clutch.clamp(0.0, 1.0)
    }

    /// Whether the clutch pedal is pressed far enough to permit shifts and
    /// engine starts.
    #[inline]
    pub fn clutch_pressed(&self) -> bool {
        self.clutch >= CLUTCH_THRESHOLD
    }

    /// Clamp all axes into their valid ranges. Out-of-range input is never an
    /// error, it is just clamped.
    pub fn clamped(mut self) -> Self {
        self.throttle = self.throttle.clamp(0.0, 1.0);
        self.brake = self.brake.clamp(0.0, 1.0);
        self.steer = self.steer.clamp(-1.0, 1.0);
        self.clutch = self.clutch.clamp(0.0, 1.0);
        self
    }
}

/// Discrete input commands, queued by the input layer and drained in order at
/// the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    EngineToggle,
    ShiftUp,
    ShiftDown,
}

/// One-way events for the presentation layer. The sim appends, presentation
/// drains; nothing flows back.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// HUD instruction line changed; `duration` of `None` means "until
    /// replaced", `Some(secs)` is a timed flash.
    InstructionChanged {
        text: &'static str,
        duration: Option<f32>,
    },
    /// Commentary one-liner
    Snark(&'static str),
    /// Presentation should shake the camera
    CameraShakeRequested(f32),
    /// Integer score changed
    ScoreChanged(u64),
    /// Collectible count changed
    CollectedChanged(u32),
    /// A collidable entity entered the world
    EntitySpawned {
        id: u32,
        kind: EntityKind,
        x: f32,
        z: f32,
    },
    /// A collidable entity left the world (culled or consumed)
    EntityDespawned(u32),
}

/// The player's vehicle. Created once per session, mutated in place each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    /// World-plane position; `x` is lateral, `y` is the longitudinal z axis.
    /// The vehicle travels toward -z.
    pub position: Vec2,
    /// Heading angle in radians; 0 faces down the road
    pub heading: f32,
    /// World-plane velocity
    pub velocity: Vec2,
    /// Engine speed, 0..=MAX_RPM
    pub rpm: f32,
    /// -1 = reverse, 0 = neutral, 1..=MAX_GEAR forward
    pub gear: i8,
    pub engine_on: bool,
    /// Restart lockout remaining after a stall
    pub stall_cooldown: f32,
    /// Torque-reduction window remaining after a shift
    pub shift_timer: f32,
    pub score: f64,
    pub collected: u32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.0, 20.0),
            heading: 0.0,
            velocity: Vec2::ZERO,
            rpm: 0.0,
            gear: 0,
            engine_on: false,
            stall_cooldown: 0.0,
            shift_timer: 0.0,
            score: 0.0,
            collected: 0,
        }
    }
}

impl VehicleState {
    /// Unit vector the nose points along
    #[inline]
    pub fn forward(&self) -> Vec2 {
        forward_from_heading(self.heading)
    }

    /// Signed speed along the heading; positive when moving forward
    #[inline]
    pub fn forward_speed(&self) -> f32 {
        self.velocity.dot(self.forward())
    }

    /// Overall speed magnitude
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Display speed in km/h-ish units
    #[inline]
    pub fn speed_kmh(&self) -> f32 {
        self.speed() * 36.0
    }

    /// Gear indicator text for the HUD
    pub fn gear_label(&self) -> &'static str {
        if !self.engine_on {
            return "OFF";
        }
        match self.gear {
            -1 => "R",
            0 => "N",
            1 => "1",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            _ => "6",
        }
    }
}

/// Driving-assist bookkeeping: auto-start and auto-first-gear timers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistState {
    /// Auto first gear pending once the timer runs out
    pub pending_shift: bool,
    /// Time left before the pending shift fires
    pub shift_timer: f32,
    /// Lockout between auto-starts
    pub auto_start_cooldown: f32,
}

/// Complete simulation context, owned by the frame loop.
#[derive(Debug)]
pub struct SimState {
    pub vehicle: VehicleState,
    pub world: World,
    pub assist: AssistState,
    pub settings: Settings,
    pub rng: Pcg32,
    /// Wall-clock simulation time accumulated so far
    pub time: f64,
    /// Rotating index into the snark line table
    pub snark_index: usize,
    /// Last integer score published via `ScoreChanged`
    pub published_score: u64,
    /// Last ambient instruction line published, for change detection
    pub(crate) current_instruction: &'static str,
    pub(crate) events: Vec<SimEvent>,
    pending_commands: Vec<Command>,
}

impl SimState {
    pub fn new(seed: u64, settings: Settings) -> Self {
        log::info!("simulation created with seed {seed}");
        Self {
            vehicle: VehicleState::default(),
            world: World::new(),
            assist: AssistState::default(),
            settings,
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            snark_index: 0,
            published_score: 0,
            current_instruction: "",
            events: Vec::new(),
            pending_commands: Vec::new(),
        }
    }

    /// Queue a discrete command for the next tick. This is the only
    /// cross-boundary mutation path; the queue is append-only until drained.
    pub fn queue_command(&mut self, command: Command) {
        self.pending_commands.push(command);
    }

    /// Take the queued commands in arrival order. Called once at tick start.
    pub(crate) fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending_commands)
    }

    /// Append an event for the presentation layer.
    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Drain accumulated events; presentation calls this once per frame.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events emitted since the last drain, without consuming them.
    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clutch_engagement_inverts_pedal() {
        let axes = ControlAxes {
            clutch: 1.0,
            ..Default::default()
        };
        assert_eq!(axes.clutch_engagement(), 0.0);
        assert!(axes.clutch_pressed());

        let released = ControlAxes::default();
        assert_eq!(released.clutch_engagement(), 1.0);
        assert!(!released.clutch_pressed());
    }

    #[test]
    fn test_axes_clamped() {
        let axes = ControlAxes {
            throttle: 3.0,
            brake: -1.0,
            steer: 9.0,
            clutch: 2.0,
            ..Default::default()
        }
        .clamped();
        assert_eq!(axes.throttle, 1.0);
        assert_eq!(axes.brake, 0.0);
        assert_eq!(axes.steer, 1.0);
        assert_eq!(axes.clutch, 1.0);
    }

    #[test]
    fn test_command_queue_drains_in_order() {
        let mut state = SimState::new(1, Settings::default());
        state.queue_command(Command::EngineToggle);
        state.queue_command(Command::ShiftUp);
        assert_eq!(
            state.take_commands(),
            vec![Command::EngineToggle, Command::ShiftUp]
        );
        assert!(state.take_commands().is_empty());
    }

    #[test]
    fn test_forward_speed_sign() {
        let mut v = VehicleState::default();
        v.velocity = Vec2::new(0.0, -5.0); // moving down the road
        assert!(v.forward_speed() > 0.0);
        v.velocity = Vec2::new(0.0, 5.0); // rolling backwards
        assert!(v.forward_speed() < 0.0);
    }
}
