//! Panelak Drive - an arcade manual-transmission driving game
//!
//! Core modules:
//! - `sim`: Simulation (drivetrain, kinematics, world population, collisions)
//! - `settings`: Assist and presentation preferences
//!
//! The simulation owns all gameplay state and is advanced once per rendered
//! frame with a wall-clock delta. Presentation layers read published state
//! and drain typed events; they never mutate the simulation directly.

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Maximum per-tick delta; longer frames (backgrounded tab, debugger
    /// pause) are clamped rather than integrated in one step.
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Vehicle mass (kg-ish)
    pub const MASS: f32 = 1200.0;
    /// Driven wheel radius (m)
    pub const WHEEL_RADIUS: f32 = 0.35;
    /// Wheel circumference, derived
    pub const WHEEL_CIRC: f32 = 2.0 * std::f32::consts::PI * WHEEL_RADIUS;
    /// Final drive ratio
    pub const DIFF_RATIO: f32 = 3.7;
    /// Forward gear ratios, gear 1 first
    pub const GEAR_RATIOS: [f32; 6] = [2.9, 2.1, 1.6, 1.28, 1.05, 0.84];
    /// Reverse gear ratio (applied negated)
    pub const REVERSE_RATIO: f32 = 3.1;
    /// Highest forward gear
    pub const MAX_GEAR: i8 = GEAR_RATIOS.len() as i8;

    /// Idle engine speed
    pub const IDLE_RPM: f32 = 900.0;
    /// Redline
    pub const MAX_RPM: f32 = 6800.0;
    /// Clutch pedal travel required for shifts and starting
    pub const CLUTCH_THRESHOLD: f32 = 0.75;
    /// Torque at the top of the curve (Nm-ish)
    pub const PEAK_TORQUE: f32 = 500.0;
    /// Torque-reduction window after a gear change (s)
    pub const SHIFT_LAG: f32 = 0.25;
    /// Torque multiplier while the shift lag window is active
    pub const SHIFT_TORQUE_FACTOR: f32 = 0.3;
    /// Restart lockout after a stall (s)
    pub const STALL_COOLDOWN: f32 = 1.5;

    /// Linear drag coefficient (per second)
    pub const DRAG: f32 = 0.45;
    /// Lateral velocity decay while drifting
    pub const GRIP_DRIFT: f32 = 0.35;
    /// Lateral velocity decay with normal grip
    pub const GRIP_NORMAL: f32 = 2.8;
    /// Whole-velocity damping per tick with the handbrake pulled
    pub const HANDBRAKE_DAMPING: f32 = 0.97;
    /// Peak braking deceleration at full pedal
    pub const MAX_BRAKE_DECEL: f32 = 24.0;
    /// Velocity-to-world distance scale
    pub const DISTANCE_SCALE: f32 = 10.0;
    /// Drivable corridor half width; soft pushback beyond this
    pub const ROAD_BOUNDARY: f32 = 16.0;

    /// Vehicle collision half extents (lateral, longitudinal)
    pub const VEHICLE_HALF_X: f32 = 0.95;
    pub const VEHICLE_HALF_Z: f32 = 2.1;

    /// Lane center offsets across the road
    pub const LANES: [f32; 4] = [-5.4, -1.8, 1.8, 5.4];

    /// Cosmetic pool capacities
    pub const MAX_TREES: usize = 1000;
    pub const MAX_BUILDINGS: usize = 500;
    pub const MAX_LAMPS: usize = 200;

    /// Points for picking up a collectible
    pub const COLLECTIBLE_REWARD: f64 = 500.0;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Exponential approach used for all rpm regimes: step `current` toward
/// `target` by `rate * dt`, saturating at the target.
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    lerp(current, target, (rate * dt).min(1.0))
}

/// Unit forward vector in the world plane for a heading angle.
///
/// Heading 0 faces down the road (−z); positive heading turns the nose
/// toward −x.
#[inline]
pub fn forward_from_heading(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), -heading.cos())
}
