//! Deterministic driving simulation
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Seeded RNG only
//! - Single-threaded, fixed stage order per tick
//! - No rendering or platform dependencies
//!
//! Presentation layers read `SimState`, queue `Command`s, and drain
//! `SimEvent`s; nothing else crosses the boundary.

pub mod collision;
pub mod drivetrain;
pub mod kinematics;
pub mod snark;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::vehicle_overlaps;
pub use snark::{describe_gear, describe_rpm};
pub use state::{AssistState, Command, ControlAxes, SimEvent, SimState, VehicleState};
pub use tick::tick;
pub use world::{Entity, EntityKind, Scenery, SceneryKind, SceneryPool, World};
