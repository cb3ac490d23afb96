//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Timestamps come in from the caller
//! - Seeded RNG only
//! - No rendering or browser dependencies

pub mod collision;
pub mod gesture;
pub mod physics;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{booger_hits_bug, booger_out_of_bounds, bug_out_of_bounds, circles_overlap};
pub use gesture::{GestureEnd, GestureHandler, GestureInterpreter, GestureState};
pub use physics::{BoogerPhysics, GrowOutcome};
pub use snapshot::FrameSnapshot;
pub use spawner::{Spawner, kind_for_roll, spawn_bug};
pub use state::{Booger, Bug, BugKind, Particle, SimEvent, SimState};
pub use tick::{FrameStatus, tick};
