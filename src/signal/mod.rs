//! Traffic-light domain model
//!
//! Light states, the controlled-link topology and the structure of signal
//! programs. Nothing here talks to the simulator.

mod light_state;
mod links;
mod program;

pub use light_state::{LightState, SignalState};
pub use links::{ControlledLink, ControlledLinks};
pub use program::{Logic, Phase, Program};
