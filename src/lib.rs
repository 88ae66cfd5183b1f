//! Traffic-light control client
//!
//! Typed queries and commands over the traffic-light variables of a running
//! traffic micro-simulation. Reads are cached for the duration of a
//! simulation step; writes are dispatched immediately.
//!
//! The simulator is reached through the [`connection::Transport`] trait. The
//! [`sim`] module provides an in-memory fixed-time implementation of it.

pub mod connection;
pub mod error;
pub mod query;
pub mod signal;
pub mod sim;
mod traffic_light;

pub use connection::{Connection, ConnectionConfig, NetworkDescription, Repository, Transport};
pub use error::{Error, Result, TransportError};
pub use signal::{ControlledLink, ControlledLinks, LightState, Logic, Phase, Program, SignalState};
pub use traffic_light::TrafficLight;
