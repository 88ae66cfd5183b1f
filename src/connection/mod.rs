//! Connection to a running simulation
//!
//! The connection owns the tick counter and is the only channel commands are
//! dispatched through. Read queries never register with it: each query
//! remembers the [`Generation`] it last fetched in and refetches as soon as
//! the connection's generation for its entity moves on.

mod network;
mod repository;
mod transport;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;

use log::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traffic_light::TrafficLight;

pub use network::NetworkDescription;
pub use repository::Repository;
pub use transport::{
    Command, CommandKind, LaneTriple, LogicRecord, PhaseRecord, TlVariable, Transport, Value,
};

/// Default length of one simulation tick
pub const DEFAULT_STEP_LENGTH_MS: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(step) => step,
    None => unreachable!(),
};

/// Settings of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Simulated milliseconds per tick, as configured on the simulator side
    pub step_length_ms: NonZeroU32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            step_length_ms: DEFAULT_STEP_LENGTH_MS,
        }
    }
}

/// Point in the connection's history a cached read is valid for
///
/// Moves on with every tick and with every successful write on the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Generation {
    tick: u64,
    writes: u64,
}

/// Shared state behind a connection and every query bound to it
pub(crate) struct Dispatcher {
    transport: RefCell<Box<dyn Transport>>,
    network: NetworkDescription,
    tick: Cell<u64>,
    /// Successful writes per entity
    write_epochs: RefCell<HashMap<String, u64>>,
}

impl Dispatcher {
    fn new(transport: Box<dyn Transport>, network: NetworkDescription) -> Self {
        Self {
            transport: RefCell::new(transport),
            network,
            tick: Cell::new(0),
            write_epochs: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn network(&self) -> &NetworkDescription {
        &self.network
    }

    pub(crate) fn generation(&self, entity_id: &str) -> Generation {
        let writes = self
            .write_epochs
            .borrow()
            .get(entity_id)
            .copied()
            .unwrap_or(0);
        Generation {
            tick: self.tick.get(),
            writes,
        }
    }

    /// Dispatches a get-variable command
    pub(crate) fn get(&self, entity_id: &str, variable: TlVariable) -> Result<Value> {
        trace!(
            "tick {}: get 0x{:02x} of {:?}",
            self.tick.get(),
            variable.id(),
            entity_id
        );
        let value = self
            .transport
            .borrow_mut()
            .send_command(Command::get(entity_id, variable))?;
        Ok(value)
    }

    /// Dispatches a set-variable command and invalidates reads of the entity
    pub(crate) fn set(&self, entity_id: &str, variable: TlVariable, payload: Value) -> Result<()> {
        trace!(
            "tick {}: set 0x{:02x} of {:?} to {:?}",
            self.tick.get(),
            variable.id(),
            entity_id,
            payload
        );
        let response = self
            .transport
            .borrow_mut()
            .send_command(Command::set(entity_id, variable, payload))?;
        // The command reached the simulator, whatever it answered
        *self
            .write_epochs
            .borrow_mut()
            .entry(entity_id.to_owned())
            .or_insert(0) += 1;
        if response != Value::Empty {
            return Err(TransportError::UnexpectedResponse {
                variable,
                detail: format!("expected an empty acknowledgement, got {}", response.kind()),
            }
            .into());
        }
        Ok(())
    }

    fn advance(&self) -> Result<()> {
        self.transport.borrow_mut().advance_simulated_time()?;
        self.tick.set(self.tick.get() + 1);
        Ok(())
    }
}

/// A controlling connection to one simulation
pub struct Connection {
    dispatcher: Rc<Dispatcher>,
    config: ConnectionConfig,
    traffic_lights: Repository<TrafficLight>,
}

impl Connection {
    pub fn new(
        transport: impl Transport + 'static,
        network: NetworkDescription,
        config: ConnectionConfig,
    ) -> Self {
        let dispatcher = Rc::new(Dispatcher::new(Box::new(transport), network));
        let ids = dispatcher
            .network()
            .traffic_light_ids()
            .map(str::to_owned)
            .collect();
        let bound = Rc::clone(&dispatcher);
        let traffic_lights = Repository::new(ids, move |id: &str| TrafficLight::bind(id, &bound));

        debug!(
            "connection opened: {} traffic lights, {} ms per step",
            dispatcher.network().traffic_light_count(),
            config.step_length_ms
        );

        Self {
            dispatcher,
            config,
            traffic_lights,
        }
    }

    /// Advances the simulation by one tick
    ///
    /// Every read cached before this call is stale afterwards. On failure
    /// the tick counter is left untouched.
    pub fn advance_step(&self) -> Result<()> {
        self.dispatcher.advance()?;
        debug!("advanced to step {}", self.current_sim_step());
        Ok(())
    }

    /// Advances `steps` ticks, stopping at the first failure
    pub fn advance_steps(&self, steps: u32) -> Result<()> {
        for _ in 0..steps {
            self.advance_step()?;
        }
        Ok(())
    }

    pub fn current_sim_step(&self) -> u64 {
        self.dispatcher.tick.get()
    }

    /// Simulated time in milliseconds
    pub fn sim_time_ms(&self) -> u64 {
        self.current_sim_step() * u64::from(self.config.step_length_ms.get())
    }

    pub fn network(&self) -> &NetworkDescription {
        self.dispatcher.network()
    }

    pub fn traffic_light_repository(&self) -> &Repository<TrafficLight> {
        &self.traffic_lights
    }
}
