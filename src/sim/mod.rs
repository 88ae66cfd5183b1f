//! In-memory fixed-time simulator
//!
//! Serves the traffic-light side of the protocol without an external
//! simulator process. There are no vehicles here: only signal controllers
//! stepping through their programs, which is all a controlling client can
//! observe of traffic lights.

mod controller;
pub mod scenarios;

use std::collections::BTreeMap;

use log::{trace, warn};

use crate::connection::{Command, CommandKind, NetworkDescription, TlVariable, Transport, Value};
use crate::error::TransportError;
use crate::query::variables::{logic_from_record, logic_to_record};
use crate::signal::SignalState;

pub use controller::{ControllerRejection, SignalController};

/// Signal controllers making up one simulated network
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub name: String,
    controllers: Vec<SignalController>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controllers: Vec::new(),
        }
    }

    pub fn add_controller(&mut self, controller: SignalController) {
        self.controllers.push(controller);
    }

    pub fn controllers(&self) -> &[SignalController] {
        &self.controllers
    }

    pub fn network_description(&self) -> NetworkDescription {
        let mut network = NetworkDescription::new();
        for controller in &self.controllers {
            network.add_traffic_light(controller.id.clone(), controller.link_count());
        }
        network
    }
}

/// Simulator advancing fixed-time controllers one step at a time
#[derive(Debug)]
pub struct FixedTimeSimulator {
    step_length_ms: i64,
    time_ms: i64,
    controllers: BTreeMap<String, SignalController>,
    network: NetworkDescription,
    closed: bool,
}

impl FixedTimeSimulator {
    pub fn new(scenario: Scenario, step_length_ms: u32) -> Self {
        let step_length_ms = i64::from(step_length_ms);
        let network = scenario.network_description();
        let controllers = scenario
            .controllers
            .into_iter()
            .map(|mut controller| {
                controller.start(step_length_ms);
                (controller.id.clone(), controller)
            })
            .collect();

        Self {
            step_length_ms,
            time_ms: 0,
            controllers,
            network,
            closed: false,
        }
    }

    pub fn network_description(&self) -> NetworkDescription {
        self.network.clone()
    }

    pub fn time_ms(&self) -> i64 {
        self.time_ms
    }

    /// Closes the simulator; every later command fails
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn controller_mut(&mut self, id: &str) -> Result<&mut SignalController, TransportError> {
        self.controllers
            .get_mut(id)
            .ok_or_else(|| TransportError::UnknownEntity(id.to_owned()))
    }

    fn get_variable(&self, id: &str, variable: TlVariable) -> Result<Value, TransportError> {
        let controller = self
            .controllers
            .get(id)
            .ok_or_else(|| TransportError::UnknownEntity(id.to_owned()))?;

        let value = match variable {
            TlVariable::RedYellowGreenState => Value::Text(controller.current_state().to_code()),
            TlVariable::PhaseDuration => {
                Value::Integer(protocol_int(variable, controller.current_duration())?)
            }
            TlVariable::ControlledLinks => Value::LinkTable(controller.link_table()),
            TlVariable::CurrentPhase => {
                Value::Integer(protocol_int(variable, controller.phase_index() as i64)?)
            }
            TlVariable::CurrentProgram => Value::Text(controller.active_logic().sub_id.clone()),
            TlVariable::CompleteDefinition => Value::Logics(
                controller
                    .logics()
                    .iter()
                    .map(logic_to_record)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|err| TransportError::Rejected(err.to_string()))?,
            ),
            TlVariable::NextSwitch => {
                Value::Integer(protocol_int(variable, controller.next_switch())?)
            }
            TlVariable::PhaseIndex | TlVariable::Program | TlVariable::CompleteProgram => {
                return Err(TransportError::UnsupportedVariable(variable))
            }
        };
        Ok(value)
    }

    fn set_variable(
        &mut self,
        id: &str,
        variable: TlVariable,
        payload: Value,
    ) -> Result<Value, TransportError> {
        let now = self.time_ms;
        let controller = self.controller_mut(id)?;

        let outcome = match (variable, payload) {
            (TlVariable::RedYellowGreenState, Value::Text(code)) => {
                let state = SignalState::from_code(&code)
                    .map_err(|err| TransportError::Rejected(err.to_string()))?;
                controller.override_state(state)
            }
            (TlVariable::PhaseIndex, Value::Integer(index)) => controller.set_phase(index, now),
            (TlVariable::Program, Value::Text(sub_id)) => controller.set_program(&sub_id, now),
            (TlVariable::PhaseDuration, Value::Integer(ms)) => {
                controller.set_remaining_duration(ms, now)
            }
            (TlVariable::CompleteProgram, Value::Logics(mut records)) if records.len() == 1 => {
                let record = records
                    .pop()
                    .ok_or_else(|| TransportError::Rejected("missing logic".to_owned()))?;
                let logic = logic_from_record(record)
                    .map_err(|err| TransportError::Rejected(err.to_string()))?;
                controller.install_logic(logic, now)
            }
            (
                TlVariable::CurrentPhase
                | TlVariable::CurrentProgram
                | TlVariable::CompleteDefinition
                | TlVariable::ControlledLinks
                | TlVariable::NextSwitch,
                _,
            ) => return Err(TransportError::UnsupportedVariable(variable)),
            (_, payload) => {
                return Err(TransportError::Rejected(format!(
                    "{} payload not accepted for {:?}",
                    payload.kind(),
                    variable
                )))
            }
        };

        outcome.map_err(|rejection| {
            warn!("controller {:?} rejected {:?}: {}", id, variable, rejection);
            TransportError::Rejected(rejection.to_string())
        })?;
        Ok(Value::Empty)
    }
}

/// Integers on the wire are 32-bit; a value that does not fit is refused
fn protocol_int(variable: TlVariable, value: i64) -> Result<i32, TransportError> {
    i32::try_from(value).map_err(|_| {
        TransportError::Rejected(format!("{:?} value {} exceeds the 32-bit range", variable, value))
    })
}

impl Transport for FixedTimeSimulator {
    fn send_command(&mut self, command: Command) -> Result<Value, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        trace!("simulator at {} ms: {:?}", self.time_ms, command);

        match command.kind {
            CommandKind::GetVariable => self.get_variable(&command.entity_id, command.variable),
            CommandKind::SetVariable => {
                let payload = command.payload.ok_or_else(|| {
                    TransportError::Rejected("set command without payload".to_owned())
                })?;
                self.set_variable(&command.entity_id, command.variable, payload)
            }
        }
    }

    fn advance_simulated_time(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.time_ms += self.step_length_ms;
        for controller in self.controllers.values_mut() {
            controller.advance_to(self.time_ms);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> FixedTimeSimulator {
        FixedTimeSimulator::new(scenarios::cross3ltl().unwrap(), 500)
    }

    #[test]
    fn time_advances_by_the_step_length() {
        let mut sim = simulator();
        assert_eq!(sim.time_ms(), 0);
        sim.advance_simulated_time().unwrap();
        sim.advance_simulated_time().unwrap();
        assert_eq!(sim.time_ms(), 1000);
    }

    #[test]
    fn closed_simulator_refuses_everything() {
        let mut sim = simulator();
        sim.close();

        let get = Command::get("0", TlVariable::RedYellowGreenState);
        assert!(matches!(sim.send_command(get), Err(TransportError::Closed)));
        let set = Command::set("0", TlVariable::PhaseIndex, Value::Integer(1));
        assert!(matches!(sim.send_command(set), Err(TransportError::Closed)));
        assert!(matches!(
            sim.advance_simulated_time(),
            Err(TransportError::Closed)
        ));
        assert_eq!(sim.time_ms(), 0);
    }

    #[test]
    fn out_of_range_integers_are_refused() {
        assert_eq!(protocol_int(TlVariable::NextSwitch, 31_000).unwrap(), 31_000);
        assert!(matches!(
            protocol_int(TlVariable::NextSwitch, i64::from(i32::MAX) + 1),
            Err(TransportError::Rejected(_))
        ));
    }
}
