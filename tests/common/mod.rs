//! Shared fixtures: a cross3ltl simulator behind a transport that records
//! every dispatch and can be told to fail

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use traci_tls::connection::{Command, CommandKind, TlVariable, Value};
use traci_tls::sim::{scenarios, FixedTimeSimulator};
use traci_tls::{Connection, ConnectionConfig, Transport, TransportError};

#[derive(Clone, Default)]
pub struct Recorder {
    commands: Rc<RefCell<Vec<Command>>>,
    steps: Rc<Cell<usize>>,
    fail_steps: Rc<Cell<bool>>,
    fail_commands: Rc<Cell<bool>>,
    odd_acknowledgements: Rc<Cell<bool>>,
}

impl Recorder {
    pub fn dispatch_count(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn gets_of(&self, variable: TlVariable) -> usize {
        self.count(CommandKind::GetVariable, variable)
    }

    pub fn sets_of(&self, variable: TlVariable) -> usize {
        self.count(CommandKind::SetVariable, variable)
    }

    fn count(&self, kind: CommandKind, variable: TlVariable) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|command| command.kind == kind && command.variable == variable)
            .count()
    }

    pub fn steps(&self) -> usize {
        self.steps.get()
    }

    pub fn fail_steps(&self, fail: bool) {
        self.fail_steps.set(fail);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.set(fail);
    }

    /// Applied set commands answer with an integer instead of an empty acknowledgement
    pub fn odd_acknowledgements(&self, odd: bool) {
        self.odd_acknowledgements.set(odd);
    }
}

pub struct RecordingTransport {
    inner: FixedTimeSimulator,
    recorder: Recorder,
}

fn broken_pipe() -> TransportError {
    TransportError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "simulator went away"))
}

impl Transport for RecordingTransport {
    fn send_command(&mut self, command: Command) -> Result<Value, TransportError> {
        if self.recorder.fail_commands.get() {
            return Err(broken_pipe());
        }
        self.recorder.commands.borrow_mut().push(command.clone());
        let is_set = command.kind == CommandKind::SetVariable;
        let response = self.inner.send_command(command)?;
        if is_set && self.recorder.odd_acknowledgements.get() {
            return Ok(Value::Integer(0));
        }
        Ok(response)
    }

    fn advance_simulated_time(&mut self) -> Result<(), TransportError> {
        if self.recorder.fail_steps.get() {
            return Err(broken_pipe());
        }
        self.recorder.steps.set(self.recorder.steps.get() + 1);
        self.inner.advance_simulated_time()
    }
}

/// Opens a connection to a fresh cross3ltl simulation
pub fn connect() -> (Connection, Recorder) {
    let scenario = scenarios::cross3ltl().expect("cross3ltl scenario is valid");
    let simulator = FixedTimeSimulator::new(scenario, 1000);
    let network = simulator.network_description();
    let recorder = Recorder::default();
    let transport = RecordingTransport {
        inner: simulator,
        recorder: recorder.clone(),
    };
    let connection = Connection::new(transport, network, ConnectionConfig::default());
    (connection, recorder)
}
