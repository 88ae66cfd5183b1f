//! Boundary contract with the simulator transport
//!
//! The byte-level wire encoding lives behind [`Transport`]; this side only
//! sees typed commands and typed values.

use crate::error::TransportError;

/// Traffic-light variables understood by the simulator
///
/// Get-side and set-side identifiers are distinct where the protocol uses
/// distinct numbers for reading and changing the same quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlVariable {
    /// Current red/yellow/green state string (get and set)
    RedYellowGreenState,
    /// Duration of the current phase (get), remaining duration (set)
    PhaseDuration,
    ControlledLinks,
    CurrentPhase,
    CurrentProgram,
    CompleteDefinition,
    NextSwitch,
    PhaseIndex,
    Program,
    CompleteProgram,
}

impl TlVariable {
    /// Protocol identifier of this variable
    pub fn id(self) -> u8 {
        match self {
            TlVariable::RedYellowGreenState => 0x20,
            TlVariable::PhaseIndex => 0x22,
            TlVariable::Program => 0x23,
            TlVariable::PhaseDuration => 0x24,
            TlVariable::ControlledLinks => 0x25,
            TlVariable::CurrentPhase => 0x28,
            TlVariable::CurrentProgram => 0x29,
            TlVariable::CompleteDefinition => 0x2b,
            TlVariable::CompleteProgram => 0x2c,
            TlVariable::NextSwitch => 0x2d,
        }
    }
}

/// Direction of a variable command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    GetVariable,
    SetVariable,
}

impl CommandKind {
    /// Protocol command identifier for the traffic-light domain
    pub fn id(self) -> u8 {
        match self {
            CommandKind::GetVariable => 0xa2,
            CommandKind::SetVariable => 0xc2,
        }
    }
}

/// One request sent to the simulator
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub entity_id: String,
    pub variable: TlVariable,
    pub payload: Option<Value>,
}

impl Command {
    pub fn get(entity_id: impl Into<String>, variable: TlVariable) -> Self {
        Self {
            kind: CommandKind::GetVariable,
            entity_id: entity_id.into(),
            variable,
            payload: None,
        }
    }

    pub fn set(entity_id: impl Into<String>, variable: TlVariable, payload: Value) -> Self {
        Self {
            kind: CommandKind::SetVariable,
            entity_id: entity_id.into(),
            variable,
            payload: Some(payload),
        }
    }
}

/// Lane identifiers of one link: incoming, across, outgoing
pub type LaneTriple = [String; 3];

/// Phase as carried by the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseRecord {
    pub duration: i32,
    pub state: String,
}

/// Logic as carried by the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicRecord {
    pub sub_id: String,
    pub current_phase: i32,
    pub phases: Vec<PhaseRecord>,
}

/// Typed values exchanged with the simulator
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Acknowledgement without a payload
    Empty,
    Integer(i32),
    Text(String),
    LinkTable(Vec<Vec<LaneTriple>>),
    Logics(Vec<LogicRecord>),
}

impl Value {
    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Integer(_) => "integer",
            Value::Text(_) => "text",
            Value::LinkTable(_) => "link table",
            Value::Logics(_) => "logics",
        }
    }
}

/// Synchronous request/response channel to the simulator
///
/// One command is outstanding at a time; each call blocks until the
/// simulator answers or the channel fails.
pub trait Transport {
    fn send_command(&mut self, command: Command) -> Result<Value, TransportError>;

    /// Advances simulated time by exactly one tick
    fn advance_simulated_time(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_command(&mut self, command: Command) -> Result<Value, TransportError> {
        (**self).send_command(command)
    }

    fn advance_simulated_time(&mut self) -> Result<(), TransportError> {
        (**self).advance_simulated_time()
    }
}
