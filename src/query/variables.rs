//! Traffic-light variables and their value codecs
//!
//! Each marker names one protocol variable and converts between the
//! protocol's [`Value`] and the domain type a query hands out or accepts.
//! Decoders check every state against the signal's link count.

use crate::connection::{LogicRecord, PhaseRecord, TlVariable, Value};
use crate::error::{Error, Result, TransportError};
use crate::signal::{ControlledLink, ControlledLinks, Logic, Phase, Program, SignalState};

/// A variable that can be read
pub trait ReadVariable {
    type Output: Clone;

    const VARIABLE: TlVariable;

    fn decode(value: Value, link_count: usize) -> Result<Self::Output>;
}

/// A variable that can be written
pub trait WriteVariable {
    type Input;

    const VARIABLE: TlVariable;

    fn encode(input: &Self::Input, link_count: usize) -> Result<Value>;
}

fn unexpected(variable: TlVariable, expected: &str, value: &Value) -> Error {
    TransportError::UnexpectedResponse {
        variable,
        detail: format!("expected {}, got {}", expected, value.kind()),
    }
    .into()
}

fn expect_integer(variable: TlVariable, value: Value) -> Result<i32> {
    match value {
        Value::Integer(v) => Ok(v),
        other => Err(unexpected(variable, "integer", &other)),
    }
}

fn expect_text(variable: TlVariable, value: Value) -> Result<String> {
    match value {
        Value::Text(v) => Ok(v),
        other => Err(unexpected(variable, "text", &other)),
    }
}

/// Converts a protocol logic into the domain model
///
/// Phase state lengths are left to the caller.
pub(crate) fn logic_from_record(record: LogicRecord) -> Result<Logic> {
    let current_phase_index =
        usize::try_from(record.current_phase).map_err(|_| TransportError::UnexpectedResponse {
            variable: TlVariable::CompleteDefinition,
            detail: format!("negative phase index {}", record.current_phase),
        })?;
    let phases = record
        .phases
        .into_iter()
        .map(|phase| Ok(Phase::new(phase.duration, SignalState::from_code(&phase.state)?)))
        .collect::<Result<Vec<_>>>()?;
    let logic = Logic::new(record.sub_id, current_phase_index, phases);
    logic.check_phase_index()?;
    Ok(logic)
}

pub(crate) fn logic_to_record(logic: &Logic) -> Result<LogicRecord> {
    let current_phase =
        i32::try_from(logic.current_phase_index).map_err(|_| Error::PhaseOutOfRange {
            index: logic.current_phase_index,
            phase_count: logic.phases.len(),
        })?;
    Ok(LogicRecord {
        sub_id: logic.sub_id.clone(),
        current_phase,
        phases: logic
            .phases
            .iter()
            .map(|phase| PhaseRecord {
                duration: phase.duration,
                state: phase.state.to_code(),
            })
            .collect(),
    })
}

/// Current red/yellow/green state
#[derive(Debug)]
pub struct RedYellowGreenState;

impl ReadVariable for RedYellowGreenState {
    type Output = SignalState;

    const VARIABLE: TlVariable = TlVariable::RedYellowGreenState;

    fn decode(value: Value, link_count: usize) -> Result<SignalState> {
        let state = SignalState::from_code(&expect_text(Self::VARIABLE, value)?)?;
        state.check_len("current state", link_count)?;
        Ok(state)
    }
}

/// Duration of the current phase in milliseconds
#[derive(Debug)]
pub struct PhaseDuration;

impl ReadVariable for PhaseDuration {
    type Output = i32;

    const VARIABLE: TlVariable = TlVariable::PhaseDuration;

    fn decode(value: Value, _link_count: usize) -> Result<i32> {
        expect_integer(Self::VARIABLE, value)
    }
}

#[derive(Debug)]
pub struct ControlledLinksTable;

impl ReadVariable for ControlledLinksTable {
    type Output = ControlledLinks;

    const VARIABLE: TlVariable = TlVariable::ControlledLinks;

    fn decode(value: Value, link_count: usize) -> Result<ControlledLinks> {
        let table = match value {
            Value::LinkTable(table) => table,
            other => return Err(unexpected(Self::VARIABLE, "link table", &other)),
        };
        let links = table
            .into_iter()
            .map(|lanes| {
                lanes
                    .into_iter()
                    .map(|[incoming, across, outgoing]| {
                        ControlledLink::new(incoming, across, outgoing)
                    })
                    .collect()
            })
            .collect();
        ControlledLinks::with_link_count(links, link_count)
    }
}

/// Every logic of the signal
#[derive(Debug)]
pub struct CompleteDefinition;

impl ReadVariable for CompleteDefinition {
    type Output = Program;

    const VARIABLE: TlVariable = TlVariable::CompleteDefinition;

    fn decode(value: Value, link_count: usize) -> Result<Program> {
        let records = match value {
            Value::Logics(records) => records,
            other => return Err(unexpected(Self::VARIABLE, "logics", &other)),
        };
        let logics = records
            .into_iter()
            .map(logic_from_record)
            .collect::<Result<Vec<_>>>()?;
        Program::with_link_count(logics, link_count)
    }
}

/// Index of the active phase within the active logic
#[derive(Debug)]
pub struct CurrentPhaseIndex;

impl ReadVariable for CurrentPhaseIndex {
    type Output = i32;

    const VARIABLE: TlVariable = TlVariable::CurrentPhase;

    fn decode(value: Value, _link_count: usize) -> Result<i32> {
        expect_integer(Self::VARIABLE, value)
    }
}

/// Sub-ID of the active logic
#[derive(Debug)]
pub struct CurrentProgram;

impl ReadVariable for CurrentProgram {
    type Output = String;

    const VARIABLE: TlVariable = TlVariable::CurrentProgram;

    fn decode(value: Value, _link_count: usize) -> Result<String> {
        expect_text(Self::VARIABLE, value)
    }
}

/// Absolute simulated time (ms) of the next scheduled switch
#[derive(Debug)]
pub struct NextSwitch;

impl ReadVariable for NextSwitch {
    type Output = i32;

    const VARIABLE: TlVariable = TlVariable::NextSwitch;

    fn decode(value: Value, _link_count: usize) -> Result<i32> {
        expect_integer(Self::VARIABLE, value)
    }
}

/// Overrides the current state
#[derive(Debug)]
pub struct SetRedYellowGreenState;

impl WriteVariable for SetRedYellowGreenState {
    type Input = SignalState;

    const VARIABLE: TlVariable = TlVariable::RedYellowGreenState;

    fn encode(input: &SignalState, link_count: usize) -> Result<Value> {
        input.check_len("new state", link_count)?;
        Ok(Value::Text(input.to_code()))
    }
}

#[derive(Debug)]
pub struct SetPhaseIndex;

impl WriteVariable for SetPhaseIndex {
    type Input = i32;

    const VARIABLE: TlVariable = TlVariable::PhaseIndex;

    fn encode(input: &i32, _link_count: usize) -> Result<Value> {
        Ok(Value::Integer(*input))
    }
}

/// Activates another logic by sub-ID
#[derive(Debug)]
pub struct SetProgram;

impl WriteVariable for SetProgram {
    type Input = String;

    const VARIABLE: TlVariable = TlVariable::Program;

    fn encode(input: &String, _link_count: usize) -> Result<Value> {
        Ok(Value::Text(input.clone()))
    }
}

/// Remaining duration of the current phase in milliseconds
#[derive(Debug)]
pub struct SetPhaseDuration;

impl WriteVariable for SetPhaseDuration {
    type Input = i32;

    const VARIABLE: TlVariable = TlVariable::PhaseDuration;

    fn encode(input: &i32, _link_count: usize) -> Result<Value> {
        Ok(Value::Integer(*input))
    }
}

/// Installs a logic and makes it active
#[derive(Debug)]
pub struct SetCompleteProgram;

impl WriteVariable for SetCompleteProgram {
    type Input = Logic;

    const VARIABLE: TlVariable = TlVariable::CompleteProgram;

    fn encode(input: &Logic, link_count: usize) -> Result<Value> {
        input.check_link_count(link_count)?;
        input.check_phase_index()?;
        Ok(Value::Logics(vec![logic_to_record(input)?]))
    }
}
