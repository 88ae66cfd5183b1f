//! Static structure of signal programs: phases, logics and programs

use crate::error::{Error, Result};

use super::light_state::SignalState;

/// A fixed-duration interval holding one signal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    /// Duration in milliseconds of simulated time
    pub duration: i32,
    pub state: SignalState,
}

impl Phase {
    pub fn new(duration: i32, state: SignalState) -> Self {
        Self { duration, state }
    }
}

/// One complete phase program of a signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logic {
    pub sub_id: String,
    pub current_phase_index: usize,
    pub phases: Vec<Phase>,
}

impl Logic {
    pub fn new(sub_id: impl Into<String>, current_phase_index: usize, phases: Vec<Phase>) -> Self {
        Self {
            sub_id: sub_id.into(),
            current_phase_index,
            phases,
        }
    }

    /// Total length of one cycle in milliseconds
    pub fn cycle_duration(&self) -> i64 {
        self.phases.iter().map(|phase| i64::from(phase.duration)).sum()
    }

    /// Checks every phase state against the signal's link count
    pub fn check_link_count(&self, link_count: usize) -> Result<()> {
        for phase in &self.phases {
            phase.state.check_len("phase state", link_count)?;
        }
        Ok(())
    }

    /// Fails unless the active phase index points into the phase list
    pub fn check_phase_index(&self) -> Result<()> {
        if self.current_phase_index >= self.phases.len() {
            return Err(Error::PhaseOutOfRange {
                index: self.current_phase_index,
                phase_count: self.phases.len(),
            });
        }
        Ok(())
    }
}

/// Every logic defined for one signal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    logics: Vec<Logic>,
}

impl Program {
    pub fn new(logics: Vec<Logic>) -> Self {
        Self { logics }
    }

    /// Builds a program and checks every phase against the signal's link count
    pub fn with_link_count(logics: Vec<Logic>, link_count: usize) -> Result<Self> {
        for logic in &logics {
            logic.check_link_count(link_count)?;
        }
        Ok(Self { logics })
    }

    pub fn logics(&self) -> &[Logic] {
        &self.logics
    }

    pub fn logic(&self, sub_id: &str) -> Option<&Logic> {
        self.logics.iter().find(|logic| logic.sub_id == sub_id)
    }

    /// Number of links every phase state must cover, if the program has any phase
    pub fn link_count(&self) -> Option<usize> {
        self.logics
            .iter()
            .flat_map(|logic| logic.phases.iter())
            .map(|phase| phase.state.len())
            .next()
    }
}

impl From<Logic> for Program {
    fn from(logic: Logic) -> Self {
        Self::new(vec![logic])
    }
}

