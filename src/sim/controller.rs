//! Fixed-time signal controller
//!
//! Standalone implementation of the controller side of the protocol: it runs
//! a set of logics phase by phase and answers variable reads and writes.

use log::debug;
use thiserror::Error;

use crate::connection::LaneTriple;
use crate::signal::{ControlledLinks, Logic, SignalState};

/// Why a controller refused a change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerRejection {
    #[error("phase index {0} out of range")]
    PhaseOutOfRange(i64),
    #[error("unknown program {0:?}")]
    UnknownProgram(String),
    #[error("negative duration {0}")]
    NegativeDuration(i32),
    #[error("state covers {found} links, controller has {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("program {0:?} has no phases")]
    EmptyLogic(String),
    #[error("controller has no program")]
    NoLogic,
    #[error("malformed state {0:?}")]
    MalformedState(String),
    #[error("switch time {0} ms does not fit the protocol's 32-bit time")]
    TimeOutOfRange(i64),
}

fn validate_logic(logic: &Logic, link_count: usize) -> Result<(), ControllerRejection> {
    if logic.phases.is_empty() {
        return Err(ControllerRejection::EmptyLogic(logic.sub_id.clone()));
    }
    if logic.current_phase_index >= logic.phases.len() {
        return Err(ControllerRejection::PhaseOutOfRange(
            logic.current_phase_index as i64,
        ));
    }
    for phase in &logic.phases {
        if phase.state.len() != link_count {
            return Err(ControllerRejection::WrongLength {
                expected: link_count,
                found: phase.state.len(),
            });
        }
    }
    Ok(())
}

/// A traffic light running fixed-time logics
#[derive(Debug, Clone)]
pub struct SignalController {
    pub id: String,
    links: ControlledLinks,
    logics: Vec<Logic>,
    /// Index into `logics` of the running logic
    active: usize,
    /// Index of the running phase within the active logic
    phase: usize,
    /// Absolute time (ms) of the next phase switch
    next_switch: i64,
    /// State forced from outside, held until the next switch
    override_state: Option<SignalState>,
}

impl SignalController {
    /// Creates a controller running the first of `logics`
    pub fn new(
        id: impl Into<String>,
        links: ControlledLinks,
        logics: Vec<Logic>,
    ) -> Result<Self, ControllerRejection> {
        if logics.is_empty() {
            return Err(ControllerRejection::NoLogic);
        }
        for logic in &logics {
            validate_logic(logic, links.len())?;
        }
        let phase = logics[0].current_phase_index;
        Ok(Self {
            id: id.into(),
            links,
            logics,
            active: 0,
            phase,
            next_switch: 0,
            override_state: None,
        })
    }

    /// Schedules the first switch; controllers only start counting once the
    /// first step has been taken
    pub(crate) fn start(&mut self, step_length_ms: i64) {
        let logic = &self.logics[self.active];
        self.phase = logic.current_phase_index;
        self.next_switch = step_length_ms + self.current_duration();
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn links(&self) -> &ControlledLinks {
        &self.links
    }

    pub fn active_logic(&self) -> &Logic {
        &self.logics[self.active]
    }

    pub fn phase_index(&self) -> usize {
        self.phase
    }

    pub fn next_switch(&self) -> i64 {
        self.next_switch
    }

    /// Duration of the running phase as defined by the logic
    pub fn current_duration(&self) -> i64 {
        i64::from(self.active_logic().phases[self.phase].duration)
    }

    pub fn current_state(&self) -> SignalState {
        self.override_state
            .clone()
            .unwrap_or_else(|| self.active_logic().phases[self.phase].state.clone())
    }

    pub fn link_table(&self) -> Vec<Vec<LaneTriple>> {
        self.links
            .links()
            .iter()
            .map(|links| {
                links
                    .iter()
                    .map(|link| {
                        [
                            link.incoming_lane.clone(),
                            link.across_lane.clone(),
                            link.outgoing_lane.clone(),
                        ]
                    })
                    .collect()
            })
            .collect()
    }

    /// Every logic, the running one reporting its live phase index
    pub fn logics(&self) -> Vec<Logic> {
        let mut logics = self.logics.clone();
        logics[self.active].current_phase_index = self.phase;
        logics
    }

    /// Switches phases until the schedule has caught up with `time_ms`
    pub(crate) fn advance_to(&mut self, time_ms: i64) {
        if self.active_logic().cycle_duration() <= 0 {
            return;
        }
        while self.next_switch <= time_ms {
            let phase_count = self.active_logic().phases.len();
            self.phase = (self.phase + 1) % phase_count;
            self.next_switch += self.current_duration();
            self.override_state = None;
            debug!(
                "controller {:?} switched to phase {} at {} ms",
                self.id, self.phase, time_ms
            );
        }
    }

    pub(crate) fn override_state(
        &mut self,
        state: SignalState,
    ) -> Result<(), ControllerRejection> {
        if state.len() != self.link_count() {
            return Err(ControllerRejection::WrongLength {
                expected: self.link_count(),
                found: state.len(),
            });
        }
        self.override_state = Some(state);
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, index: i32, now_ms: i64) -> Result<(), ControllerRejection> {
        let phase = usize::try_from(index)
            .ok()
            .filter(|phase| *phase < self.active_logic().phases.len())
            .ok_or(ControllerRejection::PhaseOutOfRange(i64::from(index)))?;
        self.phase = phase;
        self.next_switch = now_ms + self.current_duration();
        self.override_state = None;
        Ok(())
    }

    pub(crate) fn set_remaining_duration(
        &mut self,
        duration_ms: i32,
        now_ms: i64,
    ) -> Result<(), ControllerRejection> {
        if duration_ms < 0 {
            return Err(ControllerRejection::NegativeDuration(duration_ms));
        }
        let next_switch = now_ms + i64::from(duration_ms);
        if next_switch > i64::from(i32::MAX) {
            return Err(ControllerRejection::TimeOutOfRange(next_switch));
        }
        self.next_switch = next_switch;
        Ok(())
    }

    pub(crate) fn set_program(&mut self, sub_id: &str, now_ms: i64) -> Result<(), ControllerRejection> {
        let active = self
            .logics
            .iter()
            .position(|logic| logic.sub_id == sub_id)
            .ok_or_else(|| ControllerRejection::UnknownProgram(sub_id.to_owned()))?;
        self.activate(active, now_ms);
        Ok(())
    }

    /// Installs `logic`, replacing a logic with the same sub-ID, and runs it
    pub(crate) fn install_logic(&mut self, logic: Logic, now_ms: i64) -> Result<(), ControllerRejection> {
        validate_logic(&logic, self.link_count())?;

        let active = match self
            .logics
            .iter()
            .position(|existing| existing.sub_id == logic.sub_id)
        {
            Some(index) => {
                self.logics[index] = logic;
                index
            }
            None => {
                self.logics.push(logic);
                self.logics.len() - 1
            }
        };
        self.activate(active, now_ms);
        Ok(())
    }

    fn activate(&mut self, active: usize, now_ms: i64) {
        self.active = active;
        self.phase = self.logics[active].current_phase_index;
        self.next_switch = now_ms + self.current_duration();
        self.override_state = None;
        debug!(
            "controller {:?} running program {:?} from phase {}",
            self.id, self.logics[active].sub_id, self.phase
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{ControlledLink, Phase};

    fn two_link_controller(durations: [i32; 2]) -> SignalController {
        let links = ControlledLinks::new(vec![
            vec![ControlledLink::new("a_0", ":j_0_0", "b_0")],
            vec![ControlledLink::new("c_0", ":j_1_0", "d_0")],
        ]);
        let logic = Logic::new(
            "0",
            0,
            vec![
                Phase::new(durations[0], SignalState::from_code("Gr").unwrap()),
                Phase::new(durations[1], SignalState::from_code("rG").unwrap()),
            ],
        );
        SignalController::new("j", links, vec![logic]).unwrap()
    }

    #[test]
    fn switches_follow_the_schedule() {
        let mut controller = two_link_controller([3000, 2000]);
        controller.start(1000);
        assert_eq!(controller.next_switch(), 4000);

        controller.advance_to(3000);
        assert_eq!(controller.phase_index(), 0);
        controller.advance_to(4000);
        assert_eq!(controller.phase_index(), 1);
        controller.advance_to(6000);
        assert_eq!(controller.phase_index(), 0);
        assert_eq!(controller.next_switch(), 9000);
    }

    #[test]
    fn zero_length_cycle_never_switches() {
        let mut controller = two_link_controller([0, 0]);
        controller.start(1000);
        controller.advance_to(10_000);
        assert_eq!(controller.phase_index(), 0);
    }

    #[test]
    fn rejects_invalid_programs() {
        let links = ControlledLinks::new(vec![vec![], vec![]]);
        assert_eq!(
            SignalController::new("j", links.clone(), vec![]).unwrap_err(),
            ControllerRejection::NoLogic
        );

        let wrong = Logic::new("0", 0, vec![Phase::new(1000, SignalState::from_code("G").unwrap())]);
        assert_eq!(
            SignalController::new("j", links, vec![wrong]).unwrap_err(),
            ControllerRejection::WrongLength {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn remaining_duration_must_fit_protocol_time() {
        let mut controller = two_link_controller([3000, 2000]);
        controller.start(1000);
        assert_eq!(
            controller.set_remaining_duration(i32::MAX, 1000),
            Err(ControllerRejection::TimeOutOfRange(i64::from(i32::MAX) + 1000))
        );
        assert_eq!(controller.next_switch(), 4000);

        controller.set_remaining_duration(5000, 1000).unwrap();
        assert_eq!(controller.next_switch(), 6000);
    }

    #[test]
    fn override_is_dropped_on_switch() {
        let mut controller = two_link_controller([3000, 2000]);
        controller.start(1000);
        controller
            .override_state(SignalState::from_code("yy").unwrap())
            .unwrap();
        assert_eq!(controller.current_state().to_code(), "yy");

        controller.advance_to(4000);
        assert_eq!(controller.current_state().to_code(), "rG");
    }
}
