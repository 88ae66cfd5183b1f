//! Built-in scenarios
//!
//! `cross3ltl` is a four-way junction with three incoming lanes per arm and
//! a single traffic light, `"0"`, controlling sixteen links through an
//! eight-phase fixed-time program.

use crate::signal::{ControlledLink, ControlledLinks, Logic, Phase, SignalState};

use super::{ControllerRejection, Scenario, SignalController};

/// Names accepted by [`by_name`]
pub const SCENARIO_NAMES: &[&str] = &["cross3ltl"];

/// Phase durations of the cross3ltl program, in seconds
pub const CROSS3LTL_DURATIONS_S: [i32; 8] = [31, 4, 6, 4, 31, 4, 6, 4];

/// Phase states of the cross3ltl program
pub const CROSS3LTL_PHASES: [&str; 8] = [
    "GGggrrrrGGggrrrr",
    "yyggrrrryyggrrrr",
    "rrGGrrrrrrGGrrrr",
    "rryyrrrrrryyrrrr",
    "rrrrGGggrrrrGGgg",
    "rrrryyggrrrryygg",
    "rrrrrrGGrrrrrrGG",
    "rrrrrryyrrrrrryy",
];

/// Incoming, across and outgoing lane of every cross3ltl link
pub const CROSS3LTL_LINKS: [[&str; 3]; 16] = [
    ["4si_0", ":0_0_0", "1o_0"],
    ["4si_1", ":0_1_0", "3o_0"],
    ["4si_2", ":0_2_0", "2o_0"],
    ["4si_2", ":0_3_0", "4o_0"],
    ["2si_0", ":0_4_0", "4o_0"],
    ["2si_1", ":0_5_0", "1o_0"],
    ["2si_2", ":0_6_0", "3o_0"],
    ["2si_2", ":0_7_0", "2o_0"],
    ["3si_0", ":0_8_0", "2o_0"],
    ["3si_1", ":0_9_0", "4o_0"],
    ["3si_2", ":0_10_0", "1o_0"],
    ["3si_2", ":0_11_0", "3o_0"],
    ["1si_0", ":0_12_0", "3o_0"],
    ["1si_1", ":0_13_0", "2o_0"],
    ["1si_2", ":0_14_0", "4o_0"],
    ["1si_2", ":0_15_0", "1o_0"],
];

/// Looks a built-in scenario up by name
pub fn by_name(name: &str) -> Option<Result<Scenario, ControllerRejection>> {
    match name {
        "cross3ltl" => Some(cross3ltl()),
        _ => None,
    }
}

pub fn cross3ltl() -> Result<Scenario, ControllerRejection> {
    let links = ControlledLinks::new(
        CROSS3LTL_LINKS
            .iter()
            .map(|[incoming, across, outgoing]| {
                vec![ControlledLink::new(*incoming, *across, *outgoing)]
            })
            .collect(),
    );

    let phases = CROSS3LTL_PHASES
        .iter()
        .zip(CROSS3LTL_DURATIONS_S)
        .map(|(code, seconds)| {
            let state = SignalState::from_code(code)
                .map_err(|_| ControllerRejection::MalformedState(code.to_string()))?;
            Ok(Phase::new(seconds * 1000, state))
        })
        .collect::<Result<Vec<_>, ControllerRejection>>()?;

    let mut scenario = Scenario::new("cross3ltl");
    scenario.add_controller(SignalController::new(
        "0",
        links,
        vec![Logic::new("0", 0, phases)],
    )?);
    Ok(scenario)
}
