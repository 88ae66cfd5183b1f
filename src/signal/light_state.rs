//! Light states and their single-character encoding

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// State of one controlled link of a traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightState {
    Red,
    Yellow,
    /// Green, but vehicles must decelerate (a higher priority stream exists)
    Green,
    /// Priority green: no mandatory deceleration on approach
    GreenNoDecel,
}

impl LightState {
    pub const ALL: [LightState; 4] = [
        LightState::Red,
        LightState::Yellow,
        LightState::Green,
        LightState::GreenNoDecel,
    ];

    /// Canonical code of this state
    pub fn code(self) -> char {
        match self {
            LightState::Red => 'r',
            LightState::Yellow => 'y',
            LightState::Green => 'g',
            LightState::GreenNoDecel => 'G',
        }
    }

    /// Decodes one canonical code
    pub fn from_code(code: char) -> Result<Self> {
        Self::decode_at(code, 0)
    }

    fn decode_at(code: char, position: usize) -> Result<Self> {
        match code {
            'r' => Ok(LightState::Red),
            'y' => Ok(LightState::Yellow),
            'g' => Ok(LightState::Green),
            'G' => Ok(LightState::GreenNoDecel),
            _ => Err(Error::MalformedCode { code, position }),
        }
    }
}

impl TryFrom<char> for LightState {
    type Error = Error;

    fn try_from(code: char) -> Result<Self> {
        LightState::from_code(code)
    }
}

impl From<LightState> for char {
    fn from(state: LightState) -> char {
        state.code()
    }
}

/// The light states of every controlled link of one signal, in link-index order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalState {
    lights: Vec<LightState>,
}

impl SignalState {
    pub fn new(lights: Vec<LightState>) -> Self {
        Self { lights }
    }

    /// Decodes a code string, one character per controlled link
    pub fn from_code(code: &str) -> Result<Self> {
        let lights = code
            .chars()
            .enumerate()
            .map(|(position, c)| LightState::decode_at(c, position))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lights })
    }

    pub fn to_code(&self) -> String {
        self.lights.iter().map(|light| light.code()).collect()
    }

    pub fn light_states(&self) -> &[LightState] {
        &self.lights
    }

    pub fn get(&self, link_index: usize) -> Option<LightState> {
        self.lights.get(link_index).copied()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Fails with `LengthMismatch` unless this state covers exactly `expected` links
    pub fn check_len(&self, what: &'static str, expected: usize) -> Result<()> {
        if self.lights.len() != expected {
            return Err(Error::LengthMismatch {
                what,
                expected,
                found: self.lights.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<LightState>> for SignalState {
    fn from(lights: Vec<LightState>) -> Self {
        Self::new(lights)
    }
}

impl FromStr for SignalState {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self> {
        SignalState::from_code(code)
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}
