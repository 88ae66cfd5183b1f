//! Error types for the traffic-light client
//!
//! Every failure surfaces to the immediate caller. Nothing is retried.

use thiserror::Error;

use crate::connection::TlVariable;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the query layer and the signal model
#[derive(Debug, Error)]
pub enum Error {
    /// A character outside the four canonical light codes was decoded
    #[error("malformed light state code {code:?} at position {position}")]
    MalformedCode { code: char, position: usize },

    /// The requested traffic light is not part of the network description
    #[error("traffic light {id:?} not found")]
    NotFound { id: String },

    /// The boundary transport failed; propagated unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A signal state or link table disagrees with the signal's link count
    #[error("{what}: expected {expected} controlled links, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A logic's active phase index does not point into its phase list
    #[error("phase index {index} out of range for {phase_count} phases")]
    PhaseOutOfRange { index: usize, phase_count: usize },

    /// `run()` was called on a write query before any value was staged
    #[error("no value staged for {variable:?}")]
    NoValueStaged { variable: TlVariable },
}

/// Failures of the boundary transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection to the simulator is closed")]
    Closed,

    #[error("simulator does not know entity {0:?}")]
    UnknownEntity(String),

    #[error("variable {0:?} is not supported for this command")]
    UnsupportedVariable(TlVariable),

    #[error("simulator rejected command: {0}")]
    Rejected(String),

    #[error("unexpected response for {variable:?}: {detail}")]
    UnexpectedResponse {
        variable: TlVariable,
        detail: String,
    },

    #[error("transport I/O failure")]
    Io(#[from] std::io::Error),
}
