//! Error types for cadence-core.

use thiserror::Error;

/// Error type for cadence-core operations.
///
/// Only control-thread entry points return these. The real-time path never
/// fails: frame arithmetic is total and inconsistencies are clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid {what}: {value}")]
    InvalidRange { what: &'static str, value: f64 },

    #[error("Invalid tempo: {0}. Must be between 1.0 and 999.0 BPM")]
    InvalidTempo(f64),

    #[error("Invalid time signature: {numerator}/{denominator}")]
    InvalidTimeSignature { numerator: u32, denominator: u32 },

    #[error("Invalid position: {0}")]
    Parse(#[from] ParseError),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from parsing a `bars.beats.sixteenths.ticks` literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty position string")]
    Empty,

    #[error("expected 4 dot-separated fields, found {0}")]
    FieldCount(usize),

    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidField { field: &'static str, value: String },
}
