//! Centralized error type for the cadence umbrella crate.
//!
//! Wraps core errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cadence_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
