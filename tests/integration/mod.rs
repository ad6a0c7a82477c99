//! Integration test modules for Cadence
//!
//! Test categories:
//! - engine: Builder wiring, tempo changes, cycle contract
//! - transport: Play/pause/seek/loop through whole audio cycles
//! - recording: Pre-roll, count-in, punch and the playhead lock
//! - persistence: Saving and restoring transport state

pub mod engine;
pub mod persistence;
pub mod recording;
pub mod transport;
