//! Tolerance constants for timing tests.
//!
//! Frames are integers and compare exactly. Ticks are derived from frames
//! through a floating-point ratio and need a small epsilon.

/// Tick values recomputed from frames.
pub const TICK_EPSILON: f64 = 1e-6;

/// Milliseconds recomputed from ticks.
pub const MS_EPSILON: f64 = 1e-9;
