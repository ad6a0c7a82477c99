//! # Cadence - Sample-accurate Transport and Timing
//!
//! Timing core for a DAW-style audio engine.
//!
//! ## Architecture
//!
//! Cadence is an umbrella crate over:
//! - **cadence-core** - Positions, tempo map, snap grid and the real-time
//!   transport (play state, loop, punch, pre-roll and count-in)
//!
//! [`CadenceEngine`] wires them together and drives one audio cycle at a time.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cadence::prelude::*;
//!
//! let engine = CadenceEngine::builder()
//!     .sample_rate(44100.0)
//!     .bpm(120.0)
//!     .build()?;
//!
//! let start = engine.parse_position("1.1.1.0")?;
//! let end = engine.parse_position("3.1.1.0")?;
//! engine.transport()
//!     .loop_range(start, end)
//!     .enable_loop()
//!     .play();
//!
//! // Audio callback
//! engine.run_cycle(512, |segment| { /* render */ });
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default) - Blocking waits for the audio thread to acknowledge
//!   roll and pause requests

/// Re-export of cadence-core for direct access
pub use cadence_core as core;

pub use cadence_core::{
    // Positions
    compare_frames,
    frames,
    Boundary,
    // Transport
    CycleSegment,
    CycleSegments,
    CycleSplit,
    // Lock-free primitives
    AtomicDouble,
    AtomicFlag,
    AtomicFrames,
    AtomicPosition,
    FrameTickRatio,
    MusicalRatios,
    // Snapping
    MusicalSnapGrid,
    MusicalTime,
    NoteLength,
    NoteType,
    ParseError,
    PlayState,
    Position,
    RecordingMode,
    SavedPosition,
    // Tempo
    SharedTempoMap,
    SnapContext,
    SnapGrid,
    SnapSettings,
    TempoMap,
    TempoProvider,
    TimeSignature,
    Transport,
    TransportConfig,
    TransportHandle,
    TransportRequest,
    TransportState,
    TICKS_PER_QUARTER_NOTE,
    TICKS_PER_SIXTEENTH_NOTE,
};

mod error;
pub use error::{Error, Result};

mod builder;
mod engine;

pub use builder::CadenceEngineBuilder;
pub use engine::{CadenceEngine, Segment};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{CadenceEngine, CadenceEngineBuilder, Segment};

    // Essential types
    pub use crate::core::{MusicalTime, Position, TempoProvider};

    // Transport
    pub use crate::core::{PlayState, RecordingMode, TransportHandle};

    // Snapping
    pub use crate::core::{NoteLength, NoteType, SnapSettings};
}
