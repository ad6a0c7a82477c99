//! Real-time transport and timeline positions for audio engines.
//!
//! # Primary API
//!
//! - [`Position`]: a point on the timeline in ticks and frames
//! - [`TempoMap`] / [`SharedTempoMap`]: tick/frame conversion ratios
//! - [`Transport`]: playhead, loop, punch and play state
//! - [`TransportHandle`]: fluent control API
//! - [`SnapGrid`] / [`MusicalSnapGrid`]: snapping for positions
//!
//! # Threads
//!
//! The [`Transport`] is shared as an `Arc` between a control thread and the
//! audio thread. The audio thread calls [`Transport::process_requests`] at the
//! start of every cycle and [`Transport::advance_by_frames`] at the end; both
//! are lock-free and never allocate.
//!
//! # Example
//!
//! ```ignore
//! use cadence_core::*;
//! use std::sync::Arc;
//!
//! let tempo = Arc::new(SharedTempoMap::active(TempoMap::new(120.0, 44100.0)?));
//! let snap = Arc::new(MusicalSnapGrid::new(tempo.clone()));
//! let transport = Arc::new(Transport::new(TransportConfig::default(), tempo, snap)?);
//!
//! transport.request_roll(false);
//!
//! // audio thread
//! transport.process_requests();
//! transport.advance_by_frames(512);
//! ```

pub mod error;
pub use error::{Error, ParseError, Result};

pub mod config;
pub use config::TransportConfig;

pub(crate) mod transport;
pub use transport::{
    active_ratio, compare_frames, frames, Boundary, CycleSegment, CycleSegments, CycleSplit,
    FrameTickRatio, MusicalRatios, MusicalSnapGrid, MusicalTime, NoteLength, NoteType, PlayState,
    Position, RecordingMode, SavedPosition, SharedTempoMap, SnapContext, SnapGrid, SnapSettings,
    TempoMap, TempoProvider, TimeSignature, Transport, TransportHandle, TransportRequest,
    TransportState, TICKS_PER_QUARTER_NOTE, TICKS_PER_SIXTEENTH_NOTE,
};

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag, AtomicFrames, AtomicPosition};
