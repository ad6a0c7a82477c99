pub(crate) mod fsm;
pub(crate) mod handle;
pub(crate) mod manager;
pub(crate) mod position;
pub(crate) mod snap_grid;
pub(crate) mod state;
pub(crate) mod tempo_map;
#[cfg(feature = "std")]
mod ack;

// Re-export essential types
pub use fsm::{PlayState, RecordingMode, TransportRequest};
pub use handle::TransportHandle;
pub use manager::{CycleSegment, CycleSegments, CycleSplit, Transport};
pub use position::{compare_frames, frames, Boundary, MusicalTime, Position};
pub use snap_grid::{MusicalSnapGrid, NoteLength, NoteType, SnapContext, SnapGrid, SnapSettings};
pub use state::{SavedPosition, TransportState};
pub use tempo_map::{
    active_ratio, FrameTickRatio, MusicalRatios, SharedTempoMap, TempoMap, TempoProvider,
    TimeSignature, TICKS_PER_QUARTER_NOTE, TICKS_PER_SIXTEENTH_NOTE,
};
