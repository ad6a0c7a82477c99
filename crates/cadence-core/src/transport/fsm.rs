//! Play-state machine.
//!
//! The control thread only ever *requests* a state; the audio thread
//! acknowledges it at the start of its next cycle. Keeping both directions in
//! one transition function makes illegal moves unrepresentable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    RollRequested,
    Rolling,
    PauseRequested,
    #[default]
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportRequest {
    Roll,
    Pause,
    /// Sent by the audio thread to commit a pending request.
    Acknowledge,
}

impl PlayState {
    /// Next state for `request`, or `None` when the request is a no-op here.
    #[inline]
    pub fn transition(self, request: TransportRequest) -> Option<PlayState> {
        use PlayState::*;
        use TransportRequest::*;

        match (self, request) {
            (Paused | PauseRequested, Roll) => Some(RollRequested),
            (Rolling | RollRequested, Pause) => Some(PauseRequested),
            (RollRequested, Acknowledge) => Some(Rolling),
            (PauseRequested, Acknowledge) => Some(Paused),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, PlayState::RollRequested | PlayState::PauseRequested)
    }

    #[inline]
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            PlayState::RollRequested => 0,
            PlayState::Rolling => 1,
            PlayState::PauseRequested => 2,
            PlayState::Paused => 3,
        }
    }

    #[inline]
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => PlayState::RollRequested,
            1 => PlayState::Rolling,
            2 => PlayState::PauseRequested,
            _ => PlayState::Paused,
        }
    }
}

/// How a recording pass treats material already on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordingMode {
    OverwriteEvents,
    MergeEvents,
    #[default]
    Takes,
    /// New takes, with previous takes muted.
    TakesMuted,
}

impl RecordingMode {
    #[inline]
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            RecordingMode::OverwriteEvents => 0,
            RecordingMode::MergeEvents => 1,
            RecordingMode::Takes => 2,
            RecordingMode::TakesMuted => 3,
        }
    }

    #[inline]
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => RecordingMode::OverwriteEvents,
            1 => RecordingMode::MergeEvents,
            3 => RecordingMode::TakesMuted,
            _ => RecordingMode::Takes,
        }
    }
}
