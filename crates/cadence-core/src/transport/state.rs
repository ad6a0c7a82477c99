//! Saved transport state.
//!
//! Positions are stored as ticks since frames depend on the tempo map in
//! effect when loading. The play state is never saved; a restored transport
//! is always paused.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fsm::RecordingMode;
use super::manager::Transport;
use super::position::Position;
use super::tempo_map::TempoProvider;

/// A saved position: a tick count, or a `bars.beats.sixteenths.ticks` literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedPosition {
    Ticks(f64),
    Musical(String),
}

impl SavedPosition {
    /// Anything unreadable comes back as zero.
    pub fn resolve(&self, field: &'static str, tempo: &dyn TempoProvider) -> Position {
        match self {
            SavedPosition::Ticks(ticks) if ticks.is_finite() => {
                Position::from_ticks(*ticks, tempo.frames_per_tick())
            }
            SavedPosition::Ticks(ticks) => {
                warn!(field, ticks, "non-finite saved position reset to zero");
                Position::ZERO
            }
            SavedPosition::Musical(text) => Position::parse(text, tempo).unwrap_or_else(|err| {
                warn!(field, %err, "malformed saved position reset to zero");
                Position::ZERO
            }),
        }
    }
}

impl Default for SavedPosition {
    fn default() -> Self {
        SavedPosition::Ticks(0.0)
    }
}

impl From<Position> for SavedPosition {
    fn from(pos: Position) -> Self {
        SavedPosition::Ticks(pos.ticks())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportState {
    pub playhead: SavedPosition,
    pub cue: SavedPosition,
    pub loop_start: SavedPosition,
    pub loop_end: SavedPosition,
    pub punch_in: SavedPosition,
    pub punch_out: SavedPosition,
    pub range_1: SavedPosition,
    pub range_2: SavedPosition,
    pub has_range: bool,
    pub loop_enabled: bool,
    pub punch_mode_enabled: bool,
    /// Record arm. Restoring it never starts a recording.
    pub recording_enabled: bool,
    pub metronome_enabled: bool,
    pub recording_mode: RecordingMode,
}

impl Transport {
    pub fn state(&self) -> TransportState {
        let (range_1, range_2) = self.range_endpoints();
        TransportState {
            playhead: self.playhead().into(),
            cue: self.cue_point().into(),
            loop_start: self.loop_start().into(),
            loop_end: self.loop_end().into(),
            punch_in: self.punch_in().into(),
            punch_out: self.punch_out().into(),
            range_1: range_1.into(),
            range_2: range_2.into(),
            has_range: self.has_range(),
            loop_enabled: self.loop_enabled(),
            punch_mode_enabled: self.punch_mode_enabled(),
            recording_enabled: self.recording_enabled(),
            metronome_enabled: self.metronome_enabled(),
            recording_mode: self.recording_mode(),
        }
    }

    /// Restore a saved state. Leaves the transport paused.
    pub fn restore(&self, state: &TransportState) {
        let tempo = &**self.tempo();

        self.reset_to_paused();

        self.set_loop_range(
            state.loop_start.resolve("loop_start", tempo),
            state.loop_end.resolve("loop_end", tempo),
        );
        self.set_punch_range(
            state.punch_in.resolve("punch_in", tempo),
            state.punch_out.resolve("punch_out", tempo),
        );
        self.set_cue_point(state.cue.resolve("cue", tempo));
        self.locate(state.playhead.resolve("playhead", tempo));

        self.set_range(
            state.range_1.resolve("range_1", tempo),
            state.range_2.resolve("range_2", tempo),
        );
        self.set_has_range(state.has_range);

        self.set_loop(state.loop_enabled);
        self.set_punch_mode(state.punch_mode_enabled);
        self.set_recording(state.recording_enabled);
        self.set_metronome(state.metronome_enabled);
        self.set_recording_mode(state.recording_mode);
    }
}
