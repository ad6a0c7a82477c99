//! Fluent API handle for transport control.

use std::sync::Arc;

use super::fsm::{PlayState, RecordingMode};
use super::manager::Transport;
use super::position::Position;

/// Fluent API handle for transport control.
///
/// # Example
/// ```ignore
/// engine.transport()
///     .loop_range(start, end)
///     .enable_loop()
///     .metronome(true)
///     .play();
/// ```
#[derive(Clone)]
pub struct TransportHandle {
    transport: Arc<Transport>,
}

impl TransportHandle {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Request playback without waiting for the audio thread.
    pub fn play(self) -> Self {
        self.transport.request_roll(false);
        self
    }

    /// Request playback and block until the audio thread has started.
    pub fn play_and_wait(self) -> Self {
        self.transport.request_roll(true);
        self
    }

    pub fn pause(self) -> Self {
        self.transport.request_pause(false);
        self
    }

    pub fn pause_and_wait(self) -> Self {
        self.transport.request_pause(true);
        self
    }

    /// Move the playhead and the cue point. Ignored while recording.
    pub fn seek(self, pos: Position) -> Self {
        self.transport.move_to_target(pos, true);
        self
    }

    pub fn cue(self, pos: Position) -> Self {
        self.transport.set_cue_point(pos);
        self
    }

    pub fn forward(self) -> Self {
        self.transport.move_forward();
        self
    }

    pub fn backward(self) -> Self {
        self.transport.move_backward();
        self
    }

    pub fn loop_range(self, start: Position, end: Position) -> Self {
        self.transport.set_loop_range(start, end);
        self
    }

    pub fn enable_loop(self) -> Self {
        self.transport.set_loop(true);
        self
    }

    pub fn disable_loop(self) -> Self {
        self.transport.set_loop(false);
        self
    }

    pub fn punch_range(self, start: Position, end: Position) -> Self {
        self.transport.set_punch_range(start, end);
        self
    }

    pub fn punch(self, enabled: bool) -> Self {
        self.transport.set_punch_mode(enabled);
        self
    }

    pub fn record(self, enabled: bool) -> Self {
        self.transport.set_recording(enabled);
        self
    }

    pub fn recording_mode(self, mode: RecordingMode) -> Self {
        self.transport.set_recording_mode(mode);
        self
    }

    pub fn metronome(self, enabled: bool) -> Self {
        self.transport.set_metronome(enabled);
        self
    }

    pub fn range(self, first: Position, second: Position) -> Self {
        self.transport.set_range(first, second);
        self
    }

    pub fn clear_range(self) -> Self {
        self.transport.clear_range();
        self
    }

    pub fn play_state(&self) -> PlayState {
        self.transport.play_state()
    }

    pub fn is_rolling(&self) -> bool {
        self.transport.is_rolling()
    }

    pub fn playhead(&self) -> Position {
        self.transport.playhead()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }
}
