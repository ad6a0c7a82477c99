//! Transport: playhead, loop, punch and play-state shared between the control
//! thread and the audio thread.
//!
//! Everything here goes through atomics. The control thread writes markers and
//! *requests* play-state changes; the audio thread owns the playhead and
//! acknowledges requests at the start of each cycle, paused or not.
//! Control-side moves of the playhead are delivered as a pending seek that the
//! audio thread applies.

use arc_swap::ArcSwap;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(feature = "std")]
use super::ack::AckSignal;
use super::fsm::{PlayState, RecordingMode, TransportRequest};
use super::position::Position;
use super::snap_grid::SnapGrid;
use super::tempo_map::{FrameTickRatio, MusicalRatios, TempoProvider};
use crate::config::TransportConfig;
use crate::lockfree::{AtomicDouble, AtomicFlag, AtomicFrames, AtomicPosition, AtomicState};
use crate::{Error, Result};

/// Default loop end, in bars from the start.
const DEFAULT_LOOP_BARS: i32 = 4;

/// A run of frames inside one audio block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSegment {
    /// Offset into the block.
    pub offset: u32,
    pub len: u32,
    /// Timeline frame of the first sample.
    pub start_frame: i64,
}

/// An audio block split around count-in and loop wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSplit {
    /// Leading frames during which the playhead is held for count-in.
    pub countin_frames: u32,
    /// Playback after the count-in, one segment per pass through the loop.
    pub segments: CycleSegments,
}

/// Playback segments of one block.
///
/// Each segment ends at the loop end or at the end of the block; the one after
/// a loop end starts at the loop start. Wraps the same way
/// [`Transport::advance_by_frames`] does, so the last segment ends where the
/// advanced playhead lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleSegments {
    offset: u32,
    remaining: u32,
    frame: i64,
    /// Frames of an enabled, non-empty loop.
    wrap: Option<(i64, i64)>,
}

impl Iterator for CycleSegments {
    type Item = CycleSegment;

    fn next(&mut self) -> Option<CycleSegment> {
        if self.remaining == 0 {
            return None;
        }

        let mut len = self.remaining;
        let mut next_frame = None;
        if let Some((start, end)) = self.wrap {
            let until_end = end - self.frame;
            if until_end > 0 && until_end <= len as i64 {
                len = until_end as u32;
                next_frame = Some(start);
            }
        }

        let segment = CycleSegment {
            offset: self.offset,
            len,
            start_frame: self.frame,
        };
        self.offset += len;
        self.remaining -= len;
        self.frame = next_frame.unwrap_or(self.frame + len as i64);
        Some(segment)
    }
}

pub struct Transport {
    config: TransportConfig,
    tempo: Arc<dyn TempoProvider>,
    snap: Arc<dyn SnapGrid>,

    play_state: AtomicState,
    recording_mode: AtomicState,

    playhead: AtomicPosition,
    cue: AtomicPosition,
    playhead_before_pause: AtomicPosition,
    loop_start: AtomicPosition,
    loop_end: AtomicPosition,
    punch_in: AtomicPosition,
    punch_out: AtomicPosition,
    range_1: AtomicPosition,
    range_2: AtomicPosition,

    seek_target: AtomicPosition,
    seek_pending: AtomicFlag,
    playhead_resync_pending: AtomicFlag,

    loop_enabled: AtomicFlag,
    punch_mode_enabled: AtomicFlag,
    recording_enabled: AtomicFlag,
    metronome_enabled: AtomicFlag,
    has_range: AtomicFlag,

    ticks_per_frame: AtomicDouble,
    frames_per_tick: AtomicDouble,
    ratios: ArcSwap<MusicalRatios>,

    preroll_frames_remaining: AtomicFrames,
    countin_frames_remaining: AtomicFrames,
    rt_clamps: AtomicU64,

    #[cfg(feature = "std")]
    ack: AckSignal,
}

impl Transport {
    pub fn new(
        config: TransportConfig,
        tempo: Arc<dyn TempoProvider>,
        snap: Arc<dyn SnapGrid>,
    ) -> Result<Self> {
        config.validate()?;

        let sample_rate = tempo.sample_rate();
        if sample_rate != config.sample_rate {
            return Err(Error::InvalidConfig(format!(
                "tempo map runs at {sample_rate} Hz but the transport is configured for {} Hz",
                config.sample_rate
            )));
        }

        let ratio = tempo.ratio();
        let ratios = tempo.musical_ratios();

        let mut loop_end = Position::ZERO;
        loop_end.add_bars(DEFAULT_LOOP_BARS, &ratios, ratio.frames_per_tick);
        let mut punch_in = Position::ZERO;
        punch_in.add_bars(1, &ratios, ratio.frames_per_tick);
        let mut punch_out = Position::ZERO;
        punch_out.add_bars(3, &ratios, ratio.frames_per_tick);

        Ok(Self {
            config,
            tempo,
            snap,
            play_state: AtomicState::new(PlayState::Paused.to_u8()),
            recording_mode: AtomicState::new(RecordingMode::default().to_u8()),
            playhead: AtomicPosition::default(),
            cue: AtomicPosition::default(),
            playhead_before_pause: AtomicPosition::default(),
            loop_start: AtomicPosition::default(),
            loop_end: AtomicPosition::new(loop_end),
            punch_in: AtomicPosition::new(punch_in),
            punch_out: AtomicPosition::new(punch_out),
            range_1: AtomicPosition::default(),
            range_2: AtomicPosition::default(),
            seek_target: AtomicPosition::default(),
            seek_pending: AtomicFlag::new(false),
            playhead_resync_pending: AtomicFlag::new(false),
            loop_enabled: AtomicFlag::new(false),
            punch_mode_enabled: AtomicFlag::new(false),
            recording_enabled: AtomicFlag::new(false),
            metronome_enabled: AtomicFlag::new(false),
            has_range: AtomicFlag::new(false),
            ticks_per_frame: AtomicDouble::new(ratio.ticks_per_frame),
            frames_per_tick: AtomicDouble::new(ratio.frames_per_tick),
            ratios: ArcSwap::from_pointee(ratios),
            preroll_frames_remaining: AtomicFrames::new(0),
            countin_frames_remaining: AtomicFrames::new(0),
            rt_clamps: AtomicU64::new(0),
            #[cfg(feature = "std")]
            ack: AckSignal::new(),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn tempo(&self) -> &Arc<dyn TempoProvider> {
        &self.tempo
    }

    pub fn snap_grid(&self) -> &Arc<dyn SnapGrid> {
        &self.snap
    }

    // --- Cached ratios ---

    #[inline]
    pub fn ratio(&self) -> FrameTickRatio {
        FrameTickRatio {
            ticks_per_frame: self.ticks_per_frame.get(),
            frames_per_tick: self.frames_per_tick.get(),
        }
    }

    pub fn musical_ratios(&self) -> MusicalRatios {
        **self.ratios.load()
    }

    /// Frames in one bar at the cached tempo.
    pub fn frames_per_bar(&self) -> f64 {
        self.frames_per_tick.get() * self.musical_ratios().ticks_per_bar as f64
    }

    /// Refresh cached ratios from the tempo provider and resync every stored
    /// position's frames from its ticks.
    ///
    /// Call after each tempo, time-signature or sample-rate change. The
    /// playhead itself is resynced by the audio thread on its next cycle.
    pub fn update_tempo(&self) {
        let ratio = self.tempo.ratio();
        let ratios = self.tempo.musical_ratios();
        self.ticks_per_frame.set(ratio.ticks_per_frame);
        self.frames_per_tick.set(ratio.frames_per_tick);
        self.ratios.store(Arc::new(ratios));

        for slot in [
            &self.cue,
            &self.playhead_before_pause,
            &self.loop_start,
            &self.loop_end,
            &self.punch_in,
            &self.punch_out,
            &self.range_1,
            &self.range_2,
            &self.seek_target,
        ] {
            let mut pos = slot.load();
            pos.resync_frames(ratio.frames_per_tick);
            slot.store(pos);
        }

        self.playhead_resync_pending.set(true);

        debug!(
            frames_per_tick = ratio.frames_per_tick,
            ticks_per_bar = ratios.ticks_per_bar,
            "transport tempo updated"
        );
    }

    /// Resync `pos` with the cached ratio after sanitizing it.
    fn normalize(&self, mut pos: Position) -> Position {
        if pos.sanitize() {
            warn!("non-finite position reset to zero");
        }
        pos.resync_frames(self.frames_per_tick.get());
        pos
    }

    // --- Play state ---

    #[inline]
    pub fn play_state(&self) -> PlayState {
        PlayState::from_u8(self.play_state.get())
    }

    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.play_state() == PlayState::Rolling
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.play_state() == PlayState::Paused
    }

    /// Apply `request` with a CAS loop. Returns the new state, or `None` if
    /// the request is a no-op in the current state.
    fn request(&self, request: TransportRequest) -> Option<PlayState> {
        let mut current = self.play_state();
        loop {
            let next = current.transition(request)?;
            if self.play_state.transition(current.to_u8(), next.to_u8()) {
                return Some(next);
            }
            current = self.play_state();
        }
    }

    /// Request playback.
    ///
    /// When recording is armed this also arms count-in and moves the playhead
    /// back by the configured pre-roll. With `wait`, blocks until the audio
    /// thread acknowledges or the configured timeout passes. Returns `false`
    /// if the transport was already rolling.
    pub fn request_roll(&self, wait: bool) -> bool {
        let current = self.play_state();
        if current.transition(TransportRequest::Roll).is_none() {
            debug!(?current, "roll request ignored");
            return false;
        }

        if self.recording_enabled.get() {
            self.prepare_recording_start();
        }

        #[cfg(feature = "std")]
        if wait {
            self.ack.drain();
        }

        if self.request(TransportRequest::Roll).is_none() {
            debug!("roll request lost to a concurrent request");
            return false;
        }
        debug!("roll requested");

        if wait {
            self.wait_for_ack(PlayState::RollRequested);
        }
        true
    }

    /// Request a pause.
    ///
    /// Remembers the playhead and, if configured, returns it to the cue point.
    /// Returns `false` if the transport was already paused.
    pub fn request_pause(&self, wait: bool) -> bool {
        let current = self.play_state();
        if current.transition(TransportRequest::Pause).is_none() {
            debug!(?current, "pause request ignored");
            return false;
        }

        self.playhead_before_pause.store(self.playhead());

        #[cfg(feature = "std")]
        if wait {
            self.ack.drain();
        }

        if self.request(TransportRequest::Pause).is_none() {
            debug!("pause request lost to a concurrent request");
            return false;
        }

        if self.config.return_to_cue_on_pause {
            self.locate(self.cue.load());
        }
        debug!("pause requested");

        if wait {
            self.wait_for_ack(PlayState::PauseRequested);
        }
        true
    }

    #[cfg(feature = "std")]
    fn wait_for_ack(&self, requested: PlayState) {
        let timeout = self.config.ack_timeout();
        if !self
            .ack
            .wait_until(timeout, || self.play_state() != requested)
        {
            warn!(
                ?requested,
                timeout_ms = self.config.ack_timeout_ms,
                "audio thread did not acknowledge transport request"
            );
        }
    }

    #[cfg(not(feature = "std"))]
    fn wait_for_ack(&self, _requested: PlayState) {}

    fn prepare_recording_start(&self) {
        let ratios = self.musical_ratios();
        let frames_per_tick = self.frames_per_tick.get();

        let countin = (self.config.countin_bars as f64 * self.frames_per_bar()) as i64;
        self.countin_frames_remaining.set(countin);

        let playhead = self.playhead();
        let mut start = playhead;
        start.add_bars(
            -(self.config.preroll_bars as i32),
            &ratios,
            frames_per_tick,
        );
        if start.frames() < 0 {
            start = Position::ZERO;
        }
        let preroll = playhead.frames() - start.frames();
        self.preroll_frames_remaining.set(preroll);
        self.locate(start);

        debug!(countin, preroll, "recording start prepared");
    }

    // --- Audio thread ---

    /// Commit pending requests and seeks. Call once at the start of every
    /// audio cycle. Real-time safe.
    pub fn process_requests(&self) -> PlayState {
        let current = self.play_state();
        let state = match current.transition(TransportRequest::Acknowledge) {
            Some(next) if self.play_state.transition(current.to_u8(), next.to_u8()) => {
                #[cfg(feature = "std")]
                self.ack.post();
                next
            }
            _ => self.play_state(),
        };

        let mut playhead = self.playhead.load();
        if self.apply_pending(&mut playhead) {
            self.playhead.store(playhead);
        }
        state
    }

    /// Apply a pending seek or tempo resync to `playhead`.
    #[inline]
    fn apply_pending(&self, playhead: &mut Position) -> bool {
        let mut changed = false;
        if self.seek_pending.swap(false) {
            *playhead = self.seek_target.load();
            changed = true;
        }
        if self.playhead_resync_pending.swap(false) {
            playhead.resync_frames(self.frames_per_tick.get());
            changed = true;
        }
        changed
    }

    /// Loop start and end frames while looping applies. An empty loop never
    /// wraps.
    #[inline]
    fn active_loop(&self) -> Option<(i64, i64)> {
        if !self.loop_enabled.get() {
            return None;
        }
        let start = self.loop_start.load().frames();
        let end = self.loop_end.load().frames();
        (end > start).then_some((start, end))
    }

    /// Frames from `frame` until the loop end, if the loop end falls within
    /// `(frame, frame + nframes]` and looping is on; otherwise 0.
    #[inline]
    pub fn is_loop_point_met(&self, frame: i64, nframes: u32) -> i64 {
        let Some((_, loop_end)) = self.active_loop() else {
            return 0;
        };
        if frame < loop_end && loop_end <= frame + nframes as i64 {
            loop_end - frame
        } else {
            0
        }
    }

    /// Advance the playhead by one block. Returns `true` if it wrapped at the
    /// loop end. Real-time safe.
    ///
    /// Count-in frames are consumed first with the playhead held in place.
    pub fn advance_by_frames(&self, nframes: u32) -> bool {
        let mut playhead = self.playhead.load();
        self.apply_pending(&mut playhead);

        let mut remaining = nframes as i64;
        let countin = self.countin_frames_remaining.get();
        if countin > 0 {
            let held = countin.min(remaining);
            self.countin_frames_remaining.set(countin - held);
            remaining -= held;
        } else if countin < 0 {
            self.countin_frames_remaining.set(0);
        }

        let looped = remaining > 0
            && self.add_frames_looped(&mut playhead, remaining, self.ticks_per_frame.get());

        let preroll = self.preroll_frames_remaining.get();
        if preroll != 0 {
            self.preroll_frames_remaining
                .set((preroll - remaining).max(0));
        }

        if playhead.sanitize() {
            self.rt_clamps.fetch_add(1, Ordering::Relaxed);
        }
        self.playhead.store(playhead);
        looped
    }

    /// Returns `pos` moved by `nframes`, wrapping at the loop end.
    pub fn position_add_frames_looped(&self, pos: Position, nframes: i64) -> Position {
        let mut pos = pos;
        self.add_frames_looped(&mut pos, nframes, self.ticks_per_frame.get());
        pos
    }

    fn add_frames_looped(&self, pos: &mut Position, nframes: i64, ticks_per_frame: f64) -> bool {
        let before = pos.frames();
        pos.add_frames(nframes, ticks_per_frame);

        let Some((start, end)) = self.active_loop() else {
            return false;
        };
        if before >= end || pos.frames() < end {
            return false;
        }

        let overshoot = (pos.frames() - end) % (end - start);
        *pos = self.loop_start.load();
        if overshoot != 0 {
            pos.add_frames(overshoot, ticks_per_frame);
        }
        true
    }

    /// Split a block of `nframes` around count-in and loop wraps.
    pub fn split_at_loop_point(&self, nframes: u32) -> CycleSplit {
        let countin = self.countin_frames_remaining.get().clamp(0, nframes as i64) as u32;
        CycleSplit {
            countin_frames: countin,
            segments: CycleSegments {
                offset: countin,
                remaining: nframes - countin,
                frame: self.playhead.load().frames(),
                wrap: self.active_loop(),
            },
        }
    }

    /// Whether `pos` is within `[punch_in, punch_out)`.
    #[inline]
    pub fn position_is_inside_punch_range(&self, pos: &Position) -> bool {
        pos.is_between_excl_end(&self.punch_in.load(), &self.punch_out.load())
    }

    /// Times the audio thread reset a non-finite playhead.
    pub fn rt_clamp_count(&self) -> u64 {
        self.rt_clamps.load(Ordering::Relaxed)
    }

    pub fn preroll_frames_remaining(&self) -> i64 {
        self.preroll_frames_remaining.get()
    }

    pub fn countin_frames_remaining(&self) -> i64 {
        self.countin_frames_remaining.get()
    }

    // --- Playhead ---

    /// The playhead as the control thread should see it, including a seek or
    /// tempo resync the audio thread has not applied yet.
    pub fn playhead(&self) -> Position {
        let mut pos = if self.seek_pending.get() {
            self.seek_target.load()
        } else {
            self.playhead.load()
        };
        if self.playhead_resync_pending.get() {
            pos.resync_frames(self.frames_per_tick.get());
        }
        pos
    }

    /// The playhead as last written by the audio thread.
    #[inline]
    pub fn applied_playhead(&self) -> Position {
        self.playhead.load()
    }

    pub fn playhead_before_pause(&self) -> Position {
        self.playhead_before_pause.load()
    }

    /// Move the playhead without any recording checks.
    ///
    /// Always delivered as a pending seek; only the audio thread writes the
    /// playhead.
    pub(crate) fn locate(&self, pos: Position) {
        self.seek_target.store(self.normalize(pos));
        self.seek_pending.set(true);
    }

    /// The user may not move the playhead while recording is rolling.
    pub fn can_user_move_playhead(&self) -> bool {
        !self.recording_enabled.get() || !self.is_rolling()
    }

    /// Move the playhead to `target`, optionally making it the cue point.
    ///
    /// Returns `false` (and leaves everything unchanged) while recording.
    pub fn move_to_target(&self, target: Position, set_cue: bool) -> bool {
        if !self.can_user_move_playhead() {
            warn!("playhead is locked while recording");
            return false;
        }

        let target = self.normalize(target);
        self.locate(target);
        if set_cue {
            self.cue.store(target);
        }
        debug!(ticks = target.ticks(), frames = target.frames(), set_cue, "playhead moved");
        true
    }

    /// Step back to the previous grid line.
    ///
    /// Pressed repeatedly, or shortly after the playhead crossed a line while
    /// rolling, it skips one more line so the user is not stuck on the same
    /// one.
    pub fn move_backward(&self) -> bool {
        let frames_per_tick = self.frames_per_tick.get();
        let playhead = self.playhead();

        let mut target =
            Position::from_ticks(self.snap.prev_snap_point(playhead.ticks()), frames_per_tick);

        let mut threshold = playhead;
        threshold.add_ms(-self.config.backward_debounce_ms, &*self.tempo);
        let just_crossed = self.is_rolling() && target.is_after_or_equal(&threshold);

        if target.frames() > 0 && (target == playhead || just_crossed) {
            target = Position::from_ticks(
                self.snap.prev_snap_point(target.ticks() - 1.0),
                frames_per_tick,
            );
        }

        self.move_to_target(target, true)
    }

    /// Step forward to the next grid line.
    pub fn move_forward(&self) -> bool {
        let playhead = self.playhead();
        let target = Position::from_ticks(
            self.snap.next_snap_point(playhead.ticks()),
            self.frames_per_tick.get(),
        );
        self.move_to_target(target, true)
    }

    // --- Markers ---

    pub fn cue_point(&self) -> Position {
        self.cue.load()
    }

    pub fn set_cue_point(&self, pos: Position) {
        self.cue.store(self.clamp_non_negative(pos, "cue point"));
    }

    fn clamp_non_negative(&self, pos: Position, what: &str) -> Position {
        let pos = self.normalize(pos);
        if pos.frames() < 0 {
            warn!(what, frames = pos.frames(), "negative marker clamped to zero");
            return Position::ZERO;
        }
        pos
    }

    /// Clamp to `start >= 0` and `end >= start`.
    fn clamp_range(&self, start: Position, end: Position, what: &str) -> (Position, Position) {
        let start = self.clamp_non_negative(start, what);
        let end = self.normalize(end);
        if end.is_before(&start) {
            warn!(what, "range end before start, collapsed");
            return (start, start);
        }
        (start, end)
    }

    pub fn loop_start(&self) -> Position {
        self.loop_start.load()
    }

    pub fn loop_end(&self) -> Position {
        self.loop_end.load()
    }

    pub fn loop_length_frames(&self) -> i64 {
        self.loop_end.load().frames() - self.loop_start.load().frames()
    }

    pub fn set_loop_range(&self, start: Position, end: Position) {
        let (start, end) = self.clamp_range(start, end, "loop");
        self.loop_start.store(start);
        self.loop_end.store(end);
        debug!(start = start.frames(), end = end.frames(), "loop range set");
    }

    pub fn set_loop_start(&self, pos: Position) {
        self.set_loop_range(pos, self.loop_end.load());
    }

    pub fn set_loop_end(&self, pos: Position) {
        let start = self.loop_start.load();
        let (_, end) = self.clamp_range(start, pos, "loop");
        self.loop_end.store(end);
    }

    pub fn punch_in(&self) -> Position {
        self.punch_in.load()
    }

    pub fn punch_out(&self) -> Position {
        self.punch_out.load()
    }

    pub fn set_punch_range(&self, start: Position, end: Position) {
        let (start, end) = self.clamp_range(start, end, "punch");
        self.punch_in.store(start);
        self.punch_out.store(end);
        debug!(start = start.frames(), end = end.frames(), "punch range set");
    }

    pub fn set_punch_in(&self, pos: Position) {
        self.set_punch_range(pos, self.punch_out.load());
    }

    pub fn set_punch_out(&self, pos: Position) {
        let start = self.punch_in.load();
        let (_, end) = self.clamp_range(start, pos, "punch");
        self.punch_out.store(end);
    }

    /// Set both range endpoints. They are kept in the order given.
    pub fn set_range(&self, first: Position, second: Position) {
        self.range_1
            .store(self.clamp_non_negative(first, "range"));
        self.range_2
            .store(self.clamp_non_negative(second, "range"));
        self.has_range.set(true);
    }

    pub fn set_range_1(&self, pos: Position) {
        self.range_1.store(self.clamp_non_negative(pos, "range"));
        self.has_range.set(true);
    }

    pub fn set_range_2(&self, pos: Position) {
        self.range_2.store(self.clamp_non_negative(pos, "range"));
        self.has_range.set(true);
    }

    pub fn clear_range(&self) {
        self.has_range.set(false);
    }

    /// Show or hide the stored range without touching its endpoints.
    pub fn set_has_range(&self, has_range: bool) {
        self.has_range.set(has_range);
    }

    pub fn has_range(&self) -> bool {
        self.has_range.get()
    }

    /// Stored endpoints in the order they were set.
    pub fn range_endpoints(&self) -> (Position, Position) {
        (self.range_1.load(), self.range_2.load())
    }

    /// The selected range as `(start, end)`, if any.
    pub fn range(&self) -> Option<(Position, Position)> {
        if !self.has_range.get() {
            return None;
        }
        let (a, b) = self.range_endpoints();
        Some((a.min(b), a.max(b)))
    }

    // --- Flags ---

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled.get()
    }

    /// Rolling with looping on.
    pub fn is_looping(&self) -> bool {
        self.loop_enabled.get() && self.is_rolling()
    }

    pub fn set_loop(&self, enabled: bool) {
        if self.loop_enabled.swap(enabled) != enabled {
            debug!(enabled, "loop toggled");
        }
    }

    pub fn punch_mode_enabled(&self) -> bool {
        self.punch_mode_enabled.get()
    }

    pub fn set_punch_mode(&self, enabled: bool) {
        if self.punch_mode_enabled.swap(enabled) != enabled {
            debug!(enabled, "punch mode toggled");
        }
    }

    pub fn recording_enabled(&self) -> bool {
        self.recording_enabled.get()
    }

    pub fn set_recording(&self, enabled: bool) {
        if self.recording_enabled.swap(enabled) != enabled {
            debug!(enabled, "recording toggled");
        }
    }

    pub fn metronome_enabled(&self) -> bool {
        self.metronome_enabled.get()
    }

    pub fn set_metronome(&self, enabled: bool) {
        self.metronome_enabled.set(enabled);
    }

    pub fn recording_mode(&self) -> RecordingMode {
        RecordingMode::from_u8(self.recording_mode.get())
    }

    pub fn set_recording_mode(&self, mode: RecordingMode) {
        self.recording_mode.set(mode.to_u8());
        debug!(?mode, "recording mode set");
    }

    /// Force the paused state and clear everything the audio thread was
    /// counting down. Used when restoring a saved session.
    pub(crate) fn reset_to_paused(&self) {
        self.play_state.set(PlayState::Paused.to_u8());
        self.seek_pending.set(false);
        self.playhead_resync_pending.set(false);
        self.preroll_frames_remaining.set(0);
        self.countin_frames_remaining.set(0);
    }
}
