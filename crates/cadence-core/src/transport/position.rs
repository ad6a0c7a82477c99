//! Timeline positions in musical ticks and sample frames.
//!
//! A [`Position`] carries both representations: ticks for composition and
//! display, frames for sample-accurate processing. Every mutator keeps the two
//! in sync, so the audio thread can read frames without reconverting.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use super::snap_grid::{SnapContext, SnapGrid};
use super::tempo_map::{active_ratio, usable, MusicalRatios, TempoProvider};
use crate::error::ParseError;

#[inline]
fn ticks_to_frames(ticks: f64, frames_per_tick: f64) -> i64 {
    (ticks * frames_per_tick).round() as i64
}

/// A point in time, ordered by `frames` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    ticks: f64,
    frames: i64,
}

impl Position {
    pub const ZERO: Self = Self {
        ticks: 0.0,
        frames: 0,
    };

    /// A ratio that is zero, negative or non-finite falls back to
    /// [`active_ratio`].
    #[inline]
    pub fn from_ticks(ticks: f64, frames_per_tick: f64) -> Self {
        let mut pos = Self { ticks, frames: 0 };
        pos.resync_frames(frames_per_tick);
        pos
    }

    /// A ratio that is zero, negative or non-finite falls back to
    /// [`active_ratio`].
    #[inline]
    pub fn from_frames(frames: i64, ticks_per_frame: f64) -> Self {
        let mut pos = Self { ticks: 0.0, frames };
        pos.resync_ticks(ticks_per_frame);
        pos
    }

    pub fn from_ms(ms: f64, tempo: &dyn TempoProvider) -> Self {
        Self::from_ticks(tempo.ms_to_ticks(ms), tempo.frames_per_tick())
    }

    pub fn from_musical(time: MusicalTime, tempo: &dyn TempoProvider) -> Self {
        Self::from_ticks(tempo.musical_position_to_tick(time), tempo.frames_per_tick())
    }

    /// Parse a `bars.beats.sixteenths.ticks` literal.
    pub fn parse(s: &str, tempo: &dyn TempoProvider) -> Result<Self, ParseError> {
        let time: MusicalTime = s.parse()?;
        Ok(Self::from_musical(time, tempo))
    }

    /// Reassemble a position from fields that were stored in sync.
    #[inline]
    pub(crate) const fn from_parts(ticks: f64, frames: i64) -> Self {
        Self { ticks, frames }
    }

    #[inline]
    pub fn ticks(&self) -> f64 {
        self.ticks
    }

    #[inline]
    pub fn frames(&self) -> i64 {
        self.frames
    }

    /// Recompute frames from ticks (after a tempo change).
    #[inline]
    pub fn resync_frames(&mut self, frames_per_tick: f64) {
        let frames_per_tick =
            usable(frames_per_tick).unwrap_or_else(|| active_ratio().frames_per_tick);
        self.frames = ticks_to_frames(self.ticks, frames_per_tick);
    }

    /// Recompute ticks from frames.
    #[inline]
    pub fn resync_ticks(&mut self, ticks_per_frame: f64) {
        let ticks_per_frame =
            usable(ticks_per_frame).unwrap_or_else(|| active_ratio().ticks_per_frame);
        self.ticks = self.frames as f64 * ticks_per_frame;
    }

    /// Real-time safe.
    #[inline]
    pub fn add_frames(&mut self, delta: i64, ticks_per_frame: f64) {
        self.frames = self.frames.saturating_add(delta);
        self.resync_ticks(ticks_per_frame);
    }

    /// Real-time safe.
    #[inline]
    pub fn add_ticks(&mut self, delta: f64, frames_per_tick: f64) {
        self.ticks += delta;
        self.resync_frames(frames_per_tick);
    }

    pub fn add_ms(&mut self, ms: f64, tempo: &dyn TempoProvider) {
        self.add_ticks(tempo.ms_to_ticks(ms), tempo.frames_per_tick());
    }

    pub fn add_sixteenths(&mut self, sixteenths: i32, ratios: &MusicalRatios, frames_per_tick: f64) {
        self.add_ticks(
            sixteenths as f64 * ratios.ticks_per_sixteenth as f64,
            frames_per_tick,
        );
    }

    pub fn add_beats(&mut self, beats: i32, ratios: &MusicalRatios, frames_per_tick: f64) {
        self.add_ticks(beats as f64 * ratios.ticks_per_beat as f64, frames_per_tick);
    }

    pub fn add_bars(&mut self, bars: i32, ratios: &MusicalRatios, frames_per_tick: f64) {
        self.add_ticks(bars as f64 * ratios.ticks_per_bar as f64, frames_per_tick);
    }

    pub fn to_ms(&self, tempo: &dyn TempoProvider) -> f64 {
        tempo.ticks_to_ms(self.ticks)
    }

    /// Reset to zero if the tick value is not finite. Returns whether it did.
    #[inline]
    pub fn sanitize(&mut self) -> bool {
        if self.ticks.is_finite() {
            return false;
        }
        *self = Self::ZERO;
        true
    }

    #[inline]
    pub fn is_before(&self, other: &Position) -> bool {
        compare_frames(self, other) == Ordering::Less
    }

    #[inline]
    pub fn is_before_or_equal(&self, other: &Position) -> bool {
        compare_frames(self, other) != Ordering::Greater
    }

    #[inline]
    pub fn is_after(&self, other: &Position) -> bool {
        compare_frames(self, other) == Ordering::Greater
    }

    #[inline]
    pub fn is_after_or_equal(&self, other: &Position) -> bool {
        compare_frames(self, other) != Ordering::Less
    }

    #[inline]
    pub fn is_between_with(&self, start: &Position, end: &Position, boundary: Boundary) -> bool {
        boundary.admits(compare_frames(self, start), compare_frames(self, end))
    }

    /// Half-open `[start, end)`, the policy used for region membership.
    #[inline]
    pub fn is_between(&self, start: &Position, end: &Position) -> bool {
        self.is_between_excl_end(start, end)
    }

    /// `[start, end)`
    #[inline]
    pub fn is_between_excl_end(&self, start: &Position, end: &Position) -> bool {
        self.is_between_with(start, end, Boundary::ExcludeEnd)
    }

    /// `(start, end]`
    #[inline]
    pub fn is_between_excl_start(&self, start: &Position, end: &Position) -> bool {
        self.is_between_with(start, end, Boundary::ExcludeStart)
    }

    /// `(start, end)`
    #[inline]
    pub fn is_between_excl_both(&self, start: &Position, end: &Position) -> bool {
        self.is_between_with(start, end, Boundary::ExcludeBoth)
    }

    /// `[start, end]`
    #[inline]
    pub fn is_between_incl_both(&self, start: &Position, end: &Position) -> bool {
        self.is_between_with(start, end, Boundary::IncludeBoth)
    }

    pub fn bars(&self, start_at_one: bool, ratios: &MusicalRatios) -> i32 {
        let parts = Decomposed::new(self.ticks, ratios);
        parts.unit(parts.bars, start_at_one)
    }

    pub fn beats(&self, start_at_one: bool, ratios: &MusicalRatios) -> i32 {
        let parts = Decomposed::new(self.ticks, ratios);
        parts.unit(parts.beats, start_at_one)
    }

    pub fn sixteenths(&self, start_at_one: bool, ratios: &MusicalRatios) -> i32 {
        let parts = Decomposed::new(self.ticks, ratios);
        parts.unit(parts.sixteenths, start_at_one)
    }

    /// Ticks left over after whole bars, beats and sixteenths.
    ///
    /// Always a count, never an ordinal, so there is no one-based form.
    pub fn sub_ticks(&self, ratios: &MusicalRatios) -> f64 {
        Decomposed::new(self.ticks, ratios).ticks
    }

    pub fn musical_time(&self, ratios: &MusicalRatios) -> MusicalTime {
        MusicalTime::from_ticks(self.ticks, ratios)
    }

    /// Snap to the nearest point of `grid`.
    ///
    /// `start` is the reference for keep-offset snapping. Track and region
    /// points are extra object-specific targets; without them only musical
    /// grid lines are considered.
    pub fn snap(
        &mut self,
        start: Option<&Position>,
        track_points: Option<&[f64]>,
        region_points: Option<&[f64]>,
        grid: &dyn SnapGrid,
        frames_per_tick: f64,
    ) {
        let ctx = SnapContext {
            track_points,
            region_points,
        };
        self.ticks = grid.snap(self.ticks, start.map(|s| s.ticks), ctx);
        self.resync_frames(frames_per_tick);
    }
}

/// The canonical ordering of positions.
#[inline]
pub fn compare_frames(a: &Position, b: &Position) -> Ordering {
    a.frames.cmp(&b.frames)
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        compare_frames(self, other) == Ordering::Equal
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_frames(self, other)
    }
}

/// Inclusive/exclusive policy for range membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `[start, end]`
    IncludeBoth,
    /// `(start, end)`
    ExcludeBoth,
    /// `(start, end]`
    ExcludeStart,
    /// `[start, end)`
    ExcludeEnd,
}

impl Boundary {
    /// `to_start` and `to_end` compare the candidate against each bound.
    #[inline]
    fn admits(self, to_start: Ordering, to_end: Ordering) -> bool {
        match self {
            Boundary::IncludeBoth => to_start != Ordering::Less && to_end != Ordering::Greater,
            Boundary::ExcludeBoth => to_start == Ordering::Greater && to_end == Ordering::Less,
            Boundary::ExcludeStart => to_start == Ordering::Greater && to_end != Ordering::Greater,
            Boundary::ExcludeEnd => to_start != Ordering::Less && to_end == Ordering::Less,
        }
    }

    #[inline]
    pub fn contains(self, frame: i64, start: i64, end: i64) -> bool {
        self.admits(frame.cmp(&start), frame.cmp(&end))
    }
}

/// Range membership on raw frame counts.
pub mod frames {
    use super::Boundary;

    #[inline]
    pub fn between_incl_both(frame: i64, start: i64, end: i64) -> bool {
        Boundary::IncludeBoth.contains(frame, start, end)
    }

    #[inline]
    pub fn between_excl_both(frame: i64, start: i64, end: i64) -> bool {
        Boundary::ExcludeBoth.contains(frame, start, end)
    }

    #[inline]
    pub fn between_excl_start(frame: i64, start: i64, end: i64) -> bool {
        Boundary::ExcludeStart.contains(frame, start, end)
    }

    #[inline]
    pub fn between_excl_end(frame: i64, start: i64, end: i64) -> bool {
        Boundary::ExcludeEnd.contains(frame, start, end)
    }
}

/// Zero-based musical components; truncation keeps negatives symmetric.
struct Decomposed {
    negative: bool,
    bars: i32,
    beats: i32,
    sixteenths: i32,
    ticks: f64,
}

impl Decomposed {
    fn new(ticks: f64, ratios: &MusicalRatios) -> Self {
        if !ticks.is_finite() {
            return Self {
                negative: false,
                bars: 0,
                beats: 0,
                sixteenths: 0,
                ticks: 0.0,
            };
        }

        let per_bar = ratios.ticks_per_bar as f64;
        let per_beat = ratios.ticks_per_beat as f64;
        let per_sixteenth = ratios.ticks_per_sixteenth as f64;

        let bars = (ticks / per_bar).trunc();
        let mut rest = ticks - bars * per_bar;
        let beats = (rest / per_beat).trunc();
        rest -= beats * per_beat;
        let sixteenths = (rest / per_sixteenth).trunc();
        rest -= sixteenths * per_sixteenth;

        Self {
            negative: ticks < 0.0,
            bars: bars as i32,
            beats: beats as i32,
            sixteenths: sixteenths as i32,
            ticks: rest,
        }
    }

    /// One-based display skips zero: `-1` directly precedes `1`.
    #[inline]
    fn unit(&self, value: i32, start_at_one: bool) -> i32 {
        match (start_at_one, self.negative) {
            (false, _) => value,
            (true, false) => value + 1,
            (true, true) => value - 1,
        }
    }
}

#[inline]
fn zero_based(value: i32) -> i32 {
    match value.cmp(&0) {
        Ordering::Greater => value - 1,
        Ordering::Less => value + 1,
        Ordering::Equal => 0,
    }
}

/// A `bars.beats.sixteenths.ticks` literal with one-based units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicalTime {
    pub bar: i32,
    pub beat: i32,
    pub sixteenth: i32,
    pub tick: f64,
}

impl MusicalTime {
    pub const fn new(bar: i32, beat: i32, sixteenth: i32, tick: f64) -> Self {
        Self {
            bar,
            beat,
            sixteenth,
            tick,
        }
    }

    pub fn from_ticks(ticks: f64, ratios: &MusicalRatios) -> Self {
        let parts = Decomposed::new(ticks, ratios);
        Self {
            bar: parts.unit(parts.bars, true),
            beat: parts.unit(parts.beats, true),
            sixteenth: parts.unit(parts.sixteenths, true),
            tick: parts.ticks,
        }
    }

    pub fn to_ticks(&self, ratios: &MusicalRatios) -> f64 {
        zero_based(self.bar) as f64 * ratios.ticks_per_bar as f64
            + zero_based(self.beat) as f64 * ratios.ticks_per_beat as f64
            + zero_based(self.sixteenth) as f64 * ratios.ticks_per_sixteenth as f64
            + self.tick
    }
}

impl Default for MusicalTime {
    fn default() -> Self {
        Self::new(1, 1, 1, 0.0)
    }
}

impl fmt::Display for MusicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tick.fract() == 0.0 {
            write!(
                f,
                "{}.{}.{}.{:03}",
                self.bar, self.beat, self.sixteenth, self.tick as i64
            )
        } else {
            write!(
                f,
                "{}.{}.{}.{:07.3}",
                self.bar, self.beat, self.sixteenth, self.tick
            )
        }
    }
}

fn parse_unit(field: &'static str, value: &str) -> Result<i32, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

impl FromStr for MusicalTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        // The tick field may carry its own fractional part
        let fields: Vec<&str> = s.splitn(4, '.').collect();
        if fields.len() != 4 {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let tick: f64 = fields[3]
            .trim()
            .parse()
            .ok()
            .filter(|t: &f64| t.is_finite())
            .ok_or_else(|| ParseError::InvalidField {
                field: "ticks",
                value: fields[3].to_string(),
            })?;

        Ok(Self {
            bar: parse_unit("bars", fields[0])?,
            beat: parse_unit("beats", fields[1])?,
            sixteenth: parse_unit("sixteenths", fields[2])?,
            tick,
        })
    }
}
