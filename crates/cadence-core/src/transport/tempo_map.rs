//! Tempo map and the tick/frame conversion provider.
//!
//! Positions never derive frames from BPM themselves. They ask a
//! [`TempoProvider`] for the current ratios so a tempo change is observed the
//! same way everywhere.

use arc_swap::ArcSwap;
use atomic_float::AtomicF64;
use core::sync::atomic::Ordering;
use std::sync::Arc;

use super::position::MusicalTime;
use crate::{Error, Result};

/// Ticks per quarter note.
pub const TICKS_PER_QUARTER_NOTE: i32 = 960;
pub const TICKS_PER_SIXTEENTH_NOTE: i32 = TICKS_PER_QUARTER_NOTE / 4;

const DEFAULT_BPM: f64 = 120.0;
const DEFAULT_SAMPLE_RATE: f64 = 44100.0;
const DEFAULT_FRAMES_PER_TICK: f64 =
    DEFAULT_SAMPLE_RATE * 60.0 / (DEFAULT_BPM * TICKS_PER_QUARTER_NOTE as f64);

static ACTIVE_FRAMES_PER_TICK: AtomicF64 = AtomicF64::new(DEFAULT_FRAMES_PER_TICK);
static ACTIVE_TICKS_PER_FRAME: AtomicF64 = AtomicF64::new(1.0 / DEFAULT_FRAMES_PER_TICK);

/// Both directions of the tick/frame conversion at one tempo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTickRatio {
    pub ticks_per_frame: f64,
    pub frames_per_tick: f64,
}

impl FrameTickRatio {
    pub fn from_frames_per_tick(frames_per_tick: f64) -> Self {
        Self {
            ticks_per_frame: 1.0 / frames_per_tick,
            frames_per_tick,
        }
    }
}

/// The ratio published by the most recently activated tempo map.
///
/// Used as the fallback when a conversion is requested without a usable
/// ratio. Lock-free, safe to read from the audio thread.
#[inline]
pub fn active_ratio() -> FrameTickRatio {
    FrameTickRatio {
        ticks_per_frame: ACTIVE_TICKS_PER_FRAME.load(Ordering::Acquire),
        frames_per_tick: ACTIVE_FRAMES_PER_TICK.load(Ordering::Acquire),
    }
}

/// Returns `ratio` if it can be used for a conversion.
#[inline]
pub(crate) fn usable(ratio: f64) -> Option<f64> {
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Quarter notes per bar.
    #[inline]
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * 4.0 / self.denominator as f64
    }

    pub fn validate(&self) -> Result<()> {
        let valid_denominator = matches!(self.denominator, 1 | 2 | 4 | 8 | 16);
        if self.numerator == 0 || self.numerator > 64 || !valid_denominator {
            return Err(Error::InvalidTimeSignature {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// Integer ratios of the musical grid, cached by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicalRatios {
    pub ticks_per_beat: i32,
    pub ticks_per_bar: i32,
    pub sixteenths_per_beat: i32,
    pub sixteenths_per_bar: i32,
    pub ticks_per_sixteenth: i32,
}

impl MusicalRatios {
    pub fn new(time_signature: TimeSignature) -> Self {
        let beats_per_bar = time_signature.numerator as i32;
        let beat_unit = time_signature.denominator as i32;
        let ticks_per_beat = TICKS_PER_QUARTER_NOTE * 4 / beat_unit;
        let sixteenths_per_beat = 16 / beat_unit;

        Self {
            ticks_per_beat,
            ticks_per_bar: ticks_per_beat * beats_per_bar,
            sixteenths_per_beat,
            sixteenths_per_bar: sixteenths_per_beat * beats_per_bar,
            ticks_per_sixteenth: TICKS_PER_SIXTEENTH_NOTE,
        }
    }
}

impl Default for MusicalRatios {
    fn default() -> Self {
        Self::new(TimeSignature::default())
    }
}

/// Source of tempo-derived conversion ratios.
pub trait TempoProvider: Send + Sync {
    fn ticks_per_frame(&self) -> f64;

    fn frames_per_tick(&self) -> f64;

    fn sample_rate(&self) -> f64;

    fn musical_ratios(&self) -> MusicalRatios;

    fn ratio(&self) -> FrameTickRatio {
        FrameTickRatio {
            ticks_per_frame: self.ticks_per_frame(),
            frames_per_tick: self.frames_per_tick(),
        }
    }

    fn musical_position_to_tick(&self, time: MusicalTime) -> f64 {
        time.to_ticks(&self.musical_ratios())
    }

    fn tick_to_musical_position(&self, tick: f64) -> MusicalTime {
        MusicalTime::from_ticks(tick, &self.musical_ratios())
    }

    fn tick_to_samples_rounded(&self, tick: f64) -> i64 {
        (tick * self.frames_per_tick()).round() as i64
    }

    fn ms_to_ticks(&self, ms: f64) -> f64 {
        ms * self.sample_rate() / 1000.0 * self.ticks_per_frame()
    }

    fn ticks_to_ms(&self, ticks: f64) -> f64 {
        ticks * self.frames_per_tick() * 1000.0 / self.sample_rate()
    }
}

/// Constant-tempo map with a single time signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoMap {
    bpm: f64,
    time_signature: TimeSignature,
    sample_rate: f64,
    ratios: MusicalRatios,
    frames_per_tick: f64,
    ticks_per_frame: f64,
}

impl TempoMap {
    pub fn new(bpm: f64, sample_rate: f64) -> Result<Self> {
        Self::with_time_signature(bpm, TimeSignature::default(), sample_rate)
    }

    pub fn with_time_signature(
        bpm: f64,
        time_signature: TimeSignature,
        sample_rate: f64,
    ) -> Result<Self> {
        validate_bpm(bpm)?;
        validate_sample_rate(sample_rate)?;
        time_signature.validate()?;

        let mut map = Self {
            bpm,
            time_signature,
            sample_rate,
            ratios: MusicalRatios::new(time_signature),
            frames_per_tick: 0.0,
            ticks_per_frame: 0.0,
        };
        map.recompute();
        Ok(map)
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        validate_bpm(bpm)?;
        self.bpm = bpm;
        self.recompute();
        Ok(())
    }

    pub fn set_time_signature(&mut self, numerator: u32, denominator: u32) -> Result<()> {
        let time_signature = TimeSignature::new(numerator, denominator);
        time_signature.validate()?;
        self.time_signature = time_signature;
        self.ratios = MusicalRatios::new(time_signature);
        self.recompute();
        Ok(())
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        self.recompute();
        Ok(())
    }

    pub fn frames_per_bar(&self) -> f64 {
        self.frames_per_tick * self.ratios.ticks_per_bar as f64
    }

    /// Publish this map's ratios as the process-wide fallback.
    pub fn make_active(&self) {
        ACTIVE_FRAMES_PER_TICK.store(self.frames_per_tick, Ordering::Release);
        ACTIVE_TICKS_PER_FRAME.store(self.ticks_per_frame, Ordering::Release);
    }

    fn recompute(&mut self) {
        // BPM counts beats of the signature's beat unit
        self.frames_per_tick =
            self.sample_rate * 60.0 / (self.bpm * self.ratios.ticks_per_beat as f64);
        self.ticks_per_frame = 1.0 / self.frames_per_tick;
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        let time_signature = TimeSignature::default();
        let mut map = Self {
            bpm: DEFAULT_BPM,
            time_signature,
            sample_rate: DEFAULT_SAMPLE_RATE,
            ratios: MusicalRatios::new(time_signature),
            frames_per_tick: 0.0,
            ticks_per_frame: 0.0,
        };
        map.recompute();
        map
    }
}

impl TempoProvider for TempoMap {
    #[inline]
    fn ticks_per_frame(&self) -> f64 {
        self.ticks_per_frame
    }

    #[inline]
    fn frames_per_tick(&self) -> f64 {
        self.frames_per_tick
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn musical_ratios(&self) -> MusicalRatios {
        self.ratios
    }
}

fn validate_bpm(bpm: f64) -> Result<()> {
    if !bpm.is_finite() || !(1.0..=999.0).contains(&bpm) {
        return Err(Error::InvalidTempo(bpm));
    }
    Ok(())
}

fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(Error::InvalidRange {
            what: "sample rate",
            value: sample_rate,
        });
    }
    Ok(())
}

/// Tempo map shared between the control thread and its readers.
///
/// Edits clone the current map, modify the copy and swap it in, so readers
/// always observe a whole map.
#[derive(Debug)]
pub struct SharedTempoMap {
    map: ArcSwap<TempoMap>,
    publish_active: bool,
}

impl SharedTempoMap {
    pub fn new(map: TempoMap) -> Self {
        Self {
            map: ArcSwap::from_pointee(map),
            publish_active: false,
        }
    }

    /// Also publish every edit as the process-wide fallback ratio.
    pub fn active(map: TempoMap) -> Self {
        map.make_active();
        Self {
            map: ArcSwap::from_pointee(map),
            publish_active: true,
        }
    }

    pub fn snapshot(&self) -> TempoMap {
        **self.map.load()
    }

    pub fn set_bpm(&self, bpm: f64) -> Result<()> {
        self.update(|map| map.set_bpm(bpm))
    }

    pub fn set_time_signature(&self, numerator: u32, denominator: u32) -> Result<()> {
        self.update(|map| map.set_time_signature(numerator, denominator))
    }

    pub fn set_sample_rate(&self, sample_rate: f64) -> Result<()> {
        self.update(|map| map.set_sample_rate(sample_rate))
    }

    fn update(&self, edit: impl FnOnce(&mut TempoMap) -> Result<()>) -> Result<()> {
        let mut next = self.snapshot();
        edit(&mut next)?;
        if self.publish_active {
            next.make_active();
        }
        self.map.store(Arc::new(next));
        Ok(())
    }
}

impl Default for SharedTempoMap {
    fn default() -> Self {
        Self::new(TempoMap::default())
    }
}

impl TempoProvider for SharedTempoMap {
    fn ticks_per_frame(&self) -> f64 {
        self.map.load().ticks_per_frame
    }

    fn frames_per_tick(&self) -> f64 {
        self.map.load().frames_per_tick
    }

    fn sample_rate(&self) -> f64 {
        self.map.load().sample_rate
    }

    fn musical_ratios(&self) -> MusicalRatios {
        self.map.load().ratios
    }

    fn ratio(&self) -> FrameTickRatio {
        let map = self.map.load();
        FrameTickRatio {
            ticks_per_frame: map.ticks_per_frame,
            frames_per_tick: map.frames_per_tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_tempo_conversion() {
        let map = TempoMap::new(120.0, 44100.0).unwrap();
        assert_relative_eq!(map.frames_per_tick(), 22.96875);
        // 2 bars of 4/4 at 120 BPM = 4 seconds
        assert_eq!(map.tick_to_samples_rounded(7680.0), 176_400);
        assert_relative_eq!(map.frames_per_bar(), 88_200.0);
    }

    #[test]
    fn test_musical_ratios() {
        let ratios = MusicalRatios::new(TimeSignature::new(4, 4));
        assert_eq!(ratios.ticks_per_beat, 960);
        assert_eq!(ratios.ticks_per_bar, 3840);
        assert_eq!(ratios.sixteenths_per_beat, 4);
        assert_eq!(ratios.sixteenths_per_bar, 16);

        let ratios = MusicalRatios::new(TimeSignature::new(6, 8));
        assert_eq!(ratios.ticks_per_beat, 480);
        assert_eq!(ratios.ticks_per_bar, 2880);
        assert_eq!(ratios.sixteenths_per_beat, 2);
        assert_eq!(ratios.sixteenths_per_bar, 12);
    }

    #[test]
    fn test_time_signature_changes_frames_per_tick() {
        let mut map = TempoMap::new(120.0, 48000.0).unwrap();
        let quarter = map.frames_per_tick();
        map.set_time_signature(6, 8).unwrap();
        // 120 eighth notes per minute = half the speed per tick
        assert_relative_eq!(map.frames_per_tick(), quarter * 2.0);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            TempoMap::new(120.0, -1.0),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            TempoMap::new(0.0, 44100.0),
            Err(Error::InvalidTempo(_))
        ));

        let mut map = TempoMap::default();
        assert!(map.set_time_signature(0, 4).is_err());
        assert!(map.set_time_signature(4, 3).is_err());
        assert!(map.set_bpm(f64::NAN).is_err());
        assert_eq!(map, TempoMap::default());
    }

    #[test]
    fn test_musical_position_round_trip() {
        let map = TempoMap::default();
        let time = MusicalTime::new(2, 2, 1, 480.0);
        let ticks = map.musical_position_to_tick(time);
        assert_relative_eq!(ticks, 3840.0 + 960.0 + 480.0);
        assert_eq!(map.tick_to_musical_position(ticks), MusicalTime::new(2, 2, 3, 0.0));
    }

    #[test]
    fn test_ms_conversion() {
        let map = TempoMap::new(120.0, 48000.0).unwrap();
        // One quarter note at 120 BPM lasts 500 ms
        assert_relative_eq!(map.ms_to_ticks(500.0), 960.0, epsilon = 1e-9);
        assert_relative_eq!(map.ticks_to_ms(960.0), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shared_map_swaps_whole_map() {
        let shared = SharedTempoMap::default();
        let before = shared.ratio();

        shared.set_bpm(60.0).unwrap();
        assert_relative_eq!(shared.frames_per_tick(), before.frames_per_tick * 2.0);

        // Failed edits leave the published map untouched
        assert!(shared.set_time_signature(3, 5).is_err());
        assert_eq!(shared.snapshot().time_signature(), TimeSignature::new(4, 4));
    }

    #[test]
    fn test_default_is_active_fallback() {
        // Re-publishing the default keeps the process-wide ratio stable for other tests
        TempoMap::default().make_active();
        let ratio = active_ratio();
        assert_relative_eq!(ratio.frames_per_tick, DEFAULT_FRAMES_PER_TICK);
        assert_relative_eq!(ratio.ticks_per_frame * ratio.frames_per_tick, 1.0);
    }
}
