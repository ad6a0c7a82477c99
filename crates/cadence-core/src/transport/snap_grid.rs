//! Snap grids for positions.

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::tempo_map::{MusicalRatios, TempoProvider, TICKS_PER_QUARTER_NOTE};

/// Object-specific snap targets, in ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapContext<'a> {
    pub track_points: Option<&'a [f64]>,
    pub region_points: Option<&'a [f64]>,
}

impl<'a> SnapContext<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    fn points(&self) -> impl Iterator<Item = f64> + 'a {
        let track = self.track_points.unwrap_or(&[]);
        let region = self.region_points.unwrap_or(&[]);
        track
            .iter()
            .chain(region.iter())
            .copied()
            .filter(|p| p.is_finite())
    }
}

/// Source of snap points.
///
/// Lives on the control thread; the transport only asks for the neighbouring
/// grid lines when stepping the playhead.
pub trait SnapGrid: Send + Sync {
    /// Nearest snap target to `ticks`.
    fn snap(&self, ticks: f64, reference: Option<f64>, ctx: SnapContext<'_>) -> f64;

    /// Greatest grid point at or before `ticks`, never below zero.
    fn prev_snap_point(&self, ticks: f64) -> f64;

    /// Smallest grid point strictly after `ticks`.
    fn next_snap_point(&self, ticks: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteLength {
    Bar,
    #[default]
    Beat,
    /// Double whole note.
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneHundredTwentyEighth,
}

impl NoteLength {
    pub fn ticks(self, ratios: &MusicalRatios) -> f64 {
        let quarter = TICKS_PER_QUARTER_NOTE as f64;
        match self {
            NoteLength::Bar => ratios.ticks_per_bar as f64,
            NoteLength::Beat => ratios.ticks_per_beat as f64,
            NoteLength::Breve => quarter * 8.0,
            NoteLength::Whole => quarter * 4.0,
            NoteLength::Half => quarter * 2.0,
            NoteLength::Quarter => quarter,
            NoteLength::Eighth => quarter / 2.0,
            NoteLength::Sixteenth => quarter / 4.0,
            NoteLength::ThirtySecond => quarter / 8.0,
            NoteLength::SixtyFourth => quarter / 16.0,
            NoteLength::OneHundredTwentyEighth => quarter / 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteType {
    #[default]
    Normal,
    Dotted,
    Triplet,
}

impl NoteType {
    fn scale(self) -> f64 {
        match self {
            NoteType::Normal => 1.0,
            NoteType::Dotted => 1.5,
            NoteType::Triplet => 2.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    pub note_length: NoteLength,
    pub note_type: NoteType,
    pub snap_to_grid: bool,
    /// Also snap to object boundaries passed in the [`SnapContext`].
    pub snap_to_events: bool,
    /// Keep the reference position's distance from its own grid line.
    pub keep_offset: bool,
}

impl SnapSettings {
    pub fn new(note_length: NoteLength) -> Self {
        Self {
            note_length,
            ..Default::default()
        }
    }
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            note_length: NoteLength::Beat,
            note_type: NoteType::Normal,
            snap_to_grid: true,
            snap_to_events: false,
            keep_offset: false,
        }
    }
}

/// Regular musical grid following the tempo map's time signature.
pub struct MusicalSnapGrid {
    tempo: Arc<dyn TempoProvider>,
    settings: ArcSwap<SnapSettings>,
}

impl MusicalSnapGrid {
    pub fn new(tempo: Arc<dyn TempoProvider>) -> Self {
        Self::with_settings(tempo, SnapSettings::default())
    }

    pub fn with_settings(tempo: Arc<dyn TempoProvider>, settings: SnapSettings) -> Self {
        Self {
            tempo,
            settings: ArcSwap::from_pointee(settings),
        }
    }

    pub fn settings(&self) -> SnapSettings {
        **self.settings.load()
    }

    pub fn set_settings(&self, settings: SnapSettings) {
        self.settings.store(Arc::new(settings));
    }

    /// Grid spacing in ticks.
    pub fn interval(&self) -> f64 {
        let settings = self.settings();
        settings.note_length.ticks(&self.tempo.musical_ratios()) * settings.note_type.scale()
    }

    fn line_at_or_before(&self, ticks: f64) -> f64 {
        let interval = self.interval();
        (ticks / interval).floor() * interval
    }

    fn nearest_line(&self, ticks: f64) -> f64 {
        let prev = self.line_at_or_before(ticks);
        let next = prev + self.interval();
        if ticks - prev <= next - ticks {
            prev
        } else {
            next
        }
    }
}

impl SnapGrid for MusicalSnapGrid {
    fn snap(&self, ticks: f64, reference: Option<f64>, ctx: SnapContext<'_>) -> f64 {
        let settings = self.settings();
        if !ticks.is_finite() || (!settings.snap_to_grid && !settings.snap_to_events) {
            return ticks;
        }

        let offset = match reference {
            Some(r) if settings.keep_offset && r.is_finite() => r - self.nearest_line(r),
            _ => 0.0,
        };
        let target = ticks - offset;

        let mut best: Option<f64> = None;
        let mut consider = |candidate: f64| {
            let closer = match best {
                Some(b) => (candidate - target).abs() < (b - target).abs(),
                None => true,
            };
            if closer {
                best = Some(candidate);
            }
        };

        if settings.snap_to_grid {
            let prev = self.line_at_or_before(target);
            consider(prev);
            consider(prev + self.interval());
        }
        if settings.snap_to_events {
            ctx.points().for_each(&mut consider);
        }

        match best {
            Some(snapped) => snapped + offset,
            None => ticks,
        }
    }

    fn prev_snap_point(&self, ticks: f64) -> f64 {
        self.line_at_or_before(ticks).max(0.0)
    }

    fn next_snap_point(&self, ticks: f64) -> f64 {
        self.line_at_or_before(ticks) + self.interval()
    }
}
