//! CadenceEngine that ties the tempo map, snap grid and transport together

use std::sync::Arc;

use crate::core::{
    CycleSegment, MusicalSnapGrid, PlayState, Position, SharedTempoMap, SnapGrid, SnapSettings,
    TempoProvider, Transport, TransportHandle, TransportState,
};
use crate::Result;

/// A run of frames handed to the render callback by [`CadenceEngine::run_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Transport is not rolling.
    Silence { offset: u32, len: u32 },
    /// Playhead held while the count-in plays.
    CountIn { offset: u32, len: u32 },
    /// Timeline playback starting at `start_frame`.
    Play(CycleSegment),
}

/// Main timing engine.
///
/// Owns the shared tempo map, snap grid and transport. Control methods are
/// called from any thread; [`run_cycle`](Self::run_cycle) from the audio
/// thread once per block.
///
/// # Example
///
/// ```ignore
/// use cadence::prelude::*;
///
/// let engine = CadenceEngine::builder().build()?;
/// engine.transport().play();
///
/// // audio callback
/// engine.run_cycle(512, |segment| match segment {
///     Segment::Play(seg) => render(seg.offset, seg.len, seg.start_frame),
///     _ => {}
/// });
/// ```
pub struct CadenceEngine {
    tempo_map: Arc<SharedTempoMap>,
    snap: Arc<dyn SnapGrid>,
    /// Set when the engine built its own grid.
    musical_snap: Option<Arc<MusicalSnapGrid>>,
    transport: Arc<Transport>,
}

impl CadenceEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::CadenceEngineBuilder {
        crate::CadenceEngineBuilder::default()
    }

    pub(crate) fn from_parts(
        tempo_map: Arc<SharedTempoMap>,
        snap: Arc<dyn SnapGrid>,
        musical_snap: Option<Arc<MusicalSnapGrid>>,
        transport: Arc<Transport>,
    ) -> Self {
        Self {
            tempo_map,
            snap,
            musical_snap,
            transport,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.tempo_map.sample_rate()
    }

    pub fn tempo_map(&self) -> &Arc<SharedTempoMap> {
        &self.tempo_map
    }

    pub fn snap_grid(&self) -> &Arc<dyn SnapGrid> {
        &self.snap
    }

    /// Fluent transport control.
    pub fn transport(&self) -> TransportHandle {
        TransportHandle::new(self.transport.clone())
    }

    /// The shared transport, for handing to the audio thread.
    pub fn transport_arc(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn bpm(&self) -> f64 {
        self.tempo_map.snapshot().bpm()
    }

    pub fn set_bpm(&self, bpm: f64) -> Result<()> {
        self.tempo_map.set_bpm(bpm)?;
        self.transport.update_tempo();
        Ok(())
    }

    pub fn set_time_signature(&self, numerator: u32, denominator: u32) -> Result<()> {
        self.tempo_map.set_time_signature(numerator, denominator)?;
        self.transport.update_tempo();
        Ok(())
    }

    /// Change the built-in grid's settings. Returns `false` if a custom grid
    /// was injected.
    pub fn set_snap(&self, settings: SnapSettings) -> bool {
        match &self.musical_snap {
            Some(grid) => {
                grid.set_settings(settings);
                true
            }
            None => false,
        }
    }

    /// Position at `ticks` under the current tempo.
    pub fn position_at_ticks(&self, ticks: f64) -> Position {
        Position::from_ticks(ticks, self.tempo_map.frames_per_tick())
    }

    /// Parse a `bars.beats.sixteenths.ticks` literal under the current tempo.
    pub fn parse_position(&self, text: &str) -> Result<Position> {
        let pos = Position::parse(text, &*self.tempo_map).map_err(cadence_core::Error::from)?;
        Ok(pos)
    }

    pub fn save_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn load_state(&self, state: &TransportState) {
        self.transport.restore(state);
    }

    /// Run one audio cycle of `nframes`.
    ///
    /// Commits pending transport requests, hands `render` the segments of the
    /// block split at count-in and every loop wrap, then advances the playhead.
    /// `nframes` must not exceed the configured block size.
    /// Returns the play state the block was rendered in. Real-time safe as
    /// long as `render` is.
    pub fn run_cycle(&self, nframes: u32, mut render: impl FnMut(Segment)) -> PlayState {
        debug_assert!(
            nframes as usize <= self.transport.config().block_size,
            "block of {nframes} frames exceeds the configured block size"
        );
        let state = self.transport.process_requests();
        if state != PlayState::Rolling {
            render(Segment::Silence {
                offset: 0,
                len: nframes,
            });
            return state;
        }

        let split = self.transport.split_at_loop_point(nframes);
        if split.countin_frames > 0 {
            render(Segment::CountIn {
                offset: 0,
                len: split.countin_frames,
            });
        }
        for segment in split.segments {
            render(Segment::Play(segment));
        }

        self.transport.advance_by_frames(nframes);
        state
    }
}
