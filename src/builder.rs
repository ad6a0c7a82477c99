//! Builder for configuring and constructing a `CadenceEngine`.

use std::sync::Arc;

use crate::core::{
    MusicalSnapGrid, SharedTempoMap, SnapGrid, SnapSettings, TempoMap, TempoProvider,
    TimeSignature, Transport, TransportConfig,
};
use crate::{CadenceEngine, Result};

/// The tempo map is published as the process-wide active map unless one is
/// injected with [`tempo_map`](Self::tempo_map).
///
/// # Example
///
/// ```ignore
/// use cadence::prelude::*;
///
/// let engine = CadenceEngine::builder()
///     .sample_rate(48000.0)
///     .bpm(128.0)
///     .time_signature(3, 4)
///     .build()?;
/// ```
pub struct CadenceEngineBuilder {
    config: TransportConfig,
    bpm: f64,
    time_signature: TimeSignature,
    snap_settings: SnapSettings,
    tempo_map: Option<Arc<SharedTempoMap>>,
    snap_grid: Option<Arc<dyn SnapGrid>>,
}

impl Default for CadenceEngineBuilder {
    fn default() -> Self {
        Self {
            config: TransportConfig::default(),
            bpm: 120.0,
            time_signature: TimeSignature::default(),
            snap_settings: SnapSettings::default(),
            tempo_map: None,
            snap_grid: None,
        }
    }
}

impl CadenceEngineBuilder {
    /// Default: 44100.0
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 512
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Default: 120.0
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Default: 4/4
    pub fn time_signature(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_signature = TimeSignature::new(numerator, denominator);
        self
    }

    pub fn preroll_bars(mut self, bars: u32) -> Self {
        self.config.preroll_bars = bars;
        self
    }

    pub fn countin_bars(mut self, bars: u32) -> Self {
        self.config.countin_bars = bars;
        self
    }

    /// Replace the whole transport configuration, including the sample rate.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn snap(mut self, settings: SnapSettings) -> Self {
        self.snap_settings = settings;
        self
    }

    /// Use an existing tempo map instead of building one. Its sample rate
    /// takes precedence; BPM and time signature settings are ignored.
    pub fn tempo_map(mut self, tempo_map: Arc<SharedTempoMap>) -> Self {
        self.tempo_map = Some(tempo_map);
        self
    }

    /// Use a custom snap grid. Snap settings are ignored.
    pub fn snap_grid(mut self, grid: Arc<dyn SnapGrid>) -> Self {
        self.snap_grid = Some(grid);
        self
    }

    pub fn build(self) -> Result<CadenceEngine> {
        let mut config = self.config;

        let tempo_map = match self.tempo_map {
            Some(map) => {
                config.sample_rate = map.sample_rate();
                map
            }
            None => {
                let map = TempoMap::with_time_signature(
                    self.bpm,
                    self.time_signature,
                    config.sample_rate,
                )?;
                Arc::new(SharedTempoMap::active(map))
            }
        };

        let provider: Arc<dyn TempoProvider> = tempo_map.clone();
        let (snap, musical_snap): (Arc<dyn SnapGrid>, _) = match self.snap_grid {
            Some(grid) => (grid, None),
            None => {
                let grid = Arc::new(MusicalSnapGrid::with_settings(
                    provider.clone(),
                    self.snap_settings,
                ));
                (grid.clone() as Arc<dyn SnapGrid>, Some(grid))
            }
        };
        let transport = Transport::new(config, provider, snap.clone())?;

        tracing::debug!(
            sample_rate = transport.config().sample_rate,
            bpm = tempo_map.snapshot().bpm(),
            "cadence engine built"
        );

        Ok(CadenceEngine::from_parts(
            tempo_map,
            snap,
            musical_snap,
            Arc::new(transport),
        ))
    }
}
