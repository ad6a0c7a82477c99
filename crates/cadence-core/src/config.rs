//! Transport configuration.

use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub sample_rate: f64,
    /// Maximum frames per audio block.
    pub block_size: usize,
    /// Bars the playhead is moved back before recording starts.
    pub preroll_bars: u32,
    /// Bars of metronome count-in before the playhead starts moving.
    pub countin_bars: u32,
    /// Return the playhead to the cue point when pausing.
    pub return_to_cue_on_pause: bool,
    /// Window in which a repeated "back" press skips one more grid line.
    pub backward_debounce_ms: f64,
    /// How long a waiting roll/pause request blocks for the audio thread.
    pub ack_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            block_size: 512,
            preroll_bars: 0,
            countin_bars: 0,
            return_to_cue_on_pause: true,
            backward_debounce_ms: 240.0,
            ack_timeout_ms: 2000,
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Error::InvalidRange {
                what: "sample rate",
                value: self.sample_rate,
            });
        }
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be at least 1".into()));
        }
        if !self.backward_debounce_ms.is_finite() || self.backward_debounce_ms < 0.0 {
            return Err(Error::InvalidRange {
                what: "backward debounce",
                value: self.backward_debounce_ms,
            });
        }
        Ok(())
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }
}
