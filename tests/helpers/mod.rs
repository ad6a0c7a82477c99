//! Test helpers and fixtures for Cadence integration tests
//!
//! Cycles are driven by hand, one block at a time, the way an audio callback
//! would. No audio device is involved.

pub mod tolerances;

use cadence::prelude::*;
use std::sync::Once;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: f64 = 44100.0;

/// Standard block size for deterministic testing
pub const TEST_BLOCK_SIZE: u32 = 512;

/// Frames in two bars of 4/4 at 120 BPM and 44.1 kHz.
pub const TWO_BARS_FRAMES: i64 = 176_400;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// 44.1 kHz, 120 BPM, 4/4.
pub fn test_engine() -> CadenceEngine {
    test_builder().build().expect("Failed to create test engine")
}

pub fn test_builder() -> CadenceEngineBuilder {
    init_tracing();
    CadenceEngine::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .block_size(TEST_BLOCK_SIZE as usize)
        .bpm(120.0)
        .time_signature(4, 4)
}

/// Start of one-based `bar`.
pub fn bar(engine: &CadenceEngine, bar: i32) -> Position {
    engine
        .parse_position(&format!("{bar}.1.1.0"))
        .expect("valid bar literal")
}

/// Request playback and run one cycle so the audio side acknowledges it.
pub fn start_rolling(engine: &CadenceEngine) {
    engine.transport().play();
    let state = engine.run_cycle(0, |_| {});
    assert_eq!(state, PlayState::Rolling);
}

/// Run `blocks` cycles of `TEST_BLOCK_SIZE`, collecting every segment.
pub fn run_blocks(engine: &CadenceEngine, blocks: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    for _ in 0..blocks {
        engine.run_cycle(TEST_BLOCK_SIZE, |segment| segments.push(segment));
    }
    segments
}

/// Total frames covered by `Play` segments.
pub fn played_frames(segments: &[Segment]) -> u64 {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Play(play) => play.len as u64,
            _ => 0,
        })
        .sum()
}
