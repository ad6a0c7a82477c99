//! Engine integration tests
//!
//! Builder wiring, injected components and tempo changes.

use approx::assert_abs_diff_eq;
use cadence::prelude::*;
use cadence::{Error, SharedTempoMap, SnapContext, SnapGrid, TempoMap};
use std::sync::Arc;

use crate::helpers::tolerances::MS_EPSILON;
use crate::helpers::*;

#[test]
fn test_engine_defaults() {
    let engine = test_engine();
    assert_eq!(engine.sample_rate(), TEST_SAMPLE_RATE);
    assert_eq!(engine.bpm(), 120.0);
    assert_eq!(engine.transport_arc().frames_per_bar(), 88_200.0);
}

#[test]
fn test_invalid_settings_rejected() {
    assert!(matches!(
        test_builder().bpm(-5.0).build(),
        Err(Error::Core(cadence::core::Error::InvalidTempo(_)))
    ));
    assert!(matches!(
        test_builder().time_signature(4, 3).build(),
        Err(Error::Core(cadence::core::Error::InvalidTimeSignature { .. }))
    ));
    assert!(matches!(
        test_builder().sample_rate(-1.0).build(),
        Err(Error::Core(cadence::core::Error::InvalidRange { .. }))
    ));
    assert!(test_builder().block_size(0).build().is_err());
}

#[test]
fn test_injected_tempo_map_is_shared() {
    let map = Arc::new(SharedTempoMap::new(TempoMap::new(100.0, 48000.0).unwrap()));
    let engine = CadenceEngine::builder().tempo_map(map.clone()).build().unwrap();

    assert_eq!(engine.sample_rate(), 48000.0);
    assert_eq!(engine.bpm(), 100.0);
    assert!(Arc::ptr_eq(engine.tempo_map(), &map));
}

/// Snaps everything to multiples of 100 ticks.
struct HundredTickGrid;

impl SnapGrid for HundredTickGrid {
    fn snap(&self, ticks: f64, _reference: Option<f64>, _ctx: SnapContext<'_>) -> f64 {
        (ticks / 100.0).round() * 100.0
    }

    fn prev_snap_point(&self, ticks: f64) -> f64 {
        ((ticks / 100.0).floor() * 100.0).max(0.0)
    }

    fn next_snap_point(&self, ticks: f64) -> f64 {
        (ticks / 100.0).floor() * 100.0 + 100.0
    }
}

#[test]
fn test_injected_snap_grid_drives_navigation() {
    let engine = test_builder()
        .snap_grid(Arc::new(HundredTickGrid))
        .build()
        .unwrap();

    engine.transport().forward().forward();
    assert_eq!(engine.transport().playhead().ticks(), 200.0);
    assert!(!engine.set_snap(SnapSettings::default()));
}

#[test]
fn test_time_signature_change() {
    let engine = test_engine();
    engine.set_time_signature(3, 4).unwrap();

    let ratios = engine.transport_arc().musical_ratios();
    assert_eq!(ratios.ticks_per_bar, 2880);
    assert_eq!(bar(&engine, 2).ticks(), 2880.0);
    assert!(engine.set_time_signature(0, 4).is_err());
}

#[test]
fn test_position_musical_display() {
    let engine = test_engine();
    let pos = engine.parse_position("2.1.1.240").unwrap();
    let ratios = engine.transport_arc().musical_ratios();

    assert_eq!(pos.musical_time(&ratios).to_string(), "2.1.1.240");
    assert_eq!(pos.bars(true, &ratios), 2);
    assert_eq!(pos.sixteenths(false, &ratios), 0);
    assert!(engine.parse_position("2.1").is_err());
}

#[test]
fn test_ms_conversion_matches_sample_rate() {
    let engine = test_engine();
    let one_second = Position::from_ms(1000.0, engine.tempo_map().as_ref());
    assert_eq!(one_second.frames(), TEST_SAMPLE_RATE as i64);
    assert_abs_diff_eq!(
        one_second.to_ms(engine.tempo_map().as_ref()),
        1000.0,
        epsilon = MS_EPSILON
    );
}
