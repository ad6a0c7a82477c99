//! Persistence integration tests
//!
//! Saved state survives JSON and a tempo change between save and load.

use cadence::prelude::*;
use cadence::TransportState;

use crate::helpers::*;

#[test]
fn test_state_survives_json() {
    let engine = test_engine();
    let start = bar(&engine, 2);
    let end = bar(&engine, 6);
    engine
        .transport()
        .loop_range(start, end)
        .enable_loop()
        .range(bar(&engine, 4), bar(&engine, 3))
        .metronome(true)
        .seek(bar(&engine, 3));

    let json = serde_json::to_string_pretty(&engine.save_state()).unwrap();
    let state: TransportState = serde_json::from_str(&json).unwrap();

    let restored = test_engine();
    restored.load_state(&state);
    let transport = restored.transport_arc();
    assert_eq!(transport.loop_start(), start);
    assert_eq!(transport.loop_end(), end);
    assert!(transport.loop_enabled());
    assert!(transport.metronome_enabled());
    assert_eq!(transport.playhead(), bar(&engine, 3));
    assert_eq!(
        transport.range().map(|(a, b)| (a.ticks(), b.ticks())),
        Some((bar(&engine, 3).ticks(), bar(&engine, 4).ticks()))
    );
}

#[test]
fn test_saved_ticks_rederive_frames_under_new_tempo() {
    let engine = test_engine();
    engine.transport().seek(bar(&engine, 2));
    let state = engine.save_state();

    let slower = test_builder().bpm(60.0).build().unwrap();
    slower.load_state(&state);

    let playhead = slower.transport_arc().playhead();
    assert_eq!(playhead.ticks(), 3840.0);
    assert_eq!(playhead.frames(), 2 * bar(&engine, 2).frames());
}

#[test]
fn test_loaded_transport_is_paused() {
    let engine = test_engine();
    engine.transport().record(true);
    start_rolling(&engine);
    let state = engine.save_state();
    assert!(state.recording_enabled);

    let restored = test_engine();
    restored.load_state(&state);
    assert_eq!(restored.transport().play_state(), PlayState::Paused);
    assert!(restored.transport_arc().recording_enabled());
}

#[test]
fn test_lenient_fields() {
    let state: TransportState =
        serde_json::from_str(r#"{ "cue": "5.1.1.0", "loop_start": "garbage", "loop_end": 3840 }"#)
            .unwrap();

    let engine = test_engine();
    engine.load_state(&state);
    let transport = engine.transport_arc();
    assert_eq!(transport.cue_point(), bar(&engine, 5));
    assert_eq!(transport.loop_start(), Position::ZERO);
    assert_eq!(transport.loop_end(), bar(&engine, 2));
}
