//! Recording integration tests
//!
//! Pre-roll, count-in, punch range and the playhead lock while recording.

use cadence::prelude::*;

use crate::helpers::*;

#[test]
fn test_preroll_and_countin_through_cycles() {
    let engine = test_builder()
        .preroll_bars(1)
        .countin_bars(1)
        .build()
        .unwrap();
    let transport = engine.transport_arc();

    engine.transport().seek(bar(&engine, 3)).record(true).play();

    // Moved back one bar before rolling
    assert_eq!(transport.playhead(), bar(&engine, 2));
    assert_eq!(transport.preroll_frames_remaining(), 88_200);
    assert_eq!(transport.countin_frames_remaining(), 88_200);

    // The count-in takes 172.27 blocks with the playhead held
    let segments = run_blocks(&engine, 172);
    assert_eq!(played_frames(&segments), 0);
    assert_eq!(transport.playhead(), bar(&engine, 2));

    let mut last = Vec::new();
    engine.run_cycle(TEST_BLOCK_SIZE, |s| last.push(s));
    let countin_left = 88_200 - 172 * TEST_BLOCK_SIZE;
    assert_eq!(
        last[0],
        Segment::CountIn {
            offset: 0,
            len: countin_left
        }
    );
    match last[1] {
        Segment::Play(play) => {
            assert_eq!(play.offset, countin_left);
            assert_eq!(play.start_frame, bar(&engine, 2).frames());
        }
        other => panic!("expected playback after count-in, got {other:?}"),
    }

    let rolled = (TEST_BLOCK_SIZE - countin_left) as i64;
    assert_eq!(transport.countin_frames_remaining(), 0);
    assert_eq!(transport.preroll_frames_remaining(), 88_200 - rolled);
    assert_eq!(
        transport.playhead().frames(),
        bar(&engine, 2).frames() + rolled
    );
}

#[test]
fn test_playhead_locked_while_recording() {
    let engine = test_engine();
    start_rolling(&engine);
    engine.transport().record(true);
    run_blocks(&engine, 1);

    let before = engine.transport().playhead();
    let handle = engine.transport().seek(bar(&engine, 9)).forward().backward();
    run_blocks(&engine, 1);

    assert_eq!(
        handle.playhead().frames(),
        before.frames() + TEST_BLOCK_SIZE as i64
    );

    // Free again once paused
    engine.transport().pause();
    run_blocks(&engine, 1);
    assert!(engine.transport_arc().can_user_move_playhead());
    engine.transport().seek(bar(&engine, 9));
    assert_eq!(engine.transport().playhead(), bar(&engine, 9));
}

#[test]
fn test_punch_range_membership() {
    let engine = test_engine();
    let punch_in = bar(&engine, 2);
    let punch_out = bar(&engine, 4);
    engine.transport().punch_range(punch_in, punch_out).punch(true);

    let transport = engine.transport_arc();
    assert!(transport.punch_mode_enabled());
    assert!(transport.position_is_inside_punch_range(&punch_in));
    assert!(!transport.position_is_inside_punch_range(&punch_out));

    let mut just_before = punch_out;
    just_before.add_frames(-1, transport.ratio().ticks_per_frame);
    assert!(transport.position_is_inside_punch_range(&just_before));
}

#[test]
fn test_recording_mode_and_rejected_roll() {
    let engine = test_engine();
    engine
        .transport()
        .recording_mode(RecordingMode::OverwriteEvents)
        .play();
    run_blocks(&engine, 1);

    let transport = engine.transport_arc();
    assert_eq!(transport.recording_mode(), RecordingMode::OverwriteEvents);
    assert!(!transport.request_roll(false));
    assert!(transport.is_rolling());
}
