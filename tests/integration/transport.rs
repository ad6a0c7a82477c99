//! Transport integration tests
//!
//! Play state, seeking and looping through whole audio cycles.

use cadence::prelude::*;
use proptest::prelude::*;

use crate::helpers::tolerances::TICK_EPSILON;
use crate::helpers::*;

#[test]
fn test_play_pause_through_cycles() {
    let engine = test_engine();
    assert_eq!(engine.transport().play_state(), PlayState::Paused);

    engine.transport().play();
    assert_eq!(engine.transport().play_state(), PlayState::RollRequested);

    let segments = run_blocks(&engine, 4);
    assert_eq!(played_frames(&segments), 4 * TEST_BLOCK_SIZE as u64);
    assert_eq!(engine.transport().playhead().frames(), 2048);

    engine.transport().pause();
    let state = engine.run_cycle(TEST_BLOCK_SIZE, |_| {});
    assert_eq!(state, PlayState::Paused);

    // Returned to the cue point, which was never moved
    assert_eq!(engine.transport().playhead(), Position::ZERO);
    assert_eq!(engine.transport_arc().playhead_before_pause().frames(), 2048);
}

#[test]
fn test_paused_cycles_do_not_advance() {
    let engine = test_engine();
    let segments = run_blocks(&engine, 8);

    assert_eq!(played_frames(&segments), 0);
    assert!(segments
        .iter()
        .all(|s| matches!(s, Segment::Silence { len: TEST_BLOCK_SIZE, .. })));
    assert_eq!(engine.transport().playhead(), Position::ZERO);
}

#[test]
fn test_loop_two_bars_end_to_end() {
    let engine = test_engine();
    let start = bar(&engine, 1);
    let end = bar(&engine, 3);
    assert_eq!(end.frames(), TWO_BARS_FRAMES);

    engine.transport().loop_range(start, end).enable_loop();
    start_rolling(&engine);

    let transport = engine.transport_arc();
    let mut total = 0i64;
    let mut wrapped = false;
    while total < TWO_BARS_FRAMES {
        let looped = transport.advance_by_frames(TEST_BLOCK_SIZE);
        total += TEST_BLOCK_SIZE as i64;
        wrapped |= looped;
        assert!(transport.playhead().frames() < TWO_BARS_FRAMES);
    }

    assert!(wrapped);
    assert_eq!(transport.playhead().frames(), total - TWO_BARS_FRAMES);
    assert_eq!(transport.playhead().frames(), 240);
}

#[test]
fn test_loop_segments_cover_every_frame() {
    let engine = test_engine();
    let start = bar(&engine, 1);
    let end = bar(&engine, 3);
    engine.transport().loop_range(start, end).enable_loop();
    start_rolling(&engine);

    // 345 blocks cross the loop end once
    let segments = run_blocks(&engine, 345);
    assert_eq!(played_frames(&segments), 345 * TEST_BLOCK_SIZE as u64);

    let split_block: Vec<_> = segments
        .windows(2)
        .filter_map(|pair| match pair {
            [Segment::Play(a), Segment::Play(b)] if b.offset > 0 => Some((*a, *b)),
            _ => None,
        })
        .collect();
    assert_eq!(split_block.len(), 1);

    let (before, after) = split_block[0];
    assert_eq!(before.start_frame + before.len as i64, TWO_BARS_FRAMES);
    assert_eq!(after.start_frame, 0);
    assert_eq!(before.len + after.len, TEST_BLOCK_SIZE);
}

#[test]
fn test_seek_while_rolling_applies_next_cycle() {
    let engine = test_engine();
    start_rolling(&engine);
    run_blocks(&engine, 2);

    let target = bar(&engine, 5);
    engine.transport().seek(target);
    // Visible to the control side at once
    assert_eq!(engine.transport().playhead(), target);

    let segments = run_blocks(&engine, 1);
    match segments.as_slice() {
        [Segment::Play(play)] => assert_eq!(play.start_frame, target.frames()),
        other => panic!("unexpected segments: {other:?}"),
    }
    assert_eq!(
        engine.transport_arc().playhead().frames(),
        target.frames() + TEST_BLOCK_SIZE as i64
    );
}

#[test]
fn test_forward_and_backward_by_bar() {
    let engine = test_builder()
        .snap(SnapSettings::new(NoteLength::Bar))
        .build()
        .unwrap();

    let handle = engine.transport().forward().forward();
    assert_eq!(handle.playhead(), bar(&engine, 3));

    let handle = handle.backward();
    assert_eq!(handle.playhead(), bar(&engine, 2));
    assert_eq!(engine.transport_arc().cue_point(), bar(&engine, 2));
}

#[test]
fn test_tempo_change_keeps_musical_position() {
    let engine = test_engine();
    start_rolling(&engine);
    run_blocks(&engine, 10);

    let ticks_before = engine.transport_arc().playhead().ticks();
    engine.set_bpm(90.0).unwrap();
    engine.run_cycle(0, |_| {});

    let playhead = engine.transport_arc().playhead();
    assert!((playhead.ticks() - ticks_before).abs() < TICK_EPSILON);
    let expected = engine.position_at_ticks(ticks_before);
    assert_eq!(playhead.frames(), expected.frames());
}

#[test]
fn test_concurrent_play_request_is_acknowledged() {
    let engine = test_engine();
    let transport = engine.transport_arc().clone();

    let audio = std::thread::spawn(move || {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if transport.process_requests() == PlayState::Rolling {
                transport.advance_by_frames(TEST_BLOCK_SIZE);
                return true;
            }
            std::thread::yield_now();
        }
        false
    });

    let handle = engine.transport().play_and_wait();
    assert!(audio.join().unwrap());
    assert_eq!(handle.play_state(), PlayState::Rolling);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_looped_playhead_stays_in_loop(
        start in 0i64..200_000,
        blocks in 1usize..64,
        block in 1u32..4096,
    ) {
        let engine = test_builder().block_size(4096).build().unwrap();
        let loop_start = bar(&engine, 2);
        let loop_end = bar(&engine, 3);
        engine.transport().loop_range(loop_start, loop_end).enable_loop();

        let transport = engine.transport_arc();
        let from = Position::from_frames(
            start.min(loop_end.frames() - 1),
            transport.ratio().ticks_per_frame,
        );
        engine.transport().seek(from);
        start_rolling(&engine);

        for _ in 0..blocks {
            let mut segments = Vec::new();
            engine.run_cycle(block, |segment| segments.push(segment));
            for segment in &segments {
                if let Segment::Play(play) = segment {
                    prop_assert!(play.start_frame + play.len as i64 <= loop_end.frames());
                }
            }
            let frame = transport.playhead().frames();
            prop_assert!(frame < loop_end.frames());
            if from.frames() >= loop_start.frames() {
                prop_assert!(frame >= loop_start.frames());
            }
        }
    }
}
