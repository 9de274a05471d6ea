use approx::assert_abs_diff_eq;
use fingerframe_gesture::{
    CaptureError, CaptureOutcome, CropRegion, FramePipeline, FramePipelineParams, FrameSize,
    GestureState, HandObservation, Handedness, Landmark, PixelRect, Point, PointerClass,
    PolicyKind, TickResult,
};

fn frame() -> FrameSize {
    FrameSize::new(1280, 720)
}

fn hand(index: (f32, f32), thumb: (f32, f32), handedness: Handedness) -> HandObservation {
    HandObservation::from_tips(
        Point::new(index.0, index.1),
        Point::new(thumb.0, thumb.1),
        handedness,
    )
}

/// Each index tip rests on the other hand's thumb tip, spanning 0.3..0.7.
fn cross_frame() -> Vec<HandObservation> {
    vec![
        hand((0.70, 0.30), (0.30, 0.70), Handedness::Left),
        hand((0.31, 0.70), (0.70, 0.31), Handedness::Right),
    ]
}

/// Two open L shapes: index tips on top, thumbs below.
fn open_frame(left_index_y: f32) -> Vec<HandObservation> {
    vec![
        hand((0.30, left_index_y), (0.30, 0.70), Handedness::Left),
        hand((0.70, 0.30), (0.70, 0.70), Handedness::Right),
    ]
}

fn relabelled_reversed(hands: &[HandObservation]) -> Vec<HandObservation> {
    hands
        .iter()
        .rev()
        .cloned()
        .map(|mut h| {
            h.handedness = match h.handedness {
                Handedness::Left => Handedness::Right,
                Handedness::Right => Handedness::Left,
                Handedness::Unknown => Handedness::Unknown,
            };
            h
        })
        .collect()
}

fn pipeline(kind: PolicyKind) -> FramePipeline {
    FramePipeline::new(FramePipelineParams::for_policy(kind)).expect("valid defaults")
}

fn never_rearmed(kind: PolicyKind) -> FramePipeline {
    let mut params = FramePipelineParams::for_policy(kind);
    params.debounce.rearm_delay_ms = 1.0e9;
    FramePipeline::new(params).expect("valid params")
}

/// Tick `hands` every `step` ms over `[from, to]`, finishing each capture
/// `latency` ms later (or never, when `latency` is `None`).
fn run(
    p: &mut FramePipeline,
    hands: &[HandObservation],
    from: f64,
    to: f64,
    step: f64,
    latency: Option<f64>,
) -> Vec<(f64, TickResult)> {
    let mut out = Vec::new();
    let mut pending = None;
    let mut t = from;
    while t <= to {
        if let (Some((ticket, due)), Some(_)) = (pending, latency) {
            if due <= t {
                p.finish_capture(ticket, CaptureOutcome::Completed, due)
                    .expect("finish in-flight capture");
                pending = None;
            }
        }
        let r = p.tick(hands, frame(), t);
        if let (Some(capture), Some(latency)) = (&r.capture, latency) {
            pending = Some((capture.ticket, t + latency));
        }
        out.push((t, r));
        t += step;
    }
    if let Some((ticket, due)) = pending {
        p.finish_capture(ticket, CaptureOutcome::Completed, due)
            .expect("finish in-flight capture");
    }
    out
}

fn capture_times(results: &[(f64, TickResult)]) -> Vec<f64> {
    results
        .iter()
        .filter(|(_, r)| r.capture.is_some())
        .map(|(t, _)| *t)
        .collect()
}

#[test]
fn input_order_and_labels_do_not_matter() {
    for kind in PolicyKind::ALL {
        let hands = match kind {
            PolicyKind::DirectConnect => open_frame(0.30),
            _ => cross_frame(),
        };
        let swapped = relabelled_reversed(&hands);
        let mut a = pipeline(kind);
        let mut b = pipeline(kind);
        for i in 0..20 {
            let t = i as f64 * 33.0;
            let ra = a.tick(&hands, frame(), t);
            let rb = b.tick(&swapped, frame(), t);
            assert!(ra.candidate_valid, "{kind} should accept the frame");
            assert_eq!(ra, rb, "{kind} at {t} ms");
        }
    }
}

#[test]
fn hold_reaches_ready_after_dwell_and_not_before() {
    let mut p = never_rearmed(PolicyKind::ProximityRect);
    let results = run(&mut p, &cross_frame(), 0.0, 300.0, 10.0, None);

    // First stable sample is the second tick (t = 10); dwell is 100 ms.
    for (t, r) in &results {
        if *t >= 10.0 {
            assert_abs_diff_eq!(r.score.expect("instability"), 0.0, epsilon = 1e-6);
        }
        let expected = if *t >= 110.0 {
            GestureState::Ready
        } else {
            GestureState::Holding
        };
        assert_eq!(r.state, expected, "at {t} ms");
        assert_eq!(r.status, expected.status_text());
    }
    assert!(capture_times(&results).is_empty());
}

#[test]
fn persistent_ready_captures_once() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let results = run(&mut p, &cross_frame(), 0.0, 3000.0, 20.0, Some(50.0));

    assert_eq!(capture_times(&results), vec![120.0]);
    let (_, last) = results.last().expect("ticks");
    assert_eq!(last.state, GestureState::Holding);
    assert!(p.capture_in_flight().is_none());
}

#[test]
fn capture_carries_the_smoothed_frame() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let results = run(&mut p, &cross_frame(), 0.0, 300.0, 20.0, None);
    let (_, r) = results
        .iter()
        .find(|(_, r)| r.capture.is_some())
        .expect("one capture");
    let capture = r.capture.as_ref().expect("capture");
    assert_eq!(Some(capture.normalized), r.smoothed);
    assert_eq!(p.capture_in_flight(), Some(capture.ticket));
}

#[test]
fn capture_in_flight_is_reported_as_capturing() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let results = run(&mut p, &cross_frame(), 0.0, 400.0, 10.0, None);
    let first = capture_times(&results)[0];
    for (t, r) in &results {
        if *t >= first {
            assert_eq!(r.state, GestureState::Capturing, "at {t} ms");
        }
    }
    assert!(p.capture_in_flight().is_some());
}

#[test]
fn second_gesture_inside_cooldown_is_suppressed() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let hands = cross_frame();
    let one_hand = &hands[..1];

    let first = run(&mut p, &cross_frame(), 0.0, 110.0, 10.0, None);
    assert_eq!(capture_times(&first), vec![110.0]);
    let ticket = first[11].1.capture.as_ref().expect("capture").ticket;
    p.finish_capture(ticket, CaptureOutcome::Completed, 120.0)
        .expect("finish");

    // Break the gesture and form it again within 400 ms of the finish.
    run(&mut p, one_hand, 130.0, 150.0, 10.0, None);
    let second = run(&mut p, &cross_frame(), 160.0, 1000.0, 10.0, None);
    assert!(capture_times(&second).is_empty());

    // Past the cooldown a fresh gesture captures again.
    run(&mut p, one_hand, 1010.0, 1020.0, 10.0, None);
    let third = run(&mut p, &cross_frame(), 1030.0, 1200.0, 10.0, None);
    assert_eq!(capture_times(&third), vec![1140.0]);
}

#[test]
fn twitch_fires_one_capture_after_rearm_delay() {
    let mut p = pipeline(PolicyKind::DirectConnect);
    let mut results = run(&mut p, &open_frame(0.30), 0.0, 700.0, 50.0, None);
    for (t, y) in [(750.0, 0.33), (800.0, 0.31), (850.0, 0.27), (900.0, 0.27)] {
        results.push((t, p.tick(&open_frame(y), frame(), t)));
    }

    assert_eq!(capture_times(&results), vec![850.0]);
    let capture = results
        .iter()
        .find_map(|(_, r)| r.capture.as_ref())
        .expect("capture");
    match &capture.crop.region {
        CropRegion::Polygon { points } => assert_eq!(points.len(), 4),
        other => panic!("expected polygon crop, got {other:?}"),
    }
    assert!(!capture.crop.fallback);
}

#[test]
fn twitch_during_formation_is_swallowed() {
    let mut p = pipeline(PolicyKind::DirectConnect);
    let mut results = Vec::new();
    for (t, y) in [(0.0, 0.30), (50.0, 0.33), (100.0, 0.31), (150.0, 0.27)] {
        results.push((t, p.tick(&open_frame(y), frame(), t)));
    }
    results.extend(run(&mut p, &open_frame(0.30), 200.0, 1500.0, 50.0, None));

    let (_, edge) = &results[3];
    assert_eq!(edge.state, GestureState::Ready);
    assert!(capture_times(&results).is_empty());
}

#[test]
fn slow_dip_does_not_twitch() {
    let mut p = pipeline(PolicyKind::DirectConnect);
    let mut results = run(&mut p, &open_frame(0.30), 0.0, 700.0, 50.0, None);
    for (t, y) in [(850.0, 0.33), (1000.0, 0.31), (1150.0, 0.27)] {
        results.push((t, p.tick(&open_frame(y), frame(), t)));
    }
    assert!(capture_times(&results).is_empty());
    assert!(results.iter().all(|(_, r)| r.state == GestureState::Holding));
}

/// Cross frame whose two contact pairs are `gap` apart.
fn contact_frame(gap: f32) -> Vec<HandObservation> {
    vec![
        hand((0.70, 0.30), (0.30, 0.70), Handedness::Left),
        hand((0.30 + gap, 0.70), (0.70 + gap, 0.30), Handedness::Right),
    ]
}

#[test]
fn contact_hysteresis_holds_until_release_distance() {
    // Large hands clamp the threshold at 0.12; release is at 0.168.
    let mut p = never_rearmed(PolicyKind::AdaptiveContact);
    let mut valid = Vec::new();
    for (i, gap) in [0.05, 0.15, 0.15, 0.18, 0.15, 0.05].into_iter().enumerate() {
        let r = p.tick(&contact_frame(gap), frame(), i as f64 * 30.0);
        valid.push(r.candidate_valid);
        if i == 1 {
            assert_abs_diff_eq!(r.score.expect("ratio"), 0.15 / 0.12, epsilon = 1e-3);
        }
    }
    assert_eq!(valid, vec![true, true, true, false, false, true]);
}

#[test]
fn contact_must_be_held_before_ready() {
    let mut p = never_rearmed(PolicyKind::AdaptiveContact);
    let results = run(&mut p, &contact_frame(0.0), 0.0, 300.0, 25.0, None);
    for (t, r) in &results {
        let expected = if *t >= 150.0 {
            GestureState::Ready
        } else {
            GestureState::Holding
        };
        assert_eq!(r.state, expected, "at {t} ms");
    }
}

/// Only the left thumb and right index touch; the other pair is 0.2 apart.
fn single_contact_frame() -> Vec<HandObservation> {
    vec![
        hand((0.70, 0.30), (0.30, 0.70), Handedness::Left),
        hand((0.31, 0.70), (0.70, 0.50), Handedness::Right),
    ]
}

fn adaptive(pointer: PointerClass) -> FramePipeline {
    let mut params =
        FramePipelineParams::for_policy(PolicyKind::AdaptiveContact).with_pointer(pointer);
    params.debounce.rearm_delay_ms = 1.0e9;
    FramePipeline::new(params).expect("valid params")
}

#[test]
fn coarse_pointer_accepts_a_single_touching_pair() {
    let mut fine = adaptive(PointerClass::Fine);
    let mut coarse = adaptive(PointerClass::Coarse);
    let r_fine = fine.tick(&single_contact_frame(), frame(), 0.0);
    let r_coarse = coarse.tick(&single_contact_frame(), frame(), 0.0);
    assert!(!r_fine.candidate_valid);
    assert_eq!(r_fine.state, GestureState::Forming);
    assert!(r_coarse.candidate_valid);
    assert_eq!(r_coarse.state, GestureState::Holding);
}

#[test]
fn coarse_pointer_needs_the_longer_hold() {
    let mut p = adaptive(PointerClass::Coarse);
    let results = run(&mut p, &single_contact_frame(), 0.0, 300.0, 25.0, None);
    for (t, r) in &results {
        let expected = if *t >= 200.0 {
            GestureState::Ready
        } else {
            GestureState::Holding
        };
        assert_eq!(r.state, expected, "at {t} ms");
    }
}

/// Max x of the smoothed frame after `dropout_ms` of broken contact
/// followed by a slightly wider frame.
fn smoothed_right_edge_after_dropout(dropout_ms: f64) -> f32 {
    let mut p = never_rearmed(PolicyKind::AdaptiveContact);
    run(&mut p, &contact_frame(0.0), 0.0, 100.0, 20.0, None);
    let broken = run(&mut p, &contact_frame(0.3), 120.0, 100.0 + dropout_ms, 20.0, None);
    for (t, r) in &broken {
        assert!(!r.candidate_valid, "at {t} ms");
        assert_eq!(r.smoothed, None);
    }
    let r = p.tick(&contact_frame(0.02), frame(), 120.0 + dropout_ms);
    assert!(r.candidate_valid);
    r.smoothed.expect("smoothed").corners[1].x
}

#[test]
fn short_contact_dropout_keeps_history() {
    // Two old frames (right edge 0.70) and the new one (0.72).
    let edge = smoothed_right_edge_after_dropout(100.0);
    assert_abs_diff_eq!(edge, (0.70 + 0.70 + 0.72) / 3.0, epsilon = 1e-5);
}

#[test]
fn long_contact_dropout_restarts_history() {
    let edge = smoothed_right_edge_after_dropout(300.0);
    assert_abs_diff_eq!(edge, 0.72, epsilon = 1e-5);
}

#[test]
fn reset_drops_capture_and_history_but_keeps_ticket_numbering() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let first = run(&mut p, &cross_frame(), 0.0, 200.0, 20.0, None);
    let stale = first
        .iter()
        .find_map(|(_, r)| r.capture.as_ref())
        .expect("first capture")
        .ticket;
    assert_eq!(p.capture_in_flight(), Some(stale));

    p.reset();
    assert_eq!(p.state(), GestureState::NoHands);
    assert!(p.capture_in_flight().is_none());
    assert_eq!(
        p.finish_capture(stale, CaptureOutcome::Completed, 210.0),
        Err(CaptureError::NotInFlight { ticket: stale })
    );

    let second = run(&mut p, &cross_frame(), 220.0, 600.0, 20.0, Some(50.0));
    assert_eq!(second[0].1.state, GestureState::Holding);
    assert_eq!(capture_times(&second), vec![340.0]);
    let ticket = second
        .iter()
        .find_map(|(_, r)| r.capture.as_ref())
        .expect("second capture")
        .ticket;
    assert_eq!(ticket.id(), stale.id() + 1);
}

#[test]
fn crop_of_centre_box_matches_pixels() {
    let hands = vec![
        hand((0.8, 0.2), (0.2, 0.8), Handedness::Left),
        hand((0.2, 0.8), (0.8, 0.2), Handedness::Right),
    ];
    let mut p = pipeline(PolicyKind::ProximityRect);
    let source = FrameSize::new(1000, 500);
    let mut capture = None;
    for i in 0..30 {
        let r = p.tick(&hands, source, i as f64 * 10.0);
        if r.capture.is_some() {
            capture = r.capture;
            break;
        }
    }
    let capture = capture.expect("capture");
    assert_eq!(
        capture.crop.region,
        CropRegion::Rect(PixelRect {
            x: 200,
            y: 100,
            width: 600,
            height: 300,
        })
    );
    assert!(!capture.crop.fallback);
    assert_eq!(capture.frame, source);
}

#[test]
fn degenerate_inputs_never_form_a_frame() {
    let coincident = vec![
        hand((0.5, 0.5), (0.5, 0.5), Handedness::Left),
        hand((0.5, 0.5), (0.5, 0.5), Handedness::Right),
    ];
    let broken = HandObservation::new(vec![Landmark::new(0.5, 0.5, 0.0)], Handedness::Left, 1.0);
    let mut nan_tip = cross_frame()[1].clone();
    nan_tip.landmarks[8].x = f32::NAN;
    let crowd = [cross_frame(), open_frame(0.3)].concat();

    let framed = cross_frame();
    let cases: Vec<(Vec<HandObservation>, GestureState)> = vec![
        (Vec::new(), GestureState::NoHands),
        (framed[..1].to_vec(), GestureState::OneHand),
        (vec![broken, framed[0].clone()], GestureState::OneHand),
        (vec![framed[0].clone(), nan_tip], GestureState::OneHand),
        (coincident, GestureState::Forming),
        (crowd, GestureState::Forming),
    ];

    for kind in PolicyKind::ALL {
        let mut p = pipeline(kind);
        for (i, (hands, expected)) in cases.iter().enumerate() {
            for j in 0..5 {
                let r = p.tick(hands, frame(), (i * 5 + j) as f64 * 20.0);
                assert!(!r.candidate_valid, "{kind} case {i}");
                assert!(r.capture.is_none());
                assert_eq!(r.state, *expected, "{kind} case {i}");
            }
        }
    }
}

#[test]
fn failed_export_does_not_wedge_the_gate() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    let first = run(&mut p, &cross_frame(), 0.0, 110.0, 10.0, None);
    let ticket = first[11].1.capture.as_ref().expect("capture").ticket;

    let finished = p
        .finish_capture(
            ticket,
            CaptureOutcome::Failed {
                reason: "encoder unavailable".to_string(),
            },
            150.0,
        )
        .expect("gate released");
    assert_eq!(finished.duration_ms, 40.0);
    assert!(p.capture_in_flight().is_none());

    run(&mut p, &[], 160.0, 200.0, 10.0, None);
    let again = run(&mut p, &cross_frame(), 600.0, 800.0, 10.0, None);
    assert_eq!(capture_times(&again), vec![710.0]);
}

#[test]
fn stuck_export_is_released_after_timeout() {
    let mut params = FramePipelineParams::for_policy(PolicyKind::ProximityRect);
    params.debounce.capture_timeout_ms = Some(1000.0);
    let mut p = FramePipeline::new(params).expect("params");

    let results = run(&mut p, &cross_frame(), 0.0, 2000.0, 10.0, None);
    let captures = capture_times(&results);
    assert_eq!(captures, vec![110.0]);
    let released: Vec<_> = results
        .iter()
        .filter_map(|(t, r)| r.released.as_ref().map(|f| (*t, f.clone())))
        .collect();
    assert_eq!(released.len(), 1);
    let (t, finished) = &released[0];
    assert_eq!(*t, 1110.0);
    assert_eq!(finished.outcome, CaptureOutcome::TimedOut);
    assert!(p.capture_in_flight().is_none());

    let ticket = results[11].1.capture.as_ref().expect("capture").ticket;
    assert_eq!(
        p.finish_capture(ticket, CaptureOutcome::Completed, 2100.0),
        Err(CaptureError::NotInFlight { ticket })
    );
}

#[test]
fn reconfigure_switches_policy_and_drops_history() {
    let mut p = pipeline(PolicyKind::ProximityRect);
    run(&mut p, &cross_frame(), 0.0, 50.0, 10.0, None);
    p.reconfigure(FramePipelineParams::for_policy(PolicyKind::DirectConnect))
        .expect("reconfigure");
    assert_eq!(p.params().policy.kind(), PolicyKind::DirectConnect);
    assert_eq!(p.state(), GestureState::NoHands);
    let r = p.tick(&open_frame(0.30), frame(), 60.0);
    assert_eq!(r.state, GestureState::Holding);
    assert_eq!(r.score, None);
}
