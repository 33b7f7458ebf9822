use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_slide_spans_its_audio() {
    let tl = Timeline::compute(&[2.75], DEFAULT_TRANSITION_SECS).unwrap();
    assert_eq!(tl.len(), 1);
    assert!(close(tl.total_sec, 2.75));
    assert!(close(tl.slides[0].start_sec, 0.0));
    assert!(close(tl.slides[0].duration_sec, 2.75));
}

#[test]
fn single_slide_ignores_transition_longer_than_audio() {
    let tl = Timeline::compute(&[0.3], 0.5).unwrap();
    assert!(close(tl.total_sec, 0.3));
}

#[test]
fn two_slides_overlap_by_transition() {
    let tl = Timeline::compute(&[4.0, 2.5], 0.5).unwrap();
    assert!(close(tl.slides[1].start_sec, 3.5));
    assert!(close(tl.total_sec, 6.0));
    assert!(close(tl.slides[0].duration_sec, 4.0));
    assert!(close(tl.slides[1].duration_sec, 2.5));
}

#[test]
fn three_slide_reference_timeline() {
    let tl = Timeline::compute(&[4.0, 3.0, 5.0], 0.5).unwrap();
    let starts = tl.start_times();
    assert!(close(starts[0], 0.0));
    assert!(close(starts[1], 3.5));
    assert!(close(starts[2], 6.0));
    assert!(close(tl.total_sec, 11.0));
    assert!(close(tl.slides[2].end_sec(), 11.0));
    assert_eq!(
        tl.slides.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn starts_are_strictly_increasing_for_valid_inputs() {
    let durations = [0.6, 1.0, 7.25, 0.51, 3.0, 2.0];
    let tl = Timeline::compute(&durations, 0.5).unwrap();
    for pair in tl.slides.windows(2) {
        assert!(pair[1].start_sec > pair[0].start_sec);
    }
    assert!(tl.slides.iter().all(|s| s.duration_sec > 0.0));
}

#[test]
fn zero_transition_concatenates() {
    let tl = Timeline::compute(&[1.0, 2.0, 3.0], 0.0).unwrap();
    assert_eq!(tl.start_times(), vec![0.0, 1.0, 3.0]);
    assert!(close(tl.total_sec, 6.0));
}

#[test]
fn empty_input_is_empty_timeline_error() {
    assert!(matches!(
        Timeline::compute(&[], 0.5),
        Err(ReelError::EmptyTimeline)
    ));
}

#[test]
fn overlap_not_shorter_than_audio_is_rejected() {
    let err = Timeline::compute(&[4.0, 0.5, 3.0], 0.5).unwrap_err();
    assert_eq!(err.slide(), Some(1));
    assert!(matches!(err, ReelError::Validation { .. }));
}

#[test]
fn bad_durations_and_transitions_are_rejected() {
    assert_eq!(
        Timeline::compute(&[1.0, 0.0], 0.1).unwrap_err().slide(),
        Some(1)
    );
    assert_eq!(
        Timeline::compute(&[f64::NAN], 0.1).unwrap_err().slide(),
        Some(0)
    );
    assert!(Timeline::compute(&[1.0], -0.1).is_err());
    assert!(Timeline::compute(&[1.0], f64::INFINITY).is_err());
}

#[test]
fn timeline_serializes_to_json() {
    let tl = Timeline::compute(&[4.0, 3.0], 0.5).unwrap();
    let v = serde_json::to_value(&tl).unwrap();
    assert_eq!(v["slides"][1]["start_sec"], 3.5);
    assert_eq!(v["total_sec"], 6.5);
}
