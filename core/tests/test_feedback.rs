use std::collections::BTreeMap;
use std::time::Duration;

use poseyoga_core::feedback::{instruction, summary_line};
use poseyoga_core::{
    pose_correction, AngleMap, EngineConfig, FeedbackThrottle, Joint, JointSummary, LiveFeedback, ReferencePose,
    Severity,
};

fn pose(angles: &[(Joint, f64, f64)]) -> ReferencePose {
    ReferencePose {
        id: 7,
        name: "Test".into(),
        description: String::new(),
        image_ref: String::new(),
        angles: angles.iter().map(|&(j, a, _)| (j, a)).collect(),
        tolerances: angles.iter().map(|&(j, _, t)| (j, t)).collect(),
        weights: BTreeMap::new(),
    }
}

#[test]
fn knee_overextended_gives_high_severity() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0)]);
    let angles = AngleMap::from([(Joint::LKnee, 140.0)]);
    let fb = pose_correction(&angles, &p, 2, &EngineConfig::default()).expect("knær utenfor toleranse");

    assert_eq!(fb.corrections.len(), 1);
    assert_eq!(fb.corrections[0].instruction, "straighten your left leg more");
    assert_eq!(fb.corrections[0].difference, 50);
    assert_eq!(fb.severity, Severity::High);
    assert_eq!(fb.message, "straighten your left leg more (off by 50°)");
}

#[test]
fn within_tolerance_gives_none() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0), (Joint::RShoulder, 90.0, 25.0)]);
    let angles = AngleMap::from([(Joint::LKnee, 100.0), (Joint::RShoulder, 70.0)]);
    assert!(pose_correction(&angles, &p, 2, &EngineConfig::default()).is_none());
}

#[test]
fn worst_first_and_truncated_to_top_n() {
    let p = pose(&[
        (Joint::LShoulder, 90.0, 20.0),
        (Joint::RElbow, 170.0, 20.0),
        (Joint::RHip, 170.0, 20.0),
    ]);
    let angles = AngleMap::from([(Joint::LShoulder, 50.0), (Joint::RElbow, 100.0), (Joint::RHip, 140.0)]);
    let fb = pose_correction(&angles, &p, 2, &EngineConfig::default()).expect("tre avvik");

    assert_eq!(fb.corrections.len(), 2);
    assert_eq!(fb.corrections[0].joint, Joint::RElbow);
    assert_eq!(fb.corrections[1].joint, Joint::LShoulder);
    assert_eq!(fb.severity, Severity::High);
    assert_eq!(fb.message, "bend your right elbow more (off by 70°)\nraise your left arm (off by 40°)");
}

#[test]
fn medium_when_worst_is_at_most_45() {
    let p = pose(&[(Joint::RHip, 170.0, 20.0)]);
    let angles = AngleMap::from([(Joint::RHip, 125.0)]);
    let fb = pose_correction(&angles, &p, 2, &EngineConfig::default()).expect("hofte utenfor");
    assert_eq!(fb.corrections[0].difference, 45);
    assert_eq!(fb.severity, Severity::Medium);
    assert_eq!(fb.corrections[0].instruction, "raise your right hip");
}

#[test]
fn direction_words() {
    assert_eq!(instruction(Joint::LShoulder, 120.0, 90.0), "lower your left arm");
    assert_eq!(instruction(Joint::RHip, 100.0, 120.0), "raise your right hip");
    assert_eq!(instruction(Joint::LElbow, 170.0, 90.0), "straighten your left arm more");
    assert_eq!(instruction(Joint::RKnee, 60.0, 90.0), "bend your right knee more");
}

#[test]
fn summary_lists_top_three_or_praises() {
    let js = |joint, d| JointSummary { joint, target: 90.0, avg_angle: Some(90.0 + d), avg_diff: d };
    let rows = vec![js(Joint::LKnee, 50.2), js(Joint::RHip, 31.0), js(Joint::LElbow, 3.0), js(Joint::RKnee, 12.0)];
    assert_eq!(summary_line(&rows, 3), "L Knee: 50° • R Hip: 31° • R Knee: 12°");
    assert_eq!(summary_line(&[], 3), "Nice hold!");
}

#[test]
fn throttle_keeps_message_until_window_closes() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0)]);
    let cfg = EngineConfig::default();
    let bad = pose_correction(&AngleMap::from([(Joint::LKnee, 140.0)]), &p, 2, &cfg);
    let mut t = FeedbackThrottle::new(Duration::from_millis(1000));

    for ms in (0..1000).step_by(100) {
        assert_eq!(t.push(Duration::from_millis(ms), bad.clone()), LiveFeedback::Unchanged);
    }
    match t.push(Duration::from_millis(1000), None) {
        LiveFeedback::Show(f) => assert!(f.message.starts_with("straighten your left leg more")),
        other => panic!("forventet Show, fikk {other:?}"),
    }
    t.reset();
    assert_eq!(t.flush(), LiveFeedback::Unchanged);
}

#[test]
fn throttle_groups_jittering_degrees_as_one_correction() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0)]);
    let cfg = EngineConfig::default();
    let mut t = FeedbackThrottle::new(Duration::from_millis(1000));

    // 30 frames på ett sekund: 24 med kneet rundt 134–145°, 6 innenfor toleranse
    for i in 0..30u64 {
        let knee = if i % 5 == 4 { 100.0 } else { 134.0 + (i % 12) as f64 };
        let fb = pose_correction(&AngleMap::from([(Joint::LKnee, knee)]), &p, 2, &cfg);
        assert_eq!(t.push(Duration::from_millis(i * 33), fb), LiveFeedback::Unchanged);
    }
    match t.push(Duration::from_millis(1000), None) {
        LiveFeedback::Show(f) => {
            assert_eq!(f.corrections.len(), 1);
            assert_eq!(f.corrections[0].instruction, "straighten your left leg more");
            // siste frame med korreksjon (i = 28, 134 + 4 = 138°)
            assert_eq!(f.corrections[0].difference, 48);
        }
        other => panic!("24 av 30 frames trenger korreksjon, fikk {other:?}"),
    }
}

#[test]
fn throttle_clears_when_ok_frames_outnumber_corrections() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0)]);
    let cfg = EngineConfig::default();
    let mut t = FeedbackThrottle::new(Duration::from_millis(1000));
    for i in 0..10u64 {
        let knee = if i < 3 { 140.0 + i as f64 } else { 95.0 };
        t.push(Duration::from_millis(i * 50), pose_correction(&AngleMap::from([(Joint::LKnee, knee)]), &p, 2, &cfg));
    }
    assert_eq!(t.push(Duration::from_millis(1000), None), LiveFeedback::Clear);
}

#[test]
fn severity_uses_rounded_difference() {
    let p = pose(&[(Joint::LKnee, 90.0, 25.0)]);
    let fb = pose_correction(&AngleMap::from([(Joint::LKnee, 135.3)]), &p, 2, &EngineConfig::default()).unwrap();
    assert_eq!(fb.corrections[0].difference, 45);
    assert_eq!(fb.severity, Severity::Medium);
}
