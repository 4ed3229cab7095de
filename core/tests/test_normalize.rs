use std::collections::BTreeMap;

use poseyoga_core::normalize::{depth_name, optical_index};
use poseyoga_core::{
    frame_angles, normalize, Joint, JointPosition, Landmark, RawFrame, SensorKind, TrackingState,
};

fn optical_with(points: &[(Landmark, f64, f64)]) -> RawFrame {
    let mut landmarks = vec![None; 33];
    for &(lm, x, y) in points {
        landmarks[optical_index(lm)] = Some(JointPosition::new(x, y, 0.0));
    }
    RawFrame::Optical { landmarks }
}

#[test]
fn optical_leg_gives_knee_and_nothing_else() {
    let frame = optical_with(&[
        (Landmark::LeftHip, 0.4, 0.5),
        (Landmark::LeftKnee, 0.4, 0.7),
        (Landmark::LeftAnkle, 0.6, 0.7),
    ]);
    assert_eq!(frame.kind(), SensorKind::Optical);

    let angles = frame_angles(&frame);
    assert_eq!(angles.len(), 1);
    assert!((angles[&Joint::LKnee] - 90.0).abs() < 1e-9);
    // manglende landemerker gir fravær, ikke 0°
    assert!(!angles.contains_key(&Joint::LHip));
}

#[test]
fn optical_skips_non_finite_positions() {
    let mut frame = optical_with(&[(Landmark::LeftHip, 0.4, 0.5), (Landmark::LeftKnee, 0.4, 0.7)]);
    if let RawFrame::Optical { landmarks } = &mut frame {
        landmarks[optical_index(Landmark::LeftAnkle)] = Some(JointPosition::new(f64::NAN, 0.7, 0.0));
    }
    let sk = normalize(&frame);
    assert_eq!(sk.len(), 2);
    assert!(frame_angles(&frame).is_empty());
}

#[test]
fn short_landmark_list_is_not_an_error() {
    let frame = RawFrame::Optical { landmarks: vec![Some(JointPosition::new(0.1, 0.1, 0.0)); 5] };
    assert!(normalize(&frame).is_empty());
}

#[test]
fn depth_drops_not_tracked_and_keeps_inferred() {
    let mut joints = BTreeMap::new();
    let put = |j: &mut BTreeMap<String, JointPosition>, lm, x, y, s| {
        j.insert(depth_name(lm).to_string(), JointPosition::new(x, y, 2.0).with_tracking(s));
    };
    put(&mut joints, Landmark::RightHip, 0.15, -0.5, TrackingState::Tracked);
    put(&mut joints, Landmark::RightKnee, 0.15, -0.9, TrackingState::Inferred);
    put(&mut joints, Landmark::RightAnkle, 0.15, -1.2, TrackingState::Tracked);
    put(&mut joints, Landmark::LeftHip, -0.15, -0.5, TrackingState::Tracked);
    put(&mut joints, Landmark::LeftKnee, -0.15, -0.9, TrackingState::NotTracked);
    put(&mut joints, Landmark::LeftAnkle, -0.15, -1.2, TrackingState::Tracked);

    let frame = RawFrame::DepthBody { tracked: true, joints };
    let sk = normalize(&frame);
    assert!(sk.contains_key(&Landmark::RightKnee));
    assert!(!sk.contains_key(&Landmark::LeftKnee));

    let angles = frame_angles(&frame);
    assert!((angles[&Joint::RKnee] - 180.0).abs() < 1e-9);
    assert!(!angles.contains_key(&Joint::LKnee));
}

#[test]
fn untracked_body_gives_empty_skeleton() {
    let mut joints = BTreeMap::new();
    joints.insert("KneeLeft".to_string(), JointPosition::new(0.0, 0.0, 2.0));
    let frame = RawFrame::DepthBody { tracked: false, joints };
    assert!(normalize(&frame).is_empty());
}

#[test]
fn depth_frame_from_json_with_numeric_tracking_state() {
    let json_in = r#"{
        "sensor": "depth_body",
        "joints": {
            "HipLeft":   {"x": -0.15, "y": -0.5, "z": 2.0, "trackingState": 2},
            "KneeLeft":  {"x": -0.15, "y": -0.9, "z": 2.0, "trackingState": 1},
            "AnkleLeft": {"x": 0.25,  "y": -0.9, "z": 2.0, "trackingState": 2}
        }
    }"#;
    let frame: RawFrame = serde_json::from_str(json_in).expect("gyldig dybdeframe");
    assert_eq!(frame.kind(), SensorKind::DepthBody);
    let angles = frame_angles(&frame);
    assert!((angles[&Joint::LKnee] - 90.0).abs() < 1e-9);
}

#[test]
fn unknown_tracking_code_is_rejected() {
    let bad = r#"{"x": 0.0, "y": 0.0, "trackingState": 7}"#;
    assert!(serde_json::from_str::<JointPosition>(bad).is_err());
}

#[test]
fn indexed_depth_list_maps_kinect_joint_types() {
    let mut list = vec![None; 25];
    list[12] = Some(JointPosition::new(-0.15, -0.5, 2.0)); // HipLeft
    list[13] = Some(JointPosition::new(-0.15, -0.9, 2.0)); // KneeLeft
    list[14] = Some(JointPosition::new(-0.15, -1.2, 2.0)); // AnkleLeft
    let frame = RawFrame::depth_from_indexed(&list);
    let sk = normalize(&frame);
    assert_eq!(sk.len(), 3);
    assert!((frame_angles(&frame)[&Joint::LKnee] - 180.0).abs() < 1e-9);
}
