use std::fs;

use chrono::{TimeZone, Utc};
use poseyoga_core::{
    builtin_catalog, find_pose, load_bundle, load_catalog, load_config, parse_catalog, save_bundle, save_config,
    EngineConfig, EngineError, Joint, LevelResult, ResultBundle, ScoreClass, SessionSummary, DEFAULT_BUNDLE_FILE,
};

#[test]
fn builtin_catalog_has_five_levels() {
    let cat = builtin_catalog();
    assert_eq!(cat.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert!(cat.iter().all(|p| p.angles.len() == 8));

    let warrior = find_pose(&cat, 2).unwrap();
    assert_eq!(warrior.angles[&Joint::LKnee], 90.0);
    assert_eq!(warrior.tolerances[&Joint::LKnee], 25.0);
    assert_eq!(warrior.weights[&Joint::LKnee], 1.4);
    assert!(matches!(find_pose(&cat, 42), Err(EngineError::UnknownPose(42))));
}

#[test]
fn catalog_json_accepts_short_field_names() {
    let json_in = r#"[{
        "id": 10, "name": "Half Moon", "desc": "balance", "image": "moon.png",
        "angles": {"LKnee": 175, "RHip": 90},
        "tolerances": {"LKnee": 20}
    }]"#;
    let cat = parse_catalog(json_in).expect("gyldig katalog");
    assert_eq!(cat[0].description, "balance");
    assert_eq!(cat[0].image_ref, "moon.png");
    assert_eq!(cat[0].tolerance_for(Joint::RHip, 40.0), 40.0);
}

#[test]
fn catalog_validation_errors() {
    let dup = r#"[{"id": 1, "name": "a", "angles": {"LKnee": 90}},
                  {"id": 1, "name": "b", "angles": {"LKnee": 90}}]"#;
    assert!(matches!(parse_catalog(dup), Err(EngineError::Catalog(_))));

    let orphan_tol = r#"[{"id": 1, "name": "a", "angles": {"LKnee": 90}, "tolerances": {"RKnee": 20}}]"#;
    assert!(matches!(parse_catalog(orphan_tol), Err(EngineError::Catalog(_))));

    let zero_weight = r#"[{"id": 1, "name": "a", "angles": {"LKnee": 90}, "weights": {"LKnee": 0}}]"#;
    assert!(matches!(parse_catalog(zero_weight), Err(EngineError::Catalog(_))));

    assert!(matches!(parse_catalog("[]"), Err(EngineError::Catalog(_))));

    match parse_catalog(r#"[{"id": 1, "name": "a", "angles": {"LToe": 90}}]"#) {
        Err(EngineError::Parse { path, .. }) => assert!(path.contains("angles"), "sti: {path}"),
        other => panic!("forventet Parse-feil, fikk {other:?}"),
    }
}

#[test]
fn load_catalog_from_disk() {
    let path = "tests/tmp_catalog.json";
    let _ = fs::remove_file(path);
    fs::write(path, serde_json::to_string(&builtin_catalog()).unwrap()).unwrap();

    let cat = load_catalog(path).expect("kunne ikke laste katalog");
    assert_eq!(cat, builtin_catalog());

    let _ = fs::remove_file(path);
    assert!(load_catalog(path).is_err());
}

#[test]
fn config_save_load_and_defaults() {
    let path = "tests/tmp_config.json";
    let _ = fs::remove_file(path);

    // manglende fil → default
    assert_eq!(load_config(path).unwrap(), EngineConfig::default());

    let cfg = EngineConfig { smoothing_window: 10, hold_duration_ms: 20_000, ..EngineConfig::default() };
    save_config(&cfg, path).expect("save_config failed");
    assert_eq!(load_config(path).expect("load_config failed"), cfg);

    fs::write(path, r#"{"in_pose_threshold": "high"}"#).unwrap();
    let err = load_config(path).unwrap_err();
    assert!(format!("{err:#}").contains("in_pose_threshold"), "{err:#}");

    let _ = fs::remove_file(path);
}

#[test]
fn bundle_roundtrip_and_missing_file() {
    let path = "tests/tmp_bundle.json";
    let _ = fs::remove_file(path);
    assert!(load_bundle(path).unwrap().is_none());

    let result = LevelResult {
        pose_id: 1,
        pose_name: "Tree Pose (Vrksāsana)".into(),
        final_score: 80,
        percent: 80,
        hold_passed: true,
        hold_ratio: 0.9,
        frames: 900,
        feedback_text: "Nice hold!".into(),
        tips: None,
        per_joint_summary: Vec::new(),
    };
    let bundle = ResultBundle {
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        summary: SessionSummary {
            average: 80.0,
            final_score: 80,
            classification: ScoreClass::Good,
            scored: 1,
            skipped: 1,
            total_poses: 2,
        },
        results: vec![Some(result), None],
    };
    save_bundle(&bundle, path).expect("save_bundle failed");
    let loaded = load_bundle(path).unwrap().expect("bundle finnes");
    assert_eq!(loaded, bundle);

    let _ = fs::remove_file(path);
    assert_eq!(DEFAULT_BUNDLE_FILE, "poseyoga-results.json");
}
