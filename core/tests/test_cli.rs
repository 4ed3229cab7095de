use poseyoga_core::cli::{level_report, session_report};
use poseyoga_core::{Joint, JointSummary, LevelResult, ScoreBands, ScoreClass, SessionSummary};

fn result(score: u32, passed: bool) -> LevelResult {
    LevelResult {
        pose_id: 2,
        pose_name: "Warrior II (Virabhadrāsana II)".into(),
        final_score: score,
        percent: 90,
        hold_passed: passed,
        hold_ratio: if passed { 0.8 } else { 0.5 },
        frames: 600,
        feedback_text: "L Knee: 50°".into(),
        tips: Some("straighten your left leg more (off by 50°)".into()),
        per_joint_summary: vec![JointSummary { joint: Joint::LKnee, target: 90.0, avg_angle: Some(140.0), avg_diff: 50.0 }],
    }
}

#[test]
fn level_report_contains_score_and_tips() {
    let text = level_report(&result(90, true), &ScoreBands::default());
    assert!(text.contains("Warrior II"));
    assert!(text.contains("Score: 90 (Excellent)"));
    assert!(text.contains("Hold: 80% (passed)"));
    assert!(text.contains("  - straighten your left leg more (off by 50°)"));
    assert!(text.contains("L Knee"));
}

#[test]
fn session_report_marks_skipped_levels() {
    let summary = SessionSummary {
        average: 72.0,
        final_score: 72,
        classification: ScoreClass::Good,
        scored: 1,
        skipped: 1,
        total_poses: 2,
    };
    let text = session_report(&summary, &[Some(result(72, false)), None]);
    assert!(text.contains("Level 1: Warrior II (Virabhadrāsana II) → 72"));
    assert!(text.contains("Level 2: skipped"));
    assert!(text.contains("Final: 72 (Good, 1 scored, 1 skipped)"));
}
