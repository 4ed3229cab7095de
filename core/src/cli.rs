use std::fmt::Write;

use crate::config::ScoreBands;
use crate::session::{ScoreClass, SessionSummary};
use crate::types::LevelResult;

/// Tekstrapport for én pose (score-skjermen).
pub fn level_report(result: &LevelResult, bands: &ScoreBands) -> String {
    let class = ScoreClass::classify(f64::from(result.final_score), bands);
    let mut out = String::new();
    let _ = writeln!(out, "--- {} ---", result.pose_name);
    let _ = writeln!(out, "Score: {} ({})", result.final_score, class.label());
    let _ = writeln!(
        out,
        "Accuracy: {}%  Hold: {:.0}% ({})  Frames: {}",
        result.percent,
        result.hold_ratio * 100.0,
        if result.hold_passed { "passed" } else { "not held" },
        result.frames
    );
    let _ = writeln!(out, "Summary: {}", result.feedback_text);
    if let Some(tips) = &result.tips {
        let _ = writeln!(out, "What to improve:");
        for line in tips.lines() {
            let _ = writeln!(out, "  - {line}");
        }
    }
    for j in &result.per_joint_summary {
        let avg = j.avg_angle.map_or_else(|| "-".to_string(), |a| format!("{:.0}°", a));
        let _ = writeln!(
            out,
            "  {:<11} avg {} (Δ {:.0}°, target {:.0}°)",
            j.joint.label(),
            avg,
            j.avg_diff,
            j.target
        );
    }
    out
}

/// Tekstrapport for hele sesjonen (slutt-skjermen).
pub fn session_report(summary: &SessionSummary, results: &[Option<LevelResult>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Session Report ---");
    for (i, r) in results.iter().enumerate() {
        match r {
            Some(r) => {
                let _ = writeln!(out, "Level {}: {} → {}", i + 1, r.pose_name, r.final_score);
            }
            None => {
                let _ = writeln!(out, "Level {}: skipped", i + 1);
            }
        }
    }
    let _ = writeln!(
        out,
        "Final: {} ({}, {} scored, {} skipped)",
        summary.final_score,
        summary.classification.label(),
        summary.scored,
        summary.skipped
    );
    out
}

pub fn print_session_report(summary: &SessionSummary, results: &[Option<LevelResult>]) {
    print!("{}", session_report(summary, results));
}
