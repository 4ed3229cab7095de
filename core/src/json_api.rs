// JSON inn/ut for bindinger (Python) og andre klienter uten Rust-typer.
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::catalog::builtin_catalog;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::feedback::pose_correction;
use crate::hold::FinalScore;
use crate::normalize::{frame_angles, RawFrame};
use crate::session::{mean_of_scored, ScoreClass};
use crate::similarity::score;
use crate::types::{AngleMap, ReferencePose};

fn parse<T: DeserializeOwned>(json_in: &str) -> Result<T, EngineError> {
    let mut de = serde_json::Deserializer::from_str(json_in);
    serde_path_to_error::deserialize(&mut de).map_err(EngineError::from_path_error)
}

fn parse_cfg(cfg_json: Option<&str>) -> Result<EngineConfig, EngineError> {
    let cfg = match cfg_json {
        Some(s) if !s.trim().is_empty() => parse::<EngineConfig>(s)?,
        _ => EngineConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Rå frame (`{"sensor": "optical" | "depth_body", ...}`) → vinkelkart.
pub fn angles_from_frame_json(frame_json: &str) -> Result<String, EngineError> {
    let frame: RawFrame = parse(frame_json)?;
    Ok(serde_json::to_string(&frame_angles(&frame))?)
}

/// Vinkelkart + pose → SimilarityResult.
pub fn score_json(angles_json: &str, pose_json: &str, cfg_json: Option<&str>) -> Result<String, EngineError> {
    let angles: AngleMap = parse(angles_json)?;
    let pose: ReferencePose = parse(pose_json)?;
    let cfg = parse_cfg(cfg_json)?;
    Ok(serde_json::to_string(&score(&angles, &pose, &cfg))?)
}

/// Vinkelkart + pose → `{message, severity, corrections}` eller `null`.
pub fn feedback_json(angles_json: &str, pose_json: &str, top_n: usize) -> Result<String, EngineError> {
    let angles: AngleMap = parse(angles_json)?;
    let pose: ReferencePose = parse(pose_json)?;
    let cfg = EngineConfig::default();
    let out = pose_correction(&angles, &pose, top_n, &cfg);
    Ok(serde_json::to_string(&out)?)
}

/// Sluttscore fra snittlikhet og frame-tellere.
pub fn final_score_json(
    avg_similarity: f64,
    in_pose_frames: usize,
    total_frames: usize,
    cfg_json: Option<&str>,
) -> Result<String, EngineError> {
    let cfg = parse_cfg(cfg_json)?;
    Ok(serde_json::to_string(&FinalScore::compute(avg_similarity, in_pose_frames, total_frames, &cfg))?)
}

/// `[80, null, 60]` → `{"average": 70.0, "final_score": 70, "classification": "good"}`.
pub fn session_average_json(scores_json: &str, cfg_json: Option<&str>) -> Result<String, EngineError> {
    let scores: Vec<Option<u32>> = parse(scores_json)?;
    let cfg = parse_cfg(cfg_json)?;
    let average = mean_of_scored(scores.iter().copied());
    let class = ScoreClass::classify(average, &cfg.bands);
    let out: Value = json!({
        "average": average,
        "final_score": average.round() as u32,
        "classification": class,
        "label": class.label(),
    });
    Ok(out.to_string())
}

pub fn builtin_catalog_json() -> Result<String, EngineError> {
    Ok(serde_json::to_string(&builtin_catalog())?)
}
