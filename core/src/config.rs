use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Terskler for klassifisering av snittscore (0–100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBands {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self { excellent: 85.0, good: 70.0, fair: 55.0 }
    }
}

/// Alle justerbare konstanter for motoren. Manglende felt i JSON får default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Antall frames i rullende snitt (N).
    pub smoothing_window: usize,
    /// Glattet likhet ≥ denne teller som "i posen".
    pub in_pose_threshold: f64,
    pub hold_duration_ms: u64,
    /// Andel frames i posen som kreves for bestått hold.
    pub hold_pass_ratio: f64,
    /// Faktor på prosent når hold ikke er bestått (0.8 = 20 % trekk).
    pub hold_penalty_factor: f64,
    pub countdown_ticks: u32,
    pub countdown_tick_ms: u64,
    pub bands: ScoreBands,
    pub default_tolerance_deg: f64,
    pub default_weight: f64,
    /// Diff brukt for ledd som ikke er målt.
    pub missing_joint_diff_deg: f64,
    pub feedback_window_ms: u64,
    pub live_feedback_top_n: usize,
    pub summary_feedback_top_n: usize,
    pub high_severity_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 6,
            in_pose_threshold: 0.70,
            hold_duration_ms: 30_000,
            hold_pass_ratio: 0.70,
            hold_penalty_factor: 0.8,
            countdown_ticks: 3,
            countdown_tick_ms: 1_000,
            bands: ScoreBands::default(),
            default_tolerance_deg: 40.0,
            default_weight: 1.0,
            missing_joint_diff_deg: 180.0,
            feedback_window_ms: 1_000,
            live_feedback_top_n: 2,
            summary_feedback_top_n: 3,
            high_severity_deg: 45.0,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.smoothing_window == 0 {
            return Err(EngineError::Config("smoothing_window must be >= 1".into()));
        }
        if self.hold_duration_ms == 0 {
            return Err(EngineError::Config("hold_duration_ms must be > 0".into()));
        }
        for (name, v) in [
            ("in_pose_threshold", self.in_pose_threshold),
            ("hold_pass_ratio", self.hold_pass_ratio),
            ("hold_penalty_factor", self.hold_penalty_factor),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EngineError::Config(format!("{name} must be within [0, 1], got {v}")));
            }
        }
        if !(self.default_tolerance_deg.is_finite() && self.default_tolerance_deg > 0.0) {
            return Err(EngineError::Config("default_tolerance_deg must be > 0".into()));
        }
        if !(self.default_weight.is_finite() && self.default_weight > 0.0) {
            return Err(EngineError::Config("default_weight must be > 0".into()));
        }
        let b = self.bands;
        if !(b.excellent >= b.good && b.good >= b.fair) {
            return Err(EngineError::Config(format!(
                "score bands must be descending, got {}/{}/{}",
                b.excellent, b.good, b.fair
            )));
        }
        Ok(())
    }
}

/// Leser konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<EngineConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("⚠️ Fant ikke konfig på {}, bruker default", path.display());
        return Ok(EngineConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese konfig {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    let cfg: EngineConfig = serde_path_to_error::deserialize(&mut de)
        .map_err(EngineError::from_path_error)
        .with_context(|| format!("ugyldig konfig {}", path.display()))?;
    cfg.validate()?;
    info!(
        "📂 Konfig lastet fra {} (window={}, hold={} ms)",
        path.display(),
        cfg.smoothing_window,
        cfg.hold_duration_ms
    );
    Ok(cfg)
}

/// Lagrer konfig som JSON (pretty-print).
pub fn save_config<P: AsRef<Path>>(cfg: &EngineConfig, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).with_context(|| format!("kunne ikke skrive {}", path.display()))?;
    info!("✅ Konfig lagret til {}", path.display());
    Ok(())
}
