use std::collections::BTreeMap;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::feedback::{pose_correction, summary_line};
use crate::smoothing::{mean, RollingMean};
use crate::types::{AngleMap, Joint, JointSummary, ReferencePose, SimilarityResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPhase {
    Idle,
    CountingDown { remaining: u32 },
    Holding { elapsed: Duration },
    Finished,
}

/// Summer for én hold-run. Opprettes ved start, oppdateres én gang per frame
/// og kastes ved slutt eller avbrudd.
#[derive(Debug, Clone)]
pub struct RunAccumulator {
    rolling: RollingMean,
    smoothed: Vec<f64>,
    total_frames: usize,
    in_pose_frames: usize,
    // (sum, antall) per ledd, fra rå (ikke glattet) resultat
    diff_sums: BTreeMap<Joint, (f64, usize)>,
    angle_sums: BTreeMap<Joint, (f64, usize)>,
}

impl RunAccumulator {
    pub fn new(window: usize) -> Self {
        Self {
            rolling: RollingMean::new(window),
            smoothed: Vec::new(),
            total_frames: 0,
            in_pose_frames: 0,
            diff_sums: BTreeMap::new(),
            angle_sums: BTreeMap::new(),
        }
    }

    /// Registrerer én frame og returnerer glattet likhet.
    pub fn record(&mut self, result: &SimilarityResult, in_pose_threshold: f64) -> f64 {
        let smooth = self.rolling.push(result.overall);
        self.smoothed.push(smooth);
        self.total_frames += 1;
        if smooth >= in_pose_threshold {
            self.in_pose_frames += 1;
        }

        for (&joint, js) in &result.joints {
            let d = self.diff_sums.entry(joint).or_insert((0.0, 0));
            d.0 += js.diff;
            d.1 += 1;
            if let Some(a) = js.angle {
                let s = self.angle_sums.entry(joint).or_insert((0.0, 0));
                s.0 += a;
                s.1 += 1;
            }
        }
        smooth
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn in_pose_frames(&self) -> usize {
        self.in_pose_frames
    }

    pub fn smoothed_values(&self) -> &[f64] {
        &self.smoothed
    }

    pub fn avg_similarity(&self) -> f64 {
        mean(&self.smoothed)
    }

    pub fn hold_ratio(&self) -> f64 {
        self.in_pose_frames as f64 / self.total_frames.max(1) as f64
    }

    /// Snittvinkler over run-en, kun for ledd som faktisk ble målt.
    pub fn average_angles(&self) -> AngleMap {
        self.angle_sums
            .iter()
            .map(|(&j, &(sum, n))| (j, sum / n.max(1) as f64))
            .collect()
    }

    /// Snitt per deklarert ledd som har minst én frame.
    pub fn joint_summaries(&self, pose: &ReferencePose) -> Vec<JointSummary> {
        pose.angles
            .iter()
            .filter_map(|(&joint, &target)| {
                let &(diff_sum, n) = self.diff_sums.get(&joint)?;
                let avg_angle = self.angle_sums.get(&joint).map(|&(s, k)| s / k.max(1) as f64);
                Some(JointSummary { joint, target, avg_angle, avg_diff: diff_sum / n.max(1) as f64 })
            })
            .collect()
    }
}

/// Sluttscore for en hold-run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub avg_similarity: f64,
    pub percent: u32,
    pub hold_ratio: f64,
    pub hold_passed: bool,
    pub final_score: u32,
}

impl FinalScore {
    /// percent = round(avg*100); ikke bestått hold gir round(percent * penalty).
    pub fn compute(avg_similarity: f64, in_pose_frames: usize, total_frames: usize, cfg: &EngineConfig) -> Self {
        let avg = if avg_similarity.is_finite() { avg_similarity.clamp(0.0, 1.0) } else { 0.0 };
        let percent = (avg * 100.0).round() as u32;
        let hold_ratio = in_pose_frames as f64 / total_frames.max(1) as f64;
        let hold_passed = hold_ratio >= cfg.hold_pass_ratio;
        let final_score = if hold_passed {
            percent
        } else {
            (f64::from(percent) * cfg.hold_penalty_factor).round() as u32
        };
        Self { avg_similarity: avg, percent, hold_ratio, hold_passed, final_score }
    }
}

/// Alt som kommer ut av en fullført run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub pose_id: u32,
    pub score: FinalScore,
    pub frames: usize,
    pub per_joint: Vec<JointSummary>,
    pub summary: String,
    pub tips: Option<String>,
}

/// Live-tall for UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveReadout {
    /// Glattet likhet under hold, ellers momentan likhet (0–100).
    pub similarity_pct: u32,
    /// Andel frames i posen så langt (0–100).
    pub hold_pct: u32,
    pub smoothed: bool,
}

/// Tilstandsmaskin Idle → CountingDown → Holding → Finished.
///
/// Drives av tre hendelser: frames (`on_frame`), nedtellings-tikk
/// (`countdown_tick`) og veggklokke (`advance`). Timerne er uavhengige av
/// frames, så en run fullføres også uten en eneste frame.
#[derive(Debug, Clone)]
pub struct HoldRun {
    cfg: EngineConfig,
    phase: HoldPhase,
    pose: Option<ReferencePose>,
    acc: RunAccumulator,
}

impl HoldRun {
    pub fn new(cfg: EngineConfig) -> Self {
        let acc = RunAccumulator::new(cfg.smoothing_window);
        Self { cfg, phase: HoldPhase::Idle, pose: None, acc }
    }

    pub fn phase(&self) -> HoldPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, HoldPhase::CountingDown { .. } | HoldPhase::Holding { .. })
    }

    pub fn accumulator(&self) -> &RunAccumulator {
        &self.acc
    }

    /// Starter nedtelling. `Ok(false)` hvis en run allerede pågår (no-op).
    pub fn begin(&mut self, pose: &ReferencePose, sensor_active: bool) -> Result<bool, EngineError> {
        if !sensor_active {
            warn!("⚠️ Avviser hold for pose {}: ingen aktiv sensor", pose.id);
            return Err(EngineError::NoActiveSensor);
        }
        if self.is_active() {
            debug!("begin ignorert, run pågår allerede ({:?})", self.phase);
            return Ok(false);
        }

        self.acc = RunAccumulator::new(self.cfg.smoothing_window);
        self.pose = Some(pose.clone());
        self.phase = if self.cfg.countdown_ticks == 0 {
            HoldPhase::Holding { elapsed: Duration::ZERO }
        } else {
            HoldPhase::CountingDown { remaining: self.cfg.countdown_ticks }
        };
        info!("▶️ Hold-run startet for pose {} ({})", pose.id, pose.name);
        Ok(true)
    }

    /// Ett nedtellings-tikk. Går til Holding når telleren når 0.
    pub fn countdown_tick(&mut self) {
        if let HoldPhase::CountingDown { remaining } = self.phase {
            let left = remaining.saturating_sub(1);
            debug!("nedtelling: {left}");
            self.phase = if left == 0 {
                HoldPhase::Holding { elapsed: Duration::ZERO }
            } else {
                HoldPhase::CountingDown { remaining: left }
            };
        }
    }

    /// Registrerer en scoret frame. Scorer kun i Holding.
    pub fn on_frame(&mut self, result: &SimilarityResult) -> LiveReadout {
        match self.phase {
            HoldPhase::Holding { .. } => {
                let smooth = self.acc.record(result, self.cfg.in_pose_threshold);
                LiveReadout {
                    similarity_pct: to_pct(smooth),
                    hold_pct: to_pct(self.acc.hold_ratio()),
                    smoothed: true,
                }
            }
            _ => LiveReadout {
                similarity_pct: to_pct(result.overall),
                hold_pct: to_pct(self.acc.hold_ratio()),
                smoothed: false,
            },
        }
    }

    /// Veggklokke-tikk. Returnerer utfallet når varigheten er nådd.
    pub fn advance(&mut self, dt: Duration) -> Option<RunOutcome> {
        let HoldPhase::Holding { elapsed } = self.phase else {
            return None;
        };
        let elapsed = elapsed.saturating_add(dt);
        if elapsed < self.duration() {
            self.phase = HoldPhase::Holding { elapsed };
            return None;
        }
        self.phase = HoldPhase::Finished;
        Some(self.finish())
    }

    fn finish(&mut self) -> RunOutcome {
        let acc = std::mem::replace(&mut self.acc, RunAccumulator::new(self.cfg.smoothing_window));
        let pose = self.pose.take();
        let score = FinalScore::compute(acc.avg_similarity(), acc.in_pose_frames(), acc.total_frames(), &self.cfg);

        let (pose_id, per_joint, tips) = match &pose {
            Some(p) => {
                let per_joint = acc.joint_summaries(p);
                let tips = pose_correction(&acc.average_angles(), p, self.cfg.summary_feedback_top_n, &self.cfg)
                    .map(|f| f.message);
                (p.id, per_joint, tips)
            }
            None => (0, Vec::new(), None),
        };
        let summary = if acc.total_frames() == 0 {
            "No pose detected during the hold.".to_string()
        } else {
            summary_line(&per_joint, self.cfg.summary_feedback_top_n)
        };

        info!(
            "🏁 Hold-run ferdig for pose {}: {} frames, snitt {:.3}, hold {:.0}%, score {}",
            pose_id,
            acc.total_frames(),
            score.avg_similarity,
            score.hold_ratio * 100.0,
            score.final_score
        );

        RunOutcome { pose_id, score, frames: acc.total_frames(), per_joint, summary, tips }
    }

    /// Avbryt (skip/reset/exit) fra hvilken som helst tilstand. Returnerer
    /// true hvis en run var i gang.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = HoldPhase::Idle;
        self.pose = None;
        self.acc = RunAccumulator::new(self.cfg.smoothing_window);
        if was_active {
            info!("⏹️ Hold-run avbrutt");
        }
        was_active
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.cfg.hold_duration_ms)
    }

    /// elapsed/duration i [0, 1].
    pub fn progress(&self) -> f64 {
        match self.phase {
            HoldPhase::Holding { elapsed } => {
                (elapsed.as_secs_f64() / self.duration().as_secs_f64().max(f64::EPSILON)).clamp(0.0, 1.0)
            }
            HoldPhase::Finished => 1.0,
            _ => 0.0,
        }
    }

    pub fn remaining(&self) -> Duration {
        match self.phase {
            HoldPhase::Holding { elapsed } => self.duration().saturating_sub(elapsed),
            HoldPhase::Finished => Duration::ZERO,
            _ => self.duration(),
        }
    }

    pub fn status_label(&self) -> String {
        match self.phase {
            HoldPhase::Idle => "Ready".to_string(),
            HoldPhase::CountingDown { remaining } => format!("Get ready: {remaining}"),
            HoldPhase::Holding { .. } => {
                let ms = self.remaining().as_millis();
                format!("Hold: {}s", (ms + 999) / 1000)
            }
            HoldPhase::Finished => "Done".to_string(),
        }
    }
}

fn to_pct(x: f64) -> u32 {
    if x.is_finite() { (x.clamp(0.0, 1.0) * 100.0).round() as u32 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_rounds_and_clamps() {
        assert_eq!(to_pct(0.704), 70);
        assert_eq!(to_pct(1.4), 100);
        assert_eq!(to_pct(f64::NAN), 0);
    }
}
