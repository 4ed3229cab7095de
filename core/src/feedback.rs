use std::cmp::Reverse;
use std::time::Duration;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{AngleMap, Joint, JointKind, JointSummary, ReferencePose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

/// Én korreksjon for ett ledd utenfor toleranse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub joint: Joint,
    pub instruction: String,
    /// Avvik i hele grader (avrundet).
    pub difference: u32,
    #[serde(skip)]
    diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub severity: Severity,
    pub corrections: Vec<Correction>,
}

/// Retningsinstruks for et ledd: skuldre/hofter løftes eller senkes,
/// albuer/knær bøyes eller strekkes.
pub fn instruction(joint: Joint, angle: f64, target: f64) -> String {
    let side = joint.side().word();
    let over = angle > target;
    match joint.kind() {
        JointKind::Shoulder => format!("{} your {side} arm", if over { "lower" } else { "raise" }),
        JointKind::Hip => format!("{} your {side} hip", if over { "lower" } else { "raise" }),
        JointKind::Elbow if over => format!("straighten your {side} arm more"),
        JointKind::Elbow => format!("bend your {side} elbow more"),
        JointKind::Knee if over => format!("straighten your {side} leg more"),
        JointKind::Knee => format!("bend your {side} knee more"),
    }
}

/// Korreksjon hvis |angle - target| > tolerance, ellers None.
pub fn joint_correction(joint: Joint, angle: f64, target: f64, tolerance: f64) -> Option<Correction> {
    let diff = (angle - target).abs();
    if !(diff > tolerance) {
        return None;
    }
    Some(Correction {
        joint,
        instruction: instruction(joint, angle, target),
        difference: diff.round() as u32,
        diff,
    })
}

/// Rangerte korreksjoner for målte ledd; største avvik først.
pub fn corrections(angles: &AngleMap, pose: &ReferencePose, cfg: &EngineConfig) -> Vec<Correction> {
    let mut out: Vec<Correction> = pose
        .angles
        .iter()
        .filter_map(|(&joint, &target)| {
            let angle = angles.get(&joint).copied().filter(|a| a.is_finite())?;
            let tol = pose.tolerance_for(joint, cfg.default_tolerance_deg);
            joint_correction(joint, angle, target, tol)
        })
        .collect();
    out.sort_by_key(|c| Reverse(OrderedFloat(c.diff)));
    out
}

/// Samlet tilbakemelding med de `top_n` største avvikene, én linje per ledd.
/// None når alle målte ledd er innenfor toleranse.
pub fn pose_correction(
    angles: &AngleMap,
    pose: &ReferencePose,
    top_n: usize,
    cfg: &EngineConfig,
) -> Option<Feedback> {
    let mut ranked = corrections(angles, pose, cfg);
    let worst = ranked.first()?.difference;
    // avrundet avvik med vilje: 45.3° gir Medium
    let severity = if f64::from(worst) > cfg.high_severity_deg { Severity::High } else { Severity::Medium };

    ranked.truncate(top_n.max(1));
    let message = ranked
        .iter()
        .map(|c| format!("{} (off by {}°)", c.instruction, c.difference))
        .collect::<Vec<_>>()
        .join("\n");

    Some(Feedback { message, severity, corrections: ranked })
}

/// Sluttlinje for en hold-run: leddene med størst snittavvik, f.eks.
/// `L Knee: 50° • R Hip: 31°`.
pub fn summary_line(per_joint: &[JointSummary], top_n: usize) -> String {
    let mut ranked: Vec<&JointSummary> = per_joint.iter().collect();
    ranked.sort_by_key(|s| Reverse(OrderedFloat(s.avg_diff)));
    let parts: Vec<String> = ranked
        .iter()
        .take(top_n)
        .map(|s| format!("{}: {}°", s.joint.label(), s.avg_diff.round() as i64))
        .collect();
    if parts.is_empty() {
        "Nice hold!".to_string()
    } else {
        parts.join(" • ")
    }
}

/// Hva UI skal vise etter et throttle-vindu.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveFeedback {
    /// Vinduet er ikke ferdig; behold forrige melding.
    Unchanged,
    /// Posen var stort sett OK i vinduet; fjern meldingen.
    Clear,
    Show(Feedback),
}

/// Identiteten til en tilbakemelding: hvilke ledd og hvilken retning, uten
/// gradtallet, som varierer fra frame til frame.
pub type FeedbackKey = Vec<(Joint, String)>;

impl Feedback {
    pub fn key(&self) -> FeedbackKey {
        self.corrections.iter().map(|c| (c.joint, c.instruction.clone())).collect()
    }
}

#[derive(Debug, Clone)]
struct Tally {
    key: FeedbackKey,
    count: usize,
    // siste frame med denne nøkkelen
    latest: Feedback,
}

/// Samler per-frame tilbakemeldinger over et kort vindu og rapporterer den
/// hyppigste korreksjonen, slik at meldingen ikke flimrer med støy fra frame
/// til frame.
#[derive(Debug, Clone)]
pub struct FeedbackThrottle {
    window: Duration,
    window_start: Option<Duration>,
    clear_frames: usize,
    tally: Vec<Tally>,
}

impl FeedbackThrottle {
    pub fn new(window: Duration) -> Self {
        Self { window, window_start: None, clear_frames: 0, tally: Vec::new() }
    }

    /// `at` er tid siden sesjonsstart. Framen som lukker et vindu telles i neste.
    pub fn push(&mut self, at: Duration, fb: Option<Feedback>) -> LiveFeedback {
        let start = *self.window_start.get_or_insert(at);
        let mut out = LiveFeedback::Unchanged;
        if at.saturating_sub(start) >= self.window {
            out = self.flush();
            self.window_start = Some(at);
        }

        match fb {
            Some(fb) => {
                let key = fb.key();
                match self.tally.iter().position(|t| t.key == key) {
                    Some(i) => {
                        self.tally[i].count += 1;
                        self.tally[i].latest = fb;
                    }
                    None => self.tally.push(Tally { key, count: 1, latest: fb }),
                }
            }
            None => self.clear_frames += 1,
        }
        out
    }

    /// Lukker vinduet. Clear bare når frames uten korreksjon er flere enn
    /// frames med; ellers vinner den hyppigste nøkkelen (først sett ved likt).
    pub fn flush(&mut self) -> LiveFeedback {
        let clear = std::mem::take(&mut self.clear_frames);
        let tally = std::mem::take(&mut self.tally);
        let needing: usize = tally.iter().map(|t| t.count).sum();

        let mut best: Option<Tally> = None;
        for t in tally {
            if best.as_ref().map_or(true, |b| t.count > b.count) {
                best = Some(t);
            }
        }

        match best {
            Some(b) if needing >= clear => LiveFeedback::Show(b.latest),
            _ if clear > 0 => LiveFeedback::Clear,
            _ => LiveFeedback::Unchanged,
        }
    }

    pub fn reset(&mut self) {
        self.window_start = None;
        self.clear_frames = 0;
        self.tally.clear();
    }
}
