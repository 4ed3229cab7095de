use crate::config::EngineConfig;
use crate::types::{AngleMap, JointScore, ReferencePose, SimilarityResult};

/// Lineær likhet: 1 ved diff=0, 0 når diff ≥ toleranse.
pub fn joint_similarity(diff: f64, tolerance: f64) -> f64 {
    if !(tolerance > 0.0) || !diff.is_finite() {
        return 0.0;
    }
    (1.0 - diff / tolerance).max(0.0)
}

/// Sammenligner målte vinkler mot en referansepose.
///
/// Ledd som mangler (eller er NaN) får `missing_joint_diff_deg` og likhet 0,
/// men vekten telles fortsatt i nevneren, slik at et halvt synlig skjelett
/// trekker ned i stedet for å bli ignorert.
pub fn score(angles: &AngleMap, pose: &ReferencePose, cfg: &EngineConfig) -> SimilarityResult {
    let mut out = SimilarityResult::default();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (&joint, &target) in &pose.angles {
        let tol = pose.tolerance_for(joint, cfg.default_tolerance_deg);
        let weight = pose.weight_for(joint, cfg.default_weight);

        let measured = angles.get(&joint).copied().filter(|a| a.is_finite());
        let js = match measured {
            Some(angle) => {
                let diff = (angle - target).abs();
                JointScore { target, angle: Some(angle), diff, similarity: joint_similarity(diff, tol), weight }
            }
            None => JointScore {
                target,
                angle: None,
                diff: cfg.missing_joint_diff_deg,
                similarity: 0.0,
                weight,
            },
        };

        weighted_sum += js.similarity * weight;
        total_weight += weight;
        out.joints.insert(joint, js);
    }

    out.overall = if total_weight > 0.0 { (weighted_sum / total_weight).clamp(0.0, 1.0) } else { 0.0 };
    out
}
