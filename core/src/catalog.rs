use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use log::info;
use once_cell::sync::Lazy;

use crate::error::EngineError;
use crate::types::{Joint, ReferencePose};

// Vinkelrekkefølge: LShoulder, RShoulder, LElbow, RElbow, LHip, RHip, LKnee, RKnee
type Row = [f64; 8];

fn joint_map(values: Row) -> BTreeMap<Joint, f64> {
    Joint::ALL.iter().copied().zip(values).collect()
}

fn pose(id: u32, name: &str, image: &str, desc: &str, angles: Row, tolerances: Row, weights: Row) -> ReferencePose {
    ReferencePose {
        id,
        name: name.to_string(),
        description: desc.to_string(),
        image_ref: image.to_string(),
        angles: joint_map(angles),
        tolerances: joint_map(tolerances),
        weights: joint_map(weights),
    }
}

static BUILTIN: Lazy<Vec<ReferencePose>> = Lazy::new(|| {
    vec![
        pose(
            1,
            "Tree Pose (Vrksāsana)",
            "https://cdn.yogajournal.com/wp-content/uploads/2022/01/Tree-Pose_Alt-1_2400x1350_Andrew-Clark.jpeg",
            "Stand on one leg; keep torso upright; hands overhead.",
            [50.0, 50.0, 170.0, 170.0, 180.0, 170.0, 175.0, 15.0],
            [35.0, 35.0, 30.0, 30.0, 30.0, 35.0, 25.0, 40.0],
            [1.0; 8],
        ),
        pose(
            2,
            "Warrior II (Virabhadrāsana II)",
            "https://cdn.yogajournal.com/wp-content/uploads/2021/12/Warrior-2-Pose_Andrew-Clark_2400x1350.jpeg",
            "Wide stance; front knee ~90°; arms extended horizontally.",
            [90.0, 90.0, 170.0, 170.0, 120.0, 170.0, 90.0, 175.0],
            [25.0, 25.0, 30.0, 30.0, 30.0, 40.0, 25.0, 35.0],
            [1.2, 1.2, 1.0, 1.0, 1.0, 1.0, 1.4, 1.0],
        ),
        pose(
            3,
            "Downward-Facing Dog (Adho Mukha Śvānāsana)",
            "https://upload.wikimedia.org/wikipedia/commons/5/57/Downward-Facing-Dog.JPG",
            "Upside-V: hips high, spine long.",
            [50.0, 50.0, 170.0, 170.0, 90.0, 90.0, 170.0, 170.0],
            [35.0, 35.0, 30.0, 30.0, 40.0, 40.0, 30.0, 30.0],
            [1.0, 1.0, 1.0, 1.0, 1.3, 1.3, 0.8, 0.8],
        ),
        pose(
            4,
            "Chair Pose (Utkatasana)",
            "https://cdn.yogajournal.com/wp-content/uploads/2021/11/Chair-Pose_Andrew-Clark.jpg",
            "Knees bent as if sitting; torso lifted; arms overhead.",
            [60.0, 60.0, 165.0, 165.0, 100.0, 100.0, 100.0, 100.0],
            [30.0, 30.0, 35.0, 35.0, 25.0, 25.0, 25.0, 25.0],
            [1.0, 1.0, 0.8, 0.8, 1.4, 1.4, 1.6, 1.6],
        ),
        pose(
            5,
            "Cobra Pose (Bhujangāsana)",
            "https://omstars.com/blog/wp-content/uploads/2024/11/how-to-do-cobra-pose.png",
            "Prone back-bend: chest lifted, gentle spine arch.",
            [40.0, 40.0, 140.0, 140.0, 150.0, 150.0, 170.0, 170.0],
            [30.0, 30.0, 40.0, 40.0, 30.0, 30.0, 35.0, 35.0],
            [1.0, 1.0, 1.2, 1.2, 1.4, 1.4, 0.8, 0.8],
        ),
    ]
});

/// De fem innebygde posene, i nivårekkefølge.
pub fn builtin_catalog() -> Vec<ReferencePose> {
    BUILTIN.clone()
}

pub fn find_pose(catalog: &[ReferencePose], id: u32) -> Result<&ReferencePose, EngineError> {
    catalog.iter().find(|p| p.id == id).ok_or(EngineError::UnknownPose(id))
}

/// Sjekker katalogen: unike id-er, minst ett ledd per pose, positive
/// toleranser/vekter og ingen toleranse/vekt uten målvinkel.
pub fn validate(catalog: &[ReferencePose]) -> Result<(), EngineError> {
    if catalog.is_empty() {
        return Err(EngineError::Catalog("catalog has no poses".into()));
    }
    let mut seen = HashSet::new();
    for p in catalog {
        if !seen.insert(p.id) {
            return Err(EngineError::Catalog(format!("duplicate pose id {}", p.id)));
        }
        if p.angles.is_empty() {
            return Err(EngineError::Catalog(format!("pose {} declares no joint angles", p.id)));
        }
        for (joint, target) in &p.angles {
            if !target.is_finite() {
                return Err(EngineError::Catalog(format!("pose {}: target for {joint} is not finite", p.id)));
            }
        }
        for (what, map) in [("tolerance", &p.tolerances), ("weight", &p.weights)] {
            for (joint, v) in map {
                if !p.angles.contains_key(joint) {
                    return Err(EngineError::Catalog(format!(
                        "pose {}: {what} given for {joint} without a target angle",
                        p.id
                    )));
                }
                if !(v.is_finite() && *v > 0.0) {
                    return Err(EngineError::Catalog(format!(
                        "pose {}: {what} for {joint} must be > 0, got {v}",
                        p.id
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Leser en katalog (JSON-liste av poser) fra disk og validerer den.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ReferencePose>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese katalog {}", path.display()))?;
    let catalog = parse_catalog(&contents).with_context(|| format!("ugyldig katalog {}", path.display()))?;
    info!("📂 Katalog lastet fra {} ({} poser)", path.display(), catalog.len());
    Ok(catalog)
}

pub fn parse_catalog(json: &str) -> Result<Vec<ReferencePose>, EngineError> {
    let mut de = serde_json::Deserializer::from_str(json);
    let catalog: Vec<ReferencePose> =
        serde_path_to_error::deserialize(&mut de).map_err(EngineError::from_path_error)?;
    validate(&catalog)?;
    Ok(catalog)
}
