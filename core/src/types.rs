use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sporingsstatus slik dybdesensoren rapporterer den (0/1/2 på wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TrackingState {
    NotTracked,
    Inferred,
    Tracked,
}

impl TryFrom<u8> for TrackingState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(TrackingState::NotTracked),
            1 => Ok(TrackingState::Inferred),
            2 => Ok(TrackingState::Tracked),
            other => Err(format!("ukjent trackingState {other} (forventet 0, 1 eller 2)")),
        }
    }
}

impl From<TrackingState> for u8 {
    fn from(s: TrackingState) -> u8 {
        match s {
            TrackingState::NotTracked => 0,
            TrackingState::Inferred => 1,
            TrackingState::Tracked => 2,
        }
    }
}

/// Ett landemerke i 3D. `z` mangler for rene 2D-kilder og tolkes da som 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(
        default,
        rename = "trackingState",
        alias = "tracking_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub tracking_state: Option<TrackingState>,
}

impl JointPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z), tracking_state: None }
    }

    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: None, tracking_state: None }
    }

    pub fn with_tracking(mut self, state: TrackingState) -> Self {
        self.tracking_state = Some(state);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

/// Felles landemerke-vokabular for alle sensorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Landmark {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn word(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Shoulder,
    Elbow,
    Hip,
    Knee,
}

/// De 8 leddene som scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Joint {
    LShoulder,
    RShoulder,
    LElbow,
    RElbow,
    LHip,
    RHip,
    LKnee,
    RKnee,
}

impl Joint {
    pub const ALL: [Joint; 8] = [
        Joint::LShoulder,
        Joint::RShoulder,
        Joint::LElbow,
        Joint::RElbow,
        Joint::LHip,
        Joint::RHip,
        Joint::LKnee,
        Joint::RKnee,
    ];

    pub fn side(self) -> Side {
        match self {
            Joint::LShoulder | Joint::LElbow | Joint::LHip | Joint::LKnee => Side::Left,
            _ => Side::Right,
        }
    }

    pub fn kind(self) -> JointKind {
        match self {
            Joint::LShoulder | Joint::RShoulder => JointKind::Shoulder,
            Joint::LElbow | Joint::RElbow => JointKind::Elbow,
            Joint::LHip | Joint::RHip => JointKind::Hip,
            Joint::LKnee | Joint::RKnee => JointKind::Knee,
        }
    }

    /// Nøkkelnavnet brukt i katalog og JSON, f.eks. `LKnee`.
    pub fn key(self) -> &'static str {
        match self {
            Joint::LShoulder => "LShoulder",
            Joint::RShoulder => "RShoulder",
            Joint::LElbow => "LElbow",
            Joint::RElbow => "RElbow",
            Joint::LHip => "LHip",
            Joint::RHip => "RHip",
            Joint::LKnee => "LKnee",
            Joint::RKnee => "RKnee",
        }
    }

    /// Visningsnavn med mellomrom, f.eks. `L Knee`.
    pub fn label(self) -> &'static str {
        match self {
            Joint::LShoulder => "L Shoulder",
            Joint::RShoulder => "R Shoulder",
            Joint::LElbow => "L Elbow",
            Joint::RElbow => "R Elbow",
            Joint::LHip => "L Hip",
            Joint::RHip => "R Hip",
            Joint::LKnee => "L Knee",
            Joint::RKnee => "R Knee",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Landemerke → posisjon. Manglende landemerker finnes ikke i mappen.
pub type Skeleton = BTreeMap<Landmark, JointPosition>;

/// Ledd → vinkel i grader (0–180). Fravær betyr "ikke målt", aldri 0°.
pub type AngleMap = BTreeMap<Joint, f64>;

/// Referansepose fra katalogen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePose {
    pub id: u32,
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, alias = "image", alias = "imageRef")]
    pub image_ref: String,
    pub angles: BTreeMap<Joint, f64>,
    #[serde(default)]
    pub tolerances: BTreeMap<Joint, f64>,
    #[serde(default)]
    pub weights: BTreeMap<Joint, f64>,
}

impl ReferencePose {
    /// Toleranse i grader; ikke-positive eller manglende verdier gir `default`.
    pub fn tolerance_for(&self, joint: Joint, default: f64) -> f64 {
        match self.tolerances.get(&joint) {
            Some(t) if t.is_finite() && *t > 0.0 => *t,
            _ => default,
        }
    }

    pub fn weight_for(&self, joint: Joint, default: f64) -> f64 {
        match self.weights.get(&joint) {
            Some(w) if w.is_finite() && *w > 0.0 => *w,
            _ => default,
        }
    }
}

/// Resultat for ett ledd i én frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointScore {
    pub target: f64,
    pub angle: Option<f64>,
    pub diff: f64,
    pub similarity: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimilarityResult {
    pub joints: BTreeMap<Joint, JointScore>,
    pub overall: f64,
}

/// Snitt per ledd over en hold-run (tabellen "per-joint averages").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSummary {
    pub joint: Joint,
    pub target: f64,
    pub avg_angle: Option<f64>,
    pub avg_diff: f64,
}

/// Endelig resultat for ett poseforsøk. Opprettes ved hold-slutt og endres ikke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub pose_id: u32,
    pub pose_name: String,
    pub final_score: u32,
    pub percent: u32,
    pub hold_passed: bool,
    pub hold_ratio: f64,
    pub frames: usize,
    pub feedback_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    pub per_joint_summary: Vec<JointSummary>,
}
