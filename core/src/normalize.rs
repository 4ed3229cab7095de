use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::angle_at;
use crate::types::{AngleMap, Joint, JointPosition, Landmark, Skeleton, TrackingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Optisk landemerkemodell (MediaPipe Pose, 33 punkter).
    Optical,
    /// Dybdesensor med kroppssporing (Kinect v2).
    DepthBody,
}

/// Rå frame fra en sensor, før normalisering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sensor", rename_all = "snake_case")]
pub enum RawFrame {
    /// Landemerker indeksert etter modellens faste posisjoner; `null` = ikke funnet.
    Optical {
        #[serde(default)]
        landmarks: Vec<Option<JointPosition>>,
    },
    /// Ledd etter Kinect-navn (`ShoulderLeft`, ...).
    DepthBody {
        #[serde(default = "default_tracked")]
        tracked: bool,
        #[serde(default)]
        joints: BTreeMap<String, JointPosition>,
    },
}

fn default_tracked() -> bool {
    true
}

impl RawFrame {
    pub fn kind(&self) -> SensorKind {
        match self {
            RawFrame::Optical { .. } => SensorKind::Optical,
            RawFrame::DepthBody { .. } => SensorKind::DepthBody,
        }
    }

    /// Bygger en dybdeframe fra en liste indeksert etter Kinect JointType.
    pub fn depth_from_indexed(joints: &[Option<JointPosition>]) -> Self {
        let mut named = BTreeMap::new();
        for &(_, name, index) in DEPTH_TABLE.iter() {
            if let Some(Some(p)) = joints.get(index) {
                named.insert(name.to_string(), *p);
            }
        }
        RawFrame::DepthBody { tracked: true, joints: named }
    }
}

// MediaPipe Pose-indekser
const OPTICAL_TABLE: [(Landmark, usize); 12] = [
    (Landmark::LeftShoulder, 11),
    (Landmark::RightShoulder, 12),
    (Landmark::LeftElbow, 13),
    (Landmark::RightElbow, 14),
    (Landmark::LeftWrist, 15),
    (Landmark::RightWrist, 16),
    (Landmark::LeftHip, 23),
    (Landmark::RightHip, 24),
    (Landmark::LeftKnee, 25),
    (Landmark::RightKnee, 26),
    (Landmark::LeftAnkle, 27),
    (Landmark::RightAnkle, 28),
];

// Kinect v2: (landemerke, JointType-navn, JointType-indeks)
const DEPTH_TABLE: [(Landmark, &str, usize); 12] = [
    (Landmark::LeftShoulder, "ShoulderLeft", 4),
    (Landmark::LeftElbow, "ElbowLeft", 5),
    (Landmark::LeftWrist, "WristLeft", 6),
    (Landmark::RightShoulder, "ShoulderRight", 8),
    (Landmark::RightElbow, "ElbowRight", 9),
    (Landmark::RightWrist, "WristRight", 10),
    (Landmark::LeftHip, "HipLeft", 12),
    (Landmark::LeftKnee, "KneeLeft", 13),
    (Landmark::LeftAnkle, "AnkleLeft", 14),
    (Landmark::RightHip, "HipRight", 16),
    (Landmark::RightKnee, "KneeRight", 17),
    (Landmark::RightAnkle, "AnkleRight", 18),
];

/// Indeks for et landemerke i den optiske modellens liste.
pub fn optical_index(lm: Landmark) -> usize {
    OPTICAL_TABLE
        .iter()
        .find(|(l, _)| *l == lm)
        .map(|(_, i)| *i)
        .unwrap_or(0)
}

/// Kinect-navnet for et landemerke.
pub fn depth_name(lm: Landmark) -> &'static str {
    DEPTH_TABLE
        .iter()
        .find(|(l, _, _)| *l == lm)
        .map(|(_, n, _)| *n)
        .unwrap_or("")
}

/// Sensorspesifikk frame → kanonisk skjelett.
///
/// Ikke-finite posisjoner og ledd med `NotTracked` utelates. En dybdeframe
/// uten sporet kropp gir et tomt skjelett.
pub fn normalize(frame: &RawFrame) -> Skeleton {
    let mut out = Skeleton::new();
    match frame {
        RawFrame::Optical { landmarks } => {
            for &(lm, idx) in OPTICAL_TABLE.iter() {
                if let Some(Some(p)) = landmarks.get(idx) {
                    insert_usable(&mut out, lm, p);
                }
            }
        }
        RawFrame::DepthBody { tracked, joints } => {
            if !*tracked {
                return out;
            }
            for &(lm, name, _) in DEPTH_TABLE.iter() {
                if let Some(p) = joints.get(name) {
                    insert_usable(&mut out, lm, p);
                }
            }
        }
    }
    out
}

fn insert_usable(out: &mut Skeleton, lm: Landmark, p: &JointPosition) {
    if !p.is_finite() {
        return;
    }
    if p.tracking_state == Some(TrackingState::NotTracked) {
        return;
    }
    out.insert(lm, *p);
}

/// Faste tripler (a, toppunkt, c) per ledd.
pub fn joint_triple(joint: Joint) -> (Landmark, Landmark, Landmark) {
    use Landmark::*;
    match joint {
        Joint::LShoulder => (LeftHip, LeftShoulder, LeftElbow),
        Joint::RShoulder => (RightHip, RightShoulder, RightElbow),
        Joint::LElbow => (LeftShoulder, LeftElbow, LeftWrist),
        Joint::RElbow => (RightShoulder, RightElbow, RightWrist),
        Joint::LHip => (LeftShoulder, LeftHip, LeftKnee),
        Joint::RHip => (RightShoulder, RightHip, RightKnee),
        Joint::LKnee => (LeftHip, LeftKnee, LeftAnkle),
        Joint::RKnee => (RightHip, RightKnee, RightAnkle),
    }
}

/// Skjelett → vinkler for de 8 leddene. Ledd med manglende landemerker utelates.
pub fn pose_angles(skeleton: &Skeleton) -> AngleMap {
    let mut angles = AngleMap::new();
    for joint in Joint::ALL {
        let (a, b, c) = joint_triple(joint);
        if let (Some(pa), Some(pb), Some(pc)) = (skeleton.get(&a), skeleton.get(&b), skeleton.get(&c)) {
            angles.insert(joint, angle_at(pa, pb, pc));
        }
    }
    angles
}

/// Snarvei: rå frame rett til vinkler.
pub fn frame_angles(frame: &RawFrame) -> AngleMap {
    pose_angles(&normalize(frame))
}
