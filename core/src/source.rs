use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::normalize::{depth_name, optical_index, RawFrame, SensorKind};
use crate::types::{JointPosition, Landmark, TrackingState};

/// Mottaker av frames (typisk en `Session`).
pub trait FrameSink {
    fn on_frame(&mut self, frame: &RawFrame, at: Duration);
}

/// Kilde til frames. `pump` leverer alle frames som er forfalt ved `at`
/// og returnerer hvor mange som ble levert.
pub trait FrameSource {
    fn kind(&self) -> SensorKind;
    fn pump(&mut self, at: Duration, sink: &mut dyn FrameSink) -> usize;
}

// Stående grunnpose (meter, kamerakoordinater), som dybdesensorens mock-modus.
const BASE_POSE: [(Landmark, [f64; 3]); 12] = [
    (Landmark::LeftShoulder, [-0.3, 0.0, 2.0]),
    (Landmark::RightShoulder, [0.3, 0.0, 2.0]),
    (Landmark::LeftElbow, [-0.4, -0.3, 2.0]),
    (Landmark::RightElbow, [0.4, -0.3, 2.0]),
    (Landmark::LeftWrist, [-0.4, -0.6, 2.0]),
    (Landmark::RightWrist, [0.4, -0.6, 2.0]),
    (Landmark::LeftHip, [-0.15, -0.5, 2.0]),
    (Landmark::RightHip, [0.15, -0.5, 2.0]),
    (Landmark::LeftKnee, [-0.15, -0.9, 2.0]),
    (Landmark::RightKnee, [0.15, -0.9, 2.0]),
    (Landmark::LeftAnkle, [-0.15, -1.2, 2.0]),
    (Landmark::RightAnkle, [0.15, -1.2, 2.0]),
];

const OPTICAL_LANDMARKS: usize = 33;

/// Syntetisk kilde som lager plausible, periodiske skjeletter når ingen ekte
/// sensor finnes. Håndleddene svinger sakte slik at albuevinklene varierer.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    kind: SensorKind,
    interval: Duration,
    next_due: Duration,
    sway_amplitude: f64,
    sway_period: Duration,
    gap: Option<(Duration, Duration)>,
}

impl SyntheticSource {
    /// ~30 fps.
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            interval: Duration::from_millis(33),
            next_due: Duration::ZERO,
            sway_amplitude: 0.05,
            sway_period: Duration::from_secs(4),
            gap: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_sway(mut self, amplitude: f64, period: Duration) -> Self {
        self.sway_amplitude = amplitude;
        self.sway_period = period;
        self
    }

    /// Ingen frames i [from, to), som ved okklusjon eller frafall.
    pub fn with_gap(mut self, from: Duration, to: Duration) -> Self {
        self.gap = Some((from, to));
        self
    }

    fn in_gap(&self, t: Duration) -> bool {
        matches!(self.gap, Some((from, to)) if t >= from && t < to)
    }

    fn positions_at(&self, t: Duration) -> Vec<(Landmark, JointPosition)> {
        let period = self.sway_period.as_secs_f64().max(1e-3);
        let phase = (t.as_secs_f64() / period) * std::f64::consts::TAU;
        let sway = self.sway_amplitude * phase.sin();
        BASE_POSE
            .iter()
            .map(|&(lm, [x, y, z])| {
                let dx = match lm {
                    Landmark::LeftWrist => -sway,
                    Landmark::RightWrist => sway,
                    _ => 0.0,
                };
                (lm, JointPosition::new(x + dx, y, z))
            })
            .collect()
    }

    /// Frame for tidspunkt `t` i sensorens eget format.
    pub fn frame_at(&self, t: Duration) -> RawFrame {
        let positions = self.positions_at(t);
        match self.kind {
            SensorKind::Optical => {
                let mut landmarks = vec![None; OPTICAL_LANDMARKS];
                for (lm, p) in positions {
                    // normaliserte bildekoordinater, y nedover
                    let img = JointPosition::new(0.5 + p.x / 2.0, 0.5 - p.y / 2.0, 0.0);
                    landmarks[optical_index(lm)] = Some(img);
                }
                RawFrame::Optical { landmarks }
            }
            SensorKind::DepthBody => {
                let joints: BTreeMap<String, JointPosition> = positions
                    .into_iter()
                    .map(|(lm, p)| (depth_name(lm).to_string(), p.with_tracking(TrackingState::Tracked)))
                    .collect();
                RawFrame::DepthBody { tracked: true, joints }
            }
        }
    }
}

impl FrameSource for SyntheticSource {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn pump(&mut self, at: Duration, sink: &mut dyn FrameSink) -> usize {
        let mut delivered = 0;
        while self.next_due <= at {
            let t = self.next_due;
            if !self.in_gap(t) {
                sink.on_frame(&self.frame_at(t), t);
                delivered += 1;
            }
            self.next_due += self.interval;
        }
        delivered
    }
}

/// Spiller av forhåndsinnspilte frames med tidsstempel.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    kind: SensorKind,
    frames: VecDeque<(Duration, RawFrame)>,
}

impl ReplaySource {
    pub fn new(kind: SensorKind, frames: Vec<(Duration, RawFrame)>) -> Self {
        let mut frames = frames;
        frames.sort_by_key(|(t, _)| *t);
        Self { kind, frames: frames.into() }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn pump(&mut self, at: Duration, sink: &mut dyn FrameSink) -> usize {
        let mut delivered = 0;
        while self.frames.front().map_or(false, |(t, _)| *t <= at) {
            if let Some((t, frame)) = self.frames.pop_front() {
                sink.on_frame(&frame, t);
                delivered += 1;
            }
        }
        delivered
    }
}
