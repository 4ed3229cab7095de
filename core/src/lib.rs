pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod hold;
pub mod json_api;
pub mod metrics;
pub mod normalize;
pub mod session;
pub mod similarity;
pub mod smoothing;
pub mod source;
pub mod storage;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use catalog::{builtin_catalog, find_pose, load_catalog, parse_catalog};
pub use config::{load_config, save_config, EngineConfig, ScoreBands};
pub use error::{EngineError, EngineResult};
pub use feedback::{pose_correction, Correction, Feedback, FeedbackThrottle, LiveFeedback, Severity};
pub use geometry::angle_at;
pub use hold::{FinalScore, HoldPhase, HoldRun, LiveReadout, RunAccumulator, RunOutcome};
pub use metrics::Metrics;
pub use normalize::{frame_angles, normalize, pose_angles, RawFrame, SensorKind};
pub use session::{FrameReport, ResultBundle, ScoreClass, Session, SessionSummary};
pub use similarity::{joint_similarity, score};
pub use smoothing::RollingMean;
pub use source::{FrameSink, FrameSource, ReplaySource, SyntheticSource};
pub use storage::{load_bundle, save_bundle, DEFAULT_BUNDLE_FILE};
pub use types::{
    AngleMap, Joint, JointPosition, JointScore, JointSummary, Landmark, LevelResult, ReferencePose,
    SimilarityResult, Skeleton, TrackingState,
};
