use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::catalog::{builtin_catalog, validate};
use crate::config::{EngineConfig, ScoreBands};
use crate::error::EngineError;
use crate::feedback::{pose_correction, Feedback, FeedbackThrottle, LiveFeedback};
use crate::hold::{HoldRun, LiveReadout, RunOutcome};
use crate::metrics::Metrics;
use crate::normalize::{normalize, pose_angles, RawFrame, SensorKind};
use crate::similarity::score;
use crate::source::FrameSink;
use crate::types::{AngleMap, LevelResult, ReferencePose, SimilarityResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreClass {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreClass {
    pub fn classify(score: f64, bands: &ScoreBands) -> Self {
        if score >= bands.excellent {
            ScoreClass::Excellent
        } else if score >= bands.good {
            ScoreClass::Good
        } else if score >= bands.fair {
            ScoreClass::Fair
        } else {
            ScoreClass::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreClass::Excellent => "Excellent",
            ScoreClass::Good => "Good",
            ScoreClass::Fair => "Fair",
            ScoreClass::NeedsImprovement => "Needs improvement",
        }
    }

    /// Farge for score-merket i UI.
    pub fn color(self) -> &'static str {
        match self {
            ScoreClass::Excellent => "#09a86b",
            ScoreClass::Good => "#6fd08f",
            ScoreClass::Fair => "#f0b24a",
            ScoreClass::NeedsImprovement => "#eb6b5a",
        }
    }
}

/// Snitt av poser som har score. Hoppede poser (None) er utenfor nevneren.
pub fn mean_of_scored<I>(scores: I) -> f64
where
    I: IntoIterator<Item = Option<u32>>,
{
    let (sum, n) = scores
        .into_iter()
        .flatten()
        .fold((0.0f64, 0usize), |(s, n), v| (s + f64::from(v), n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Resultat av én prosessert frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub angles: AngleMap,
    pub similarity: SimilarityResult,
    pub live: LiveReadout,
    /// Ufiltrert korreksjon for akkurat denne framen.
    pub instant_feedback: Option<Feedback>,
    /// Throttlet melding (endres maks én gang per vindu).
    pub feedback: LiveFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub average: f64,
    pub final_score: u32,
    pub classification: ScoreClass,
    pub scored: usize,
    pub skipped: usize,
    pub total_poses: usize,
}

/// Tidsstemplet eksport av alle resultater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub timestamp: DateTime<Utc>,
    pub summary: SessionSummary,
    pub results: Vec<Option<LevelResult>>,
}

/// Én brukersesjon: katalog, valgt pose, aktiv hold-run og resultatliste.
/// All tilstand eies her; ingen globale variabler.
#[derive(Debug)]
pub struct Session {
    cfg: EngineConfig,
    catalog: Vec<ReferencePose>,
    current: usize,
    run: HoldRun,
    results: Vec<Option<LevelResult>>,
    sensor: Option<SensorKind>,
    throttle: FeedbackThrottle,
    shown_feedback: Option<Feedback>,
    metrics: Metrics,
}

impl Session {
    pub fn new(cfg: EngineConfig, catalog: Vec<ReferencePose>) -> Result<Self, EngineError> {
        cfg.validate()?;
        validate(&catalog)?;
        let metrics = Metrics::new()?;
        let results = vec![None; catalog.len()];
        Ok(Self {
            run: HoldRun::new(cfg.clone()),
            throttle: FeedbackThrottle::new(Duration::from_millis(cfg.feedback_window_ms)),
            cfg,
            catalog,
            current: 0,
            results,
            sensor: None,
            shown_feedback: None,
            metrics,
        })
    }

    pub fn with_builtin(cfg: EngineConfig) -> Result<Self, EngineError> {
        Self::new(cfg, builtin_catalog())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn catalog(&self) -> &[ReferencePose] {
        &self.catalog
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// None når alle poser er gjennomført.
    pub fn current_pose(&self) -> Option<&ReferencePose> {
        self.catalog.get(self.current)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.catalog.len()
    }

    pub fn run(&self) -> &HoldRun {
        &self.run
    }

    pub fn results(&self) -> &[Option<LevelResult>] {
        &self.results
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn shown_feedback(&self) -> Option<&Feedback> {
        self.shown_feedback.as_ref()
    }

    // --- sensor ---------------------------------------------------------

    pub fn attach_sensor(&mut self, kind: SensorKind) {
        info!("📷 Sensor koblet til: {kind:?}");
        self.sensor = Some(kind);
    }

    pub fn detach_sensor(&mut self) {
        if self.sensor.take().is_some() {
            info!("📷 Sensor koblet fra");
        }
    }

    pub fn sensor(&self) -> Option<SensorKind> {
        self.sensor
    }

    // --- hold-run -------------------------------------------------------

    /// Starter hold for gjeldende pose. `Ok(false)` hvis en run allerede pågår.
    pub fn begin_hold(&mut self) -> Result<bool, EngineError> {
        let pose = self.catalog.get(self.current).ok_or(EngineError::SessionComplete)?;
        let started = self.run.begin(pose, self.sensor.is_some())?;
        if started {
            self.metrics.runs_started_total.inc();
            self.throttle.reset();
            self.shown_feedback = None;
        }
        Ok(started)
    }

    pub fn countdown_tick(&mut self) {
        self.run.countdown_tick();
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.cfg.countdown_tick_ms)
    }

    /// Veggklokke-tikk for hold-timeren. Lagrer og returnerer resultatet når
    /// run-en er ferdig.
    pub fn advance(&mut self, dt: Duration) -> Option<LevelResult> {
        let outcome = self.run.advance(dt)?;
        let result = self.level_result(outcome);
        if let Some(slot) = self.results.get_mut(self.current) {
            *slot = Some(result.clone());
        }
        self.metrics.runs_completed_total.inc();
        Some(result)
    }

    fn level_result(&self, outcome: RunOutcome) -> LevelResult {
        let pose_name = self
            .catalog
            .iter()
            .find(|p| p.id == outcome.pose_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        LevelResult {
            pose_id: outcome.pose_id,
            pose_name,
            final_score: outcome.score.final_score,
            percent: outcome.score.percent,
            hold_passed: outcome.score.hold_passed,
            hold_ratio: outcome.score.hold_ratio,
            frames: outcome.frames,
            feedback_text: outcome.summary,
            tips: outcome.tips,
            per_joint_summary: outcome.per_joint,
        }
    }

    /// Avbryter run uten å lage resultat.
    pub fn cancel_run(&mut self) {
        if self.run.cancel() {
            self.metrics.runs_cancelled_total.inc();
        }
        self.throttle.reset();
        self.shown_feedback = None;
    }

    // --- frames ---------------------------------------------------------

    /// Normaliserer, scorer og mater aktiv run. Frames uten kropp (tomt
    /// skjelett) forkastes og gir None.
    pub fn process_frame(&mut self, frame: &RawFrame, at: Duration) -> Option<FrameReport> {
        let pose = self.catalog.get(self.current)?;

        let skeleton = normalize(frame);
        if skeleton.is_empty() {
            debug!("frame uten kropp forkastet ({:?})", frame.kind());
            self.metrics.frames_dropped_total.inc();
            return None;
        }

        let angles = pose_angles(&skeleton);
        let similarity = score(&angles, pose, &self.cfg);
        let instant_feedback = pose_correction(&angles, pose, self.cfg.live_feedback_top_n, &self.cfg);

        let live = self.run.on_frame(&similarity);
        let feedback = self.throttle.push(at, instant_feedback.clone());
        match &feedback {
            LiveFeedback::Show(f) => self.shown_feedback = Some(f.clone()),
            LiveFeedback::Clear => self.shown_feedback = None,
            LiveFeedback::Unchanged => {}
        }

        self.metrics.frames_total.inc();
        self.metrics.last_similarity.set(similarity.overall);

        Some(FrameReport { angles, similarity, live, instant_feedback, feedback })
    }

    // --- navigasjon -----------------------------------------------------

    /// Går til neste pose. Returnerer false når sesjonen er ferdig.
    pub fn next_pose(&mut self) -> bool {
        self.cancel_run();
        if self.current < self.catalog.len() {
            self.current += 1;
        }
        !self.is_complete()
    }

    /// Hopper over gjeldende pose: ingen score, utenfor snittet.
    pub fn skip_pose(&mut self) -> bool {
        if let Some(slot) = self.results.get_mut(self.current) {
            *slot = None;
        }
        info!("⏭️ Pose {} hoppet over", self.current + 1);
        self.next_pose()
    }

    /// Nytt forsøk på gjeldende pose; tidligere resultat fjernes.
    pub fn retry_pose(&mut self) {
        self.cancel_run();
        if let Some(slot) = self.results.get_mut(self.current) {
            *slot = None;
        }
    }

    /// Tilbake til første pose med tom resultatliste.
    pub fn restart(&mut self) {
        self.cancel_run();
        self.current = 0;
        self.results = vec![None; self.catalog.len()];
        info!("🔄 Sesjon startet på nytt");
    }

    /// Avslutt: avbryt run og koble fra sensor.
    pub fn exit(&mut self) {
        self.cancel_run();
        self.detach_sensor();
    }

    // --- aggregat -------------------------------------------------------

    pub fn overall_average(&self) -> f64 {
        mean_of_scored(self.results.iter().map(|r| r.as_ref().map(|r| r.final_score)))
    }

    pub fn classify(&self, score: f64) -> ScoreClass {
        ScoreClass::classify(score, &self.cfg.bands)
    }

    pub fn summary(&self) -> SessionSummary {
        let average = self.overall_average();
        let scored = self.results.iter().filter(|r| r.is_some()).count();
        // kun poser vi har passert; de som gjenstår er ikke hoppet over
        let skipped = self.results.iter().take(self.current).filter(|r| r.is_none()).count();
        SessionSummary {
            average,
            final_score: average.round() as u32,
            classification: self.classify(average),
            scored,
            skipped,
            total_poses: self.catalog.len(),
        }
    }

    pub fn export_bundle(&self, timestamp: DateTime<Utc>) -> ResultBundle {
        ResultBundle { timestamp, summary: self.summary(), results: self.results.clone() }
    }
}

impl FrameSink for Session {
    fn on_frame(&mut self, frame: &RawFrame, at: Duration) {
        self.process_frame(frame, at);
    }
}
