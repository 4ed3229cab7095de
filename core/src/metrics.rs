use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

/// Tellere for én sesjon. Hver sesjon har sitt eget register, så to sesjoner
/// (eller to tester) deler ingen tilstand.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub frames_total: IntCounter,
    pub frames_dropped_total: IntCounter,
    pub runs_started_total: IntCounter,
    pub runs_completed_total: IntCounter,
    pub runs_cancelled_total: IntCounter,
    pub last_similarity: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("poseyoga".into()), None)?;

        let frames_total = IntCounter::new("frames_total", "Frames scored against the current pose")?;
        let frames_dropped_total =
            IntCounter::new("frames_dropped_total", "Frames without a detected body (not scored)")?;
        let runs_started_total = IntCounter::new("runs_started_total", "Hold runs started")?;
        let runs_completed_total = IntCounter::new("runs_completed_total", "Hold runs that produced a result")?;
        let runs_cancelled_total = IntCounter::new("runs_cancelled_total", "Hold runs aborted before the end")?;
        let last_similarity = Gauge::new("last_similarity", "Overall similarity of the latest frame (0-1)")?;

        registry.register(Box::new(frames_total.clone()))?;
        registry.register(Box::new(frames_dropped_total.clone()))?;
        registry.register(Box::new(runs_started_total.clone()))?;
        registry.register(Box::new(runs_completed_total.clone()))?;
        registry.register(Box::new(runs_cancelled_total.clone()))?;
        registry.register(Box::new(last_similarity.clone()))?;

        Ok(Self {
            registry,
            frames_total,
            frames_dropped_total,
            runs_started_total,
            runs_completed_total,
            runs_cancelled_total,
            last_similarity,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus tekstformat.
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("frames_total", &self.frames_total.get())
            .field("frames_dropped_total", &self.frames_dropped_total.get())
            .field("runs_completed_total", &self.runs_completed_total.get())
            .finish()
    }
}
