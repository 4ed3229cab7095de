use std::time::Duration;

use poseyoga_core::{EngineConfig, FrameSource, SensorKind, Session, SyntheticSource};

#[test]
fn smoke_metrics_after_frames() {
    let mut s = Session::with_builtin(EngineConfig::default()).unwrap();
    s.attach_sensor(SensorKind::DepthBody);
    let mut src = SyntheticSource::new(SensorKind::DepthBody);
    let n = src.pump(Duration::from_millis(330), &mut s);
    assert_eq!(n, 11);

    assert_eq!(s.metrics().frames_total.get(), 11);
    let sim = s.metrics().last_similarity.get();
    assert!((0.0..=1.0).contains(&sim));

    let text = s.metrics().gather_text().unwrap();
    assert!(text.contains("poseyoga_frames_total 11"));
    assert!(text.contains("poseyoga_runs_started_total 0"));
}
