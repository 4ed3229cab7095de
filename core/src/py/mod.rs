use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::error::EngineError;
use crate::json_api;

fn to_py(e: EngineError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// Godtar både str og dict/list; alt annet serialiseres med Python sin json.dumps.
fn json_arg(py: Python<'_>, payload: &PyAny) -> PyResult<String> {
    if let Ok(s) = payload.extract::<&str>() {
        return Ok(s.to_owned());
    }
    let json_mod = py.import("json")?;
    json_mod.getattr("dumps")?.call1((payload,))?.extract()
}

fn opt_json_arg(py: Python<'_>, payload: Option<&PyAny>) -> PyResult<Option<String>> {
    match payload {
        Some(p) if !p.is_none() => Ok(Some(json_arg(py, p)?)),
        _ => Ok(None),
    }
}

#[pyfunction]
fn angles_from_frame(py: Python<'_>, frame: &PyAny) -> PyResult<String> {
    json_api::angles_from_frame_json(&json_arg(py, frame)?).map_err(to_py)
}

#[pyfunction]
#[pyo3(signature = (angles, pose, cfg=None))]
fn score_pose(py: Python<'_>, angles: &PyAny, pose: &PyAny, cfg: Option<&PyAny>) -> PyResult<String> {
    let cfg = opt_json_arg(py, cfg)?;
    json_api::score_json(&json_arg(py, angles)?, &json_arg(py, pose)?, cfg.as_deref()).map_err(to_py)
}

#[pyfunction]
#[pyo3(signature = (angles, pose, top_n=2))]
fn pose_feedback(py: Python<'_>, angles: &PyAny, pose: &PyAny, top_n: usize) -> PyResult<String> {
    json_api::feedback_json(&json_arg(py, angles)?, &json_arg(py, pose)?, top_n).map_err(to_py)
}

#[pyfunction]
#[pyo3(signature = (avg_similarity, in_pose_frames, total_frames, cfg=None))]
fn final_score(
    py: Python<'_>,
    avg_similarity: f64,
    in_pose_frames: usize,
    total_frames: usize,
    cfg: Option<&PyAny>,
) -> PyResult<String> {
    let cfg = opt_json_arg(py, cfg)?;
    json_api::final_score_json(avg_similarity, in_pose_frames, total_frames, cfg.as_deref()).map_err(to_py)
}

#[pyfunction]
#[pyo3(signature = (scores, cfg=None))]
fn session_average(py: Python<'_>, scores: &PyAny, cfg: Option<&PyAny>) -> PyResult<String> {
    let cfg = opt_json_arg(py, cfg)?;
    json_api::session_average_json(&json_arg(py, scores)?, cfg.as_deref()).map_err(to_py)
}

#[pyfunction]
fn builtin_catalog() -> PyResult<String> {
    json_api::builtin_catalog_json().map_err(to_py)
}

#[pymodule]
fn poseyoga_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(angles_from_frame, m)?)?;
    m.add_function(wrap_pyfunction!(score_pose, m)?)?;
    m.add_function(wrap_pyfunction!(pose_feedback, m)?)?;
    m.add_function(wrap_pyfunction!(final_score, m)?)?;
    m.add_function(wrap_pyfunction!(session_average, m)?)?;
    m.add_function(wrap_pyfunction!(builtin_catalog, m)?)?;
    Ok(())
}
