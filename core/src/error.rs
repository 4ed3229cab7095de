use thiserror::Error;

/// Feil fra scoringsmotoren. Selve scoringen feiler aldri; disse dekker
/// kontrollflyt (begin uten sensor) og innlasting/lagring.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no active sensor: start the camera or depth sensor before beginning a hold")]
    NoActiveSensor,

    #[error("invalid pose catalog: {0}")]
    Catalog(String),

    #[error("invalid engine config: {0}")]
    Config(String),

    #[error("unknown pose id {0}")]
    UnknownPose(u32),

    #[error("session complete: no pose left to hold")]
    SessionComplete,

    #[error("parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Metrics(#[from] prometheus::Error),
}

impl EngineError {
    /// Bygger en `Parse`-feil med JSON-stien fra serde_path_to_error.
    pub fn from_path_error(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        EngineError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
