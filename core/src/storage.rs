use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use crate::session::ResultBundle;

/// Lagrer resultatpakken til disk som JSON (pretty-print).
pub fn save_bundle<P: AsRef<Path>>(bundle: &ResultBundle, path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(bundle)?;
    std::fs::write(path, json).with_context(|| format!("kunne ikke skrive {}", path.display()))?;
    info!(
        "✅ Resultater lagret til {} ({} av {} poser med score)",
        path.display(),
        bundle.summary.scored,
        bundle.summary.total_poses
    );
    Ok(())
}

/// Leser inn en resultatpakke fra disk.
/// Hvis filen ikke finnes, returneres None.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<ResultBundle>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("⚠️ Fant ikke resultater på {}", path.display());
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("kunne ikke lese {}", path.display()))?;
    let bundle: ResultBundle = serde_json::from_str(&contents)
        .with_context(|| format!("ugyldig resultatfil {}", path.display()))?;
    info!("📂 Resultater lastet fra {} (tidspunkt {})", path.display(), bundle.timestamp);
    Ok(Some(bundle))
}

/// Standard filnavn for nedlasting.
pub const DEFAULT_BUNDLE_FILE: &str = "poseyoga-results.json";
