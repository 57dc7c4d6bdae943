//! Loading of ingestion batches and substance tables from disk.

use std::path::{Path, PathBuf};

use dosetrail_core::{Config, Ingestion, SubstanceTable};

/// Resolve the substance table from `--substances` or the config file.
pub fn load_substances(
    path: Option<&Path>,
    config: &Config,
) -> Result<SubstanceTable, Box<dyn std::error::Error>> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => config.data.substances_path.clone().ok_or(
            "no substance table given; pass --substances or set data.substances_path",
        )?,
    };
    SubstanceTable::load(&path)
        .map_err(|e| format!("failed to load substances from {}: {e}", path.display()).into())
}

/// Read a JSON array of ingestions.
pub fn load_ingestions(path: &Path) -> Result<Vec<Ingestion>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let ingestions: Vec<Ingestion> = serde_json::from_str(&content)?;
    tracing::debug!(count = ingestions.len(), path = %path.display(), "loaded ingestions");
    Ok(ingestions)
}
