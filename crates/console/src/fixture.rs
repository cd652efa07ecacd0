//! Record source: the bundled fixture or a JSON file on disk.

use std::path::{Path, PathBuf};

use campus_core::record::Record;

/// Fixture mounted when no records path is configured.
const BUNDLED_RECORDS: &str = include_str!("../fixtures/records.json");

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read record fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record fixture is not a valid record array: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load the ordered record collection.
pub fn load_records(path: Option<&Path>) -> Result<Vec<Record>, FixtureError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let records = parse_records(&raw)?;
            tracing::info!(path = %path.display(), count = records.len(), "Loaded record fixture");
            Ok(records)
        }
        None => {
            let records = parse_records(BUNDLED_RECORDS)?;
            tracing::info!(count = records.len(), "Loaded bundled record fixture");
            Ok(records)
        }
    }
}

pub fn parse_records(raw: &str) -> Result<Vec<Record>, FixtureError> {
    Ok(serde_json::from_str(raw)?)
}
