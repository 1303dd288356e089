//! Boundary dataset loading.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::LocatorError;
use crate::models::FeatureCollection;

/// Below this many barangays the dataset is probably a partial extract
pub const MIN_EXPECTED_FEATURES: usize = 10;

/// Load the first dataset that exists among `candidates`, in order.
pub async fn load_boundaries(candidates: &[PathBuf]) -> Result<FeatureCollection, LocatorError> {
    let path = find_dataset(candidates).await?;
    info!("Found barangay data at: {}", path.display());

    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| LocatorError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    parse_boundaries(&path, &raw)
}

async fn find_dataset(candidates: &[PathBuf]) -> Result<PathBuf, LocatorError> {
    for candidate in candidates {
        if tokio::fs::try_exists(candidate).await.unwrap_or(false) {
            return Ok(candidate.clone());
        }
    }

    error!("Barangay data not found at any of these paths:");
    for candidate in candidates {
        error!("  - {}", candidate.display());
    }
    Err(LocatorError::DataNotFound {
        tried: candidates.to_vec(),
    })
}

/// Parse and validate dataset text read from `path`
pub fn parse_boundaries(path: &Path, raw: &str) -> Result<FeatureCollection, LocatorError> {
    let collection: FeatureCollection =
        serde_json::from_str(raw).map_err(|e| LocatorError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if collection.features.is_empty() {
        return Err(LocatorError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    info!("Loaded {} barangay features", collection.features.len());
    if collection.features.len() < MIN_EXPECTED_FEATURES {
        warn!(
            "Very limited barangay data detected ({} features), coverage may be incomplete",
            collection.features.len()
        );
    }

    Ok(collection)
}
