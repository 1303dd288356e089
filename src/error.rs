//! Errors raised by the resolver.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading boundaries or answering a query.
///
/// Initialization failures are memoized and handed to every later caller,
/// so the type is `Clone` and carries rendered messages instead of sources.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocatorError {
    #[error("barangay data not found, tried: {}", display_paths(.tried))]
    DataNotFound { tried: Vec<PathBuf> },

    #[error("failed to parse barangay data at {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("barangay data at {} contains no features", .path.display())]
    EmptyDataset { path: PathBuf },

    #[error("invalid coordinates ({lat}, {lng}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

impl LocatorError {
    /// Whether the error came from loading the dataset rather than from a query
    pub fn is_initialization(&self) -> bool {
        !matches!(self, LocatorError::InvalidCoordinate { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
