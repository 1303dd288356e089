use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct LocatorConfig {
    /// Dataset locations, tried in order
    pub dataset_paths: Vec<PathBuf>,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub quadtree: QuadTreeConfig,
    #[serde(default)]
    pub region: RegionConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeConfig {
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Expected operating area. Points outside it are still resolved, with a warning.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RegionConfig {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_max_objects() -> usize {
    10
}

fn default_max_depth() -> usize {
    5
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: default_max_objects(),
            max_depth: default_max_depth(),
        }
    }
}

// Generous box around Davao City
impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_lat: 6.8,
            max_lat: 7.4,
            min_lng: 125.2,
            max_lng: 125.8,
        }
    }
}

impl RegionConfig {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

impl LocatorConfig {
    /// Config for a single dataset file with default tuning
    pub fn with_dataset<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            dataset_paths: vec![path.into()],
            cache_capacity: default_cache_capacity(),
            quadtree: QuadTreeConfig::default(),
            region: RegionConfig::default(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: LocatorConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        if config.dataset_paths.is_empty() {
            anyhow::bail!("Config must list at least one dataset path");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_applied() {
        let config: LocatorConfig =
            toml::from_str(r#"dataset_paths = ["data/davao-barangays.geojson"]"#).unwrap();
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.quadtree, QuadTreeConfig::default());
        assert!(config.region.contains(7.07, 125.6));
        assert!(!config.region.contains(14.6, 121.0));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
dataset_paths = ["a.geojson", "b.json"]
cache_capacity = 50

[quadtree]
max_objects = 4
"#
        )
        .unwrap();

        let config = LocatorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.dataset_paths.len(), 2);
        assert_eq!(config.cache_capacity, 50);
        assert_eq!(config.quadtree.max_objects, 4);
        assert_eq!(config.quadtree.max_depth, 5);
    }

    #[test]
    fn test_empty_dataset_paths_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dataset_paths = []").unwrap();
        assert!(LocatorConfig::load_from_file(file.path()).is_err());
    }
}
