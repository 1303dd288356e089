//! Narra - barangay resolution for Davao City coordinates
//!
//! This library provides the point-in-polygon engine shared by the server and lookup binaries.

pub mod config;
pub mod error;
pub mod models;
pub mod pip;

pub use config::LocatorConfig;
pub use error::LocatorError;
pub use models::{Resolution, ResolutionMethod};
pub use pip::Locator;
