//! Error types for GeoScope

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoscopeError {
    // Geometry errors
    #[error("Invalid grid size {size}: must be a finite value in (0, 180] degrees")]
    InvalidGridSize { size: f64 },

    #[error("Invalid coordinate ({lat}, {lng}): latitude must be in [-90, 90], longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Malformed cell identifier '{input}': {reason}")]
    CellFormat { input: String, reason: String },

    #[error("Cell index ({x}|{y}) out of range for grid size {grid_size} ({num_x}x{num_y} cells)")]
    CellOutOfRange {
        x: i64,
        y: i64,
        grid_size: f64,
        num_x: u32,
        num_y: u32,
    },

    // Cascade errors
    #[error("Invalid cascade: {reason}")]
    InvalidCascade { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Model errors
    #[error("Model file not found at {path}")]
    ModelNotFound { path: PathBuf },

    #[error("Unsupported model format version {found}, expected {expected}")]
    ModelVersion { found: u32, expected: u32 },

    #[error("Corrupted model: {reason}")]
    ModelCorrupted { reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GeoscopeError {
    fn from(err: serde_json::Error) -> Self {
        GeoscopeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoscopeError>;
