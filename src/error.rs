// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the assessment library.
//!
//! Only failures that abort a request live here. Conditions the engine recovers from
//! (unusable landmarks, ambiguous facing, unknown scenario keys, degenerate geometry)
//! are reported through [`crate::AnalysisResult`] and [`crate::RiskReport`] instead.

use std::fmt;

/// Result type alias for assessment operations.
pub type Result<T> = std::result::Result<T, AssessmentError>;

/// Main error type for the assessment library.
#[derive(Debug)]
pub enum AssessmentError {
    /// The image could not be decoded by the landmark detector.
    InvalidImage(String),
    /// The landmark detector failed for a reason other than a bad image.
    DetectorError(String),
    /// Invalid configuration provided (including body plans missing required landmarks).
    ConfigError(String),
    /// Malformed landmark input (wrong point count, bad tensor shape).
    LandmarkError(String),
    /// Knowledge base is structurally invalid or incomplete when completeness is required.
    KnowledgeBaseError(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
    /// Wrapped `serde_json::Error`.
    Json(serde_json::Error),
}

impl fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage(msg) => write!(f, "Invalid image: {msg}"),
            Self::DetectorError(msg) => write!(f, "Detector error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::LandmarkError(msg) => write!(f, "Landmark error: {msg}"),
            Self::KnowledgeBaseError(msg) => write!(f, "Knowledge base error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for AssessmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssessmentError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
