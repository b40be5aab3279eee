// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Confidence gate: rejects landmark sets too noisy to classify.

use serde::Serialize;

use crate::landmarks::LandmarkSet;

/// Outcome of running the gate over a set of points of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateReport {
    /// Points of interest whose confidence fell below the per-point threshold.
    pub low_confidence: usize,
    /// Number of points of interest inspected.
    pub total: usize,
    /// Whether the set is usable for classification.
    pub passed: bool,
}

impl GateReport {
    /// Fraction of points of interest below the per-point threshold.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn low_confidence_ratio(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.low_confidence as f32 / self.total as f32
    }
}

/// Per-point and ratio thresholds for the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    min_confidence: f32,
    max_low_ratio: f32,
}

impl ConfidenceGate {
    /// Create a gate. A set fails when more than `max_low_ratio` of its points of interest
    /// have confidence below `min_confidence`.
    #[must_use]
    pub const fn new(min_confidence: f32, max_low_ratio: f32) -> Self {
        Self {
            min_confidence,
            max_low_ratio,
        }
    }

    /// Check the points at `indices`. Indices outside the set count as low confidence.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn check(&self, set: &LandmarkSet, indices: &[usize]) -> GateReport {
        let low_confidence = indices
            .iter()
            .filter(|&&i| set.at(i).is_none_or(|p| p.confidence < self.min_confidence))
            .count();
        let total = indices.len();
        let passed = total == 0 || (low_confidence as f32 / total as f32) <= self.max_low_ratio;
        GateReport {
            low_confidence,
            total,
            passed,
        }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(0.2, 0.75)
    }
}
