// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Analysis configuration.
//!
//! This module defines [`AnalysisConfig`], which holds every tunable threshold used by the
//! confidence gate and the domain classifiers. Defaults reproduce the reference thresholds;
//! JSON files may override any subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds for the seated posture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatedThresholds {
    /// Shoulder-hip-knee angle below which the trunk leans forward (degrees).
    pub trunk_forward: f32,
    /// Shoulder-hip-knee angle above which the trunk leans backward (degrees).
    pub trunk_backward: f32,
    /// Hip-knee-ankle angle below which the hip sits lower than the knee (degrees).
    pub hip_low: f32,
    /// Hip-knee-ankle angle above which the hip sits higher than the knee (degrees).
    pub hip_high: f32,
    /// Shoulder-line angle to vertical below which the back is reported not straight (degrees).
    pub back_vertical: f32,
    /// Shoulder height difference tolerated before reporting a sideways lean.
    pub balance_tolerance: f32,
    /// Ankle height difference tolerated for both feet to count as grounded.
    pub feet_tolerance: f32,
    /// Horizontal knee or ankle gap under which the legs count as uncrossed.
    pub legs_tolerance: f32,
}

impl Default for SeatedThresholds {
    fn default() -> Self {
        Self {
            trunk_forward: 85.0,
            trunk_backward: 115.0,
            hip_low: 90.0,
            hip_high: 110.0,
            back_vertical: 20.0,
            balance_tolerance: 0.1,
            feet_tolerance: 0.05,
            legs_tolerance: 0.1,
        }
    }
}

/// Thresholds for the desk posture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskThresholds {
    /// Shoulder-elbow-wrist angle below which the desk is too high (degrees).
    pub desk_high: f32,
    /// Shoulder-elbow-wrist angle above which the desk is too low (degrees).
    pub desk_low: f32,
    /// Doubled shoulder-wrist distance at or beyond which the desk is too far.
    /// Half of it is the too-close bound.
    pub distance_tolerance: f32,
    /// Neck angle above which the user looks up (degrees).
    pub neck_up: f32,
    /// Neck angle below which the user looks down (degrees).
    pub neck_down: f32,
    /// Wrist-elbow height difference tolerated before reporting it.
    pub wrist_elbow_tolerance: f32,
    /// Angle across the shoulder line below which the back is reported not straight (degrees).
    pub back_straight: f32,
    /// Shoulder height difference tolerated before reporting a sideways lean.
    pub balance_tolerance: f32,
}

impl Default for DeskThresholds {
    fn default() -> Self {
        Self {
            desk_high: 50.0,
            desk_low: 130.0,
            distance_tolerance: 0.15,
            neck_up: 5.0,
            neck_down: -5.0,
            wrist_elbow_tolerance: 0.1,
            back_straight: 160.0,
            balance_tolerance: 0.1,
        }
    }
}

/// Thresholds for the hand posture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandThresholds {
    /// Fingertip-to-knuckle distance under which a finger counts as curled.
    pub claw_distance: f32,
    /// Number of curled or extended fingers (out of four) needed to report the finding.
    pub min_fingers: usize,
    /// Maximum number of hands analysed per image.
    pub max_hands: usize,
}

impl Default for HandThresholds {
    fn default() -> Self {
        Self {
            claw_distance: 0.1,
            min_fingers: 3,
            max_hands: 2,
        }
    }
}

/// Configuration for posture analysis.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use posture_assessment::AnalysisConfig;
///
/// let config = AnalysisConfig::new()
///     .with_min_confidence(0.3)
///     .with_max_low_confidence_ratio(0.5);
/// assert!((config.min_point_confidence - 0.3).abs() < f32::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Points with confidence below this value count as low confidence (0.0 to 1.0).
    pub min_point_confidence: f32,
    /// A landmark set is unusable when more than this share of its points of interest
    /// are low confidence (0.0 to 1.0).
    pub max_low_confidence_ratio: f32,
    /// Seated posture thresholds.
    pub seated: SeatedThresholds,
    /// Desk posture thresholds.
    pub desk: DeskThresholds,
    /// Hand posture thresholds.
    pub hand: HandThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_point_confidence: 0.2,
            max_low_confidence_ratio: 0.75,
            seated: SeatedThresholds::default(),
            desk: DeskThresholds::default(),
            hand: HandThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Set the per-point confidence threshold.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Minimum confidence for a point to count as reliable (0.0 to 1.0).
    #[must_use]
    pub const fn with_min_confidence(mut self, threshold: f32) -> Self {
        self.min_point_confidence = threshold;
        self
    }

    /// Set the maximum tolerated share of low-confidence points of interest.
    #[must_use]
    pub const fn with_max_low_confidence_ratio(mut self, ratio: f32) -> Self {
        self.max_low_confidence_ratio = ratio;
        self
    }

    /// Replace the seated posture thresholds.
    #[must_use]
    pub fn with_seated(mut self, seated: SeatedThresholds) -> Self {
        self.seated = seated;
        self
    }

    /// Replace the desk posture thresholds.
    #[must_use]
    pub fn with_desk(mut self, desk: DeskThresholds) -> Self {
        self.desk = desk;
        self
    }

    /// Replace the hand posture thresholds.
    #[must_use]
    pub fn with_hand(mut self, hand: HandThresholds) -> Self {
        self.hand = hand;
        self
    }
}
