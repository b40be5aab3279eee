// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Landmark data model and body plans.
//!
//! A [`LandmarkSet`] is the ordered point list a detector produced for one body or one hand.
//! Indices are only meaningful together with the [`BodyPlan`] that produced them, so every set
//! carries its plan and classifiers resolve named points through the plan's index table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::{ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, Result};

/// A single detected point in normalized image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Normalized X coordinate (0.0 to 1.0).
    pub x: f32,
    /// Normalized Y coordinate (0.0 to 1.0), growing downward.
    pub y: f32,
    /// Detector confidence or visibility (0.0 to 1.0).
    pub confidence: f32,
}

impl LandmarkPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Returns `[x, y]`.
    #[must_use]
    pub const fn xy(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 3]> for LandmarkPoint {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Named anatomical landmarks across the supported body plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

const BLAZEPOSE_INDICES: [(Landmark, usize); 15] = [
    (Landmark::Nose, 0),
    (Landmark::LeftEar, 7),
    (Landmark::RightEar, 8),
    (Landmark::LeftShoulder, 11),
    (Landmark::RightShoulder, 12),
    (Landmark::LeftElbow, 13),
    (Landmark::RightElbow, 14),
    (Landmark::LeftWrist, 15),
    (Landmark::RightWrist, 16),
    (Landmark::LeftHip, 23),
    (Landmark::RightHip, 24),
    (Landmark::LeftKnee, 25),
    (Landmark::RightKnee, 26),
    (Landmark::LeftAnkle, 27),
    (Landmark::RightAnkle, 28),
];

const COCO_INDICES: [(Landmark, usize); 15] = [
    (Landmark::Nose, 0),
    (Landmark::LeftEar, 3),
    (Landmark::RightEar, 4),
    (Landmark::LeftShoulder, 5),
    (Landmark::RightShoulder, 6),
    (Landmark::LeftElbow, 7),
    (Landmark::RightElbow, 8),
    (Landmark::LeftWrist, 9),
    (Landmark::RightWrist, 10),
    (Landmark::LeftHip, 11),
    (Landmark::RightHip, 12),
    (Landmark::LeftKnee, 13),
    (Landmark::RightKnee, 14),
    (Landmark::LeftAnkle, 15),
    (Landmark::RightAnkle, 16),
];

const HAND_INDICES: [(Landmark, usize); 21] = [
    (Landmark::Wrist, 0),
    (Landmark::ThumbCmc, 1),
    (Landmark::ThumbMcp, 2),
    (Landmark::ThumbIp, 3),
    (Landmark::ThumbTip, 4),
    (Landmark::IndexMcp, 5),
    (Landmark::IndexPip, 6),
    (Landmark::IndexDip, 7),
    (Landmark::IndexTip, 8),
    (Landmark::MiddleMcp, 9),
    (Landmark::MiddlePip, 10),
    (Landmark::MiddleDip, 11),
    (Landmark::MiddleTip, 12),
    (Landmark::RingMcp, 13),
    (Landmark::RingPip, 14),
    (Landmark::RingDip, 15),
    (Landmark::RingTip, 16),
    (Landmark::PinkyMcp, 17),
    (Landmark::PinkyPip, 18),
    (Landmark::PinkyDip, 19),
    (Landmark::PinkyTip, 20),
];

/// Index scheme of a specific landmark detector.
///
/// Maps landmark names to positions in the detector's output. The built-in plans cover
/// `BlazePose` (33 points), COCO/MoveNet (17 points) and the 21-point hand model; other
/// detectors can be described with [`BodyPlan::custom`] or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BodyPlanFile")]
pub struct BodyPlan {
    name: String,
    num_points: usize,
    indices: BTreeMap<Landmark, usize>,
}

/// Unvalidated plan as it appears in JSON.
#[derive(Deserialize)]
struct BodyPlanFile {
    name: String,
    num_points: usize,
    indices: BTreeMap<Landmark, usize>,
}

impl TryFrom<BodyPlanFile> for BodyPlan {
    type Error = AssessmentError;

    fn try_from(file: BodyPlanFile) -> Result<Self> {
        Self::custom(file.name, file.num_points, file.indices)
    }
}

impl BodyPlan {
    /// `BlazePose` / `MediaPipe` Pose 33-point full-body plan.
    #[must_use]
    pub fn blazepose() -> Self {
        Self::from_table("blazepose", 33, &BLAZEPOSE_INDICES)
    }

    /// COCO / MoveNet 17-point lightweight plan.
    #[must_use]
    pub fn coco() -> Self {
        Self::from_table("coco", 17, &COCO_INDICES)
    }

    /// `MediaPipe` 21-point hand plan.
    #[must_use]
    pub fn hand() -> Self {
        Self::from_table("hand", 21, &HAND_INDICES)
    }

    /// Build a plan from an explicit index table.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if an index is out of range for `num_points`.
    pub fn custom(
        name: impl Into<String>,
        num_points: usize,
        indices: BTreeMap<Landmark, usize>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some((landmark, idx)) = indices.iter().find(|(_, idx)| **idx >= num_points) {
            return Err(AssessmentError::ConfigError(format!(
                "plan '{name}' maps {landmark:?} to index {idx}, but has only {num_points} points"
            )));
        }
        Ok(Self {
            name,
            num_points,
            indices,
        })
    }

    fn from_table(name: &str, num_points: usize, table: &[(Landmark, usize)]) -> Self {
        Self {
            name: name.to_string(),
            num_points,
            indices: table.iter().copied().collect(),
        }
    }

    /// Plan name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of points a detector following this plan emits.
    #[must_use]
    pub const fn num_points(&self) -> usize {
        self.num_points
    }

    /// Index of a named landmark, if this plan has it.
    #[must_use]
    pub fn index_of(&self, landmark: Landmark) -> Option<usize> {
        self.indices.get(&landmark).copied()
    }

    /// Resolve every landmark in `required` or fail naming the first one missing.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] when the plan lacks a required landmark.
    pub fn require(&self, required: &[Landmark]) -> Result<Vec<usize>> {
        required
            .iter()
            .map(|&lm| {
                self.index_of(lm).ok_or_else(|| {
                    AssessmentError::ConfigError(format!(
                        "body plan '{}' has no index for required landmark {lm:?}",
                        self.name
                    ))
                })
            })
            .collect()
    }
}

impl fmt::Display for BodyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} points)", self.name, self.num_points)
    }
}

impl FromStr for BodyPlan {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "blazepose" | "mediapipe" | "33" => Ok(Self::blazepose()),
            "coco" | "movenet" | "17" => Ok(Self::coco()),
            "hand" | "hands" | "21" => Ok(Self::hand()),
            _ => Err(AssessmentError::ConfigError(format!(
                "invalid body plan '{s}', expected one of: blazepose, coco, hand"
            ))),
        }
    }
}

/// Ordered landmarks for one body or one hand, tagged with the plan that produced them.
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    plan: Arc<BodyPlan>,
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    /// Create a set, checking the point count against the plan.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::LandmarkError`] if `points.len()` differs from the plan size.
    pub fn new(plan: Arc<BodyPlan>, points: Vec<LandmarkPoint>) -> Result<Self> {
        if points.len() != plan.num_points() {
            return Err(AssessmentError::LandmarkError(format!(
                "expected {} points for plan '{}', got {}",
                plan.num_points(),
                plan.name(),
                points.len()
            )));
        }
        Ok(Self { plan, points })
    }

    /// Build a set from a `(K, 3)` or `(K, 2)` array of `x, y[, confidence]` rows.
    ///
    /// Rows without a confidence column are treated as fully confident.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::LandmarkError`] on an unexpected column count or point count.
    pub fn from_array(plan: Arc<BodyPlan>, data: ArrayView2<'_, f32>) -> Result<Self> {
        let cols = data.ncols();
        if !(2..=3).contains(&cols) {
            return Err(AssessmentError::LandmarkError(format!(
                "landmark rows need 2 or 3 columns, got {cols}"
            )));
        }
        let points = data
            .axis_iter(Axis(0))
            .map(|row| LandmarkPoint::new(row[0], row[1], if cols == 3 { row[2] } else { 1.0 }))
            .collect();
        Self::new(plan, points)
    }

    /// Split an `(N, K, C)` pose tensor into one set per detection.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::LandmarkError`] if any detection has the wrong shape.
    pub fn from_pose_tensor(plan: &Arc<BodyPlan>, data: ArrayView3<'_, f32>) -> Result<Vec<Self>> {
        data.axis_iter(Axis(0))
            .map(|pose| Self::from_array(Arc::clone(plan), pose))
            .collect()
    }

    /// The plan that produced this set.
    #[must_use]
    pub fn plan(&self) -> &BodyPlan {
        &self.plan
    }

    /// All points in plan order.
    #[must_use]
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at a raw index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    /// Point for a named landmark, if the plan has it.
    #[must_use]
    pub fn get(&self, landmark: Landmark) -> Option<&LandmarkPoint> {
        self.plan.index_of(landmark).and_then(|i| self.points.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn test_builtin_plan_sizes() {
        assert_eq!(BodyPlan::blazepose().num_points(), 33);
        assert_eq!(BodyPlan::coco().num_points(), 17);
        assert_eq!(BodyPlan::hand().num_points(), 21);
    }

    #[test]
    fn test_plans_disagree_on_indices() {
        assert_eq!(BodyPlan::blazepose().index_of(Landmark::LeftShoulder), Some(11));
        assert_eq!(BodyPlan::coco().index_of(Landmark::LeftShoulder), Some(5));
        assert_eq!(BodyPlan::coco().index_of(Landmark::Wrist), None);
        assert_eq!(BodyPlan::hand().index_of(Landmark::PinkyTip), Some(20));
    }

    #[test]
    fn test_plan_from_str() {
        assert_eq!("mediapipe".parse::<BodyPlan>().unwrap().name(), "blazepose");
        assert_eq!("MoveNet".parse::<BodyPlan>().unwrap().name(), "coco");
        assert_eq!("21".parse::<BodyPlan>().unwrap().name(), "hand");
        assert!("openpose".parse::<BodyPlan>().is_err());
    }

    #[test]
    fn test_require_reports_missing_landmark() {
        let err = BodyPlan::hand()
            .require(&[Landmark::Wrist, Landmark::Nose])
            .unwrap_err();
        assert!(err.to_string().contains("Nose"));

        let idx = BodyPlan::coco()
            .require(&[Landmark::Nose, Landmark::RightAnkle])
            .unwrap();
        assert_eq!(idx, vec![0, 16]);
    }

    #[test]
    fn test_custom_plan_rejects_out_of_range_index() {
        let table = BTreeMap::from([(Landmark::Nose, 0), (Landmark::LeftEar, 5)]);
        assert!(BodyPlan::custom("tiny", 5, table.clone()).is_err());
        assert!(BodyPlan::custom("tiny", 6, table).is_ok());
    }

    #[test]
    fn test_plan_from_json_checks_indices() {
        let json = r#"{"name": "broken", "num_points": 17,
            "indices": {"nose": 0, "right_ankle": 40}}"#;
        let err = serde_json::from_str::<BodyPlan>(json).unwrap_err();
        assert!(err.to_string().contains("index 40"));

        let saved = serde_json::to_string(&BodyPlan::coco()).unwrap();
        let plan: BodyPlan = serde_json::from_str(&saved).unwrap();
        assert_eq!(plan, BodyPlan::coco());
    }

    #[test]
    fn test_set_checks_point_count() {
        let plan = Arc::new(BodyPlan::coco());
        assert!(LandmarkSet::new(Arc::clone(&plan), vec![LandmarkPoint::default(); 16]).is_err());
        let set = LandmarkSet::new(plan, vec![LandmarkPoint::default(); 17]).unwrap();
        assert_eq!(set.len(), 17);
    }

    #[test]
    fn test_get_by_name() {
        let plan = Arc::new(BodyPlan::coco());
        let mut points = vec![LandmarkPoint::default(); 17];
        points[4] = LandmarkPoint::new(0.4, 0.2, 0.9);
        let set = LandmarkSet::new(plan, points).unwrap();
        let ear = set.get(Landmark::RightEar).unwrap();
        assert!((ear.x - 0.4).abs() < 1e-6);
        assert!((ear.confidence - 0.9).abs() < 1e-6);
        assert!(set.get(Landmark::IndexTip).is_none());
    }

    #[test]
    fn test_from_array_without_confidence() {
        let plan = Arc::new(BodyPlan::hand());
        let data = Array2::<f32>::from_elem((21, 2), 0.5);
        let set = LandmarkSet::from_array(plan, data.view()).unwrap();
        assert!(set.points().iter().all(|p| (p.confidence - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_from_array_rejects_bad_columns() {
        let plan = Arc::new(BodyPlan::hand());
        let data = array![[0.1_f32, 0.2, 0.3, 0.4]];
        assert!(LandmarkSet::from_array(plan, data.view()).is_err());
    }

    #[test]
    fn test_from_pose_tensor() {
        let plan = Arc::new(BodyPlan::coco());
        let data = ndarray::Array3::<f32>::from_elem((2, 17, 3), 0.3);
        let sets = LandmarkSet::from_pose_tensor(&plan, data.view()).unwrap();
        assert_eq!(sets.len(), 2);
        assert!((sets[1].points()[16].confidence - 0.3).abs() < 1e-6);
    }
}
