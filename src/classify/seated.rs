// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Seated posture classifier.
//!
//! Works on a side view. Item 1 measures the trunk (shoulder-hip-knee angle), item 2 the
//! seat height (hip-knee-ankle angle), both on the limb side away from the camera-facing ear.

use std::sync::Arc;

use crate::category::Category;
use crate::config::{AnalysisConfig, SeatedThresholds};
use crate::error::Result;
use crate::facing::FacingSide;
use crate::gate::ConfidenceGate;
use crate::geometry::{angle, vertical_angle};
use crate::landmarks::{BodyPlan, Landmark, LandmarkPoint, LandmarkSet};
use crate::results::{AnalysisItem, AnalysisResult, AnalysisStatus, ItemId};
use crate::rules::RuleTable;

use super::{
    Interest, ItemSpec, Observation, PlanGate, PostureClassifier, balance, point, table_outcomes,
};

/// Landmarks the seated classifier reads.
pub const REQUIRED: &[Landmark] = &[
    Landmark::Nose,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

pub const ITEMS: [ItemSpec; 2] = [
    ItemSpec {
        id: ItemId(1),
        name: "trunk angle",
        positive: "Leaning forward.",
        neutral: "Correct sitting posture.",
        negative: "Leaning backward.",
    },
    ItemSpec {
        id: ItemId(2),
        name: "seat height",
        positive: "Hip lower than knees.",
        neutral: "Hip in line with legs.",
        negative: "Hip higher than knees.",
    },
];

/// Rule tables for the seated items.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatedRules {
    /// Shoulder-hip-knee angle.
    pub trunk: RuleTable,
    /// Hip-knee-ankle angle.
    pub seat: RuleTable,
}

impl SeatedRules {
    #[must_use]
    pub fn from_thresholds(t: &SeatedThresholds) -> Self {
        Self {
            trunk: RuleTable::banded(t.trunk_forward, t.trunk_backward),
            seat: RuleTable::banded(t.hip_low, t.hip_high),
        }
    }

    /// Reachable labels per item.
    #[must_use]
    pub fn outcomes(&self) -> Vec<AnalysisItem> {
        table_outcomes(Category::SeatedPosture, &ITEMS, &[&self.trunk, &self.seat])
    }
}

/// Seated posture classifier bound to one body plan.
#[derive(Debug, Clone)]
pub struct SeatedClassifier {
    binding: PlanGate,
    rules: SeatedRules,
    thresholds: SeatedThresholds,
}

impl SeatedClassifier {
    /// Create a classifier for landmarks produced by `plan`.
    ///
    /// Every point of the plan is a point of interest for the confidence gate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AssessmentError::ConfigError`] if the plan lacks a required landmark.
    pub fn new(plan: Arc<BodyPlan>, config: &AnalysisConfig) -> Result<Self> {
        let gate = ConfidenceGate::new(
            config.min_point_confidence,
            config.max_low_confidence_ratio,
        );
        Ok(Self {
            binding: PlanGate::new(plan, REQUIRED, Interest::AllPoints, gate)?,
            rules: SeatedRules::from_thresholds(&config.seated),
            thresholds: config.seated.clone(),
        })
    }

    /// The rule tables in use.
    #[must_use]
    pub const fn rules(&self) -> &SeatedRules {
        &self.rules
    }

    /// The plan this classifier reads.
    #[must_use]
    pub fn plan(&self) -> &BodyPlan {
        self.binding.plan()
    }

    fn feet(&self, left_ankle: &LandmarkPoint, right_ankle: &LandmarkPoint) -> Observation {
        if (left_ankle.y - right_ankle.y).abs() < self.thresholds.feet_tolerance {
            Observation::FeetGrounded
        } else {
            Observation::FeetUneven
        }
    }

    // Knees or ankles stacked horizontally read as uncrossed in a side view.
    fn legs(&self, set: &LandmarkSet) -> Result<Observation> {
        let tol = self.thresholds.legs_tolerance;
        let knees =
            (point(set, Landmark::LeftKnee)?.x - point(set, Landmark::RightKnee)?.x).abs();
        let ankles =
            (point(set, Landmark::LeftAnkle)?.x - point(set, Landmark::RightAnkle)?.x).abs();
        Ok(if knees < tol || ankles < tol {
            Observation::LegsUncrossed
        } else {
            Observation::LegsCrossed
        })
    }
}

impl PostureClassifier for SeatedClassifier {
    fn category(&self) -> Category {
        Category::SeatedPosture
    }

    fn items(&self) -> &'static [ItemSpec] {
        &ITEMS
    }

    fn outcomes(&self) -> Vec<AnalysisItem> {
        self.rules.outcomes()
    }

    fn classify(&self, set: &LandmarkSet) -> Result<AnalysisResult> {
        let gate = self.binding.check(set)?;
        if !gate.passed {
            crate::warn!(
                "Seated landmarks unusable: {}/{} points below confidence threshold",
                gate.low_confidence,
                gate.total
            );
            return Ok(AnalysisResult::unusable(Category::SeatedPosture, Some(gate)));
        }

        let facing = FacingSide::resolve(
            &point(set, Landmark::Nose)?,
            &point(set, Landmark::LeftEar)?,
            &point(set, Landmark::RightEar)?,
        );

        let mut items = Vec::with_capacity(ITEMS.len());
        let mut observations = Vec::with_capacity(4);
        if let Some(limbs) = facing.limbs() {
            let shoulder = point(set, limbs.shoulder)?;
            let hip = point(set, limbs.hip)?;
            let knee = point(set, limbs.knee)?;
            let ankle = point(set, limbs.ankle)?;

            let trunk = self.rules.trunk.evaluate(angle(&shoulder, &hip, &knee));
            let seat = self.rules.seat.evaluate(angle(&hip, &knee, &ankle));
            items.push(AnalysisItem::new(Category::SeatedPosture, 1, trunk));
            items.push(AnalysisItem::new(Category::SeatedPosture, 2, seat));

            let left_shoulder = point(set, Landmark::LeftShoulder)?;
            let right_shoulder = point(set, Landmark::RightShoulder)?;
            observations.push(
                if vertical_angle(&left_shoulder, &right_shoulder) < self.thresholds.back_vertical {
                    Observation::BackNotStraight
                } else {
                    Observation::BackStraight
                },
            );
            observations.push(balance(
                &left_shoulder,
                &right_shoulder,
                self.thresholds.balance_tolerance,
            ));
        }
        observations.push(self.feet(
            &point(set, Landmark::LeftAnkle)?,
            &point(set, Landmark::RightAnkle)?,
        ));
        observations.push(self.legs(set)?);

        Ok(AnalysisResult {
            category: Category::SeatedPosture,
            status: AnalysisStatus::Ok,
            facing: Some(facing),
            items,
            observations,
            gate: Some(gate),
        })
    }
}
