// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Desk posture classifier.
//!
//! Item 1 is the table height (shoulder-elbow-wrist angle), item 2 the table distance
//! (doubled shoulder-wrist distance) and item 3 the screen height (neck to nose angle).
//! Items 1 and 2 read the arm away from the camera-facing ear; item 3 only needs the
//! shoulders and the nose and is emitted for any facing side.

use std::sync::Arc;

use crate::category::Category;
use crate::config::{AnalysisConfig, DeskThresholds};
use crate::error::Result;
use crate::facing::FacingSide;
use crate::gate::ConfidenceGate;
use crate::geometry::{angle, distance, horizontal_angle, midpoint};
use crate::landmarks::{BodyPlan, Landmark, LandmarkPoint, LandmarkSet};
use crate::results::{AnalysisItem, AnalysisResult, AnalysisStatus, ItemId};
use crate::rules::{Comparator, Label, Rule, RuleTable};

use super::{
    Interest, ItemSpec, Observation, PlanGate, PostureClassifier, balance, point, table_outcomes,
};

/// Landmarks the desk classifier reads.
pub const REQUIRED: &[Landmark] = &[
    Landmark::Nose,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftWrist,
    Landmark::RightWrist,
];

/// Upper body points checked by the confidence gate.
pub const INTEREST: &[Landmark] = &[
    Landmark::Nose,
    Landmark::LeftEar,
    Landmark::RightEar,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftWrist,
    Landmark::RightWrist,
    Landmark::LeftHip,
    Landmark::RightHip,
];

pub const ITEMS: [ItemSpec; 3] = [
    ItemSpec {
        id: ItemId(1),
        name: "table height",
        positive: "The desk is too high.",
        neutral: "Correct table height.",
        negative: "Table too low.",
    },
    ItemSpec {
        id: ItemId(2),
        name: "table distance",
        positive: "Table too close.",
        neutral: "Table at a good distance.",
        negative: "Table too far.",
    },
    ItemSpec {
        id: ItemId(3),
        name: "screen height",
        positive: "Looking upwards.",
        neutral: "Good neck position.",
        negative: "Looking downwards.",
    },
];

/// Rule tables for the desk items.
#[derive(Debug, Clone, PartialEq)]
pub struct DeskRules {
    /// Shoulder-elbow-wrist angle.
    pub height: RuleTable,
    /// Doubled shoulder-wrist distance. Both bounds are inclusive.
    pub distance: RuleTable,
    /// Neck to nose angle against the vertical.
    pub neck: RuleTable,
}

impl DeskRules {
    #[must_use]
    pub fn from_thresholds(t: &DeskThresholds) -> Self {
        Self {
            height: RuleTable::banded(t.desk_high, t.desk_low),
            distance: RuleTable::new(
                vec![
                    Rule::new(Comparator::GreaterOrEqual, t.distance_tolerance, Label::Negative),
                    Rule::new(Comparator::LessOrEqual, t.distance_tolerance / 2.0, Label::Positive),
                ],
                Label::Neutral,
            ),
            neck: RuleTable::new(
                vec![
                    Rule::new(Comparator::Greater, t.neck_up, Label::Positive),
                    Rule::new(Comparator::Less, t.neck_down, Label::Negative),
                ],
                Label::Neutral,
            ),
        }
    }

    /// Reachable labels per item.
    #[must_use]
    pub fn outcomes(&self) -> Vec<AnalysisItem> {
        table_outcomes(
            Category::DeskPosition,
            &ITEMS,
            &[&self.height, &self.distance, &self.neck],
        )
    }
}

/// Desk posture classifier bound to one body plan.
#[derive(Debug, Clone)]
pub struct DeskClassifier {
    binding: PlanGate,
    rules: DeskRules,
    thresholds: DeskThresholds,
}

impl DeskClassifier {
    /// Create a classifier for landmarks produced by `plan`.
    ///
    /// Only the upper body points in [`INTEREST`] are checked by the confidence gate.
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
            binding: PlanGate::new(plan, REQUIRED, Interest::Landmarks(INTEREST), gate)?,
            rules: DeskRules::from_thresholds(&config.desk),
            thresholds: config.desk.clone(),
        })
    }

    /// The rule tables in use.
    #[must_use]
    pub const fn rules(&self) -> &DeskRules {
        &self.rules
    }

    /// The plan this classifier reads.
    #[must_use]
    pub fn plan(&self) -> &BodyPlan {
        self.binding.plan()
    }

    // Image y grows downward, so a larger wrist y is a lower wrist. Named by screen position
    // rather than by raw y order.
    fn wrist(&self, wrist: &LandmarkPoint, elbow: &LandmarkPoint) -> Option<Observation> {
        if (wrist.y - elbow.y).abs() <= self.thresholds.wrist_elbow_tolerance {
            return None;
        }
        Some(if wrist.y > elbow.y {
            Observation::WristBelowElbow
        } else {
            Observation::WristAboveElbow
        })
    }
}

impl PostureClassifier for DeskClassifier {
    fn category(&self) -> Category {
        Category::DeskPosition
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
                "Desk landmarks unusable: {}/{} points below confidence threshold",
                gate.low_confidence,
                gate.total
            );
            return Ok(AnalysisResult::unusable(Category::DeskPosition, Some(gate)));
        }

        let nose = point(set, Landmark::Nose)?;
        let facing = FacingSide::resolve(
            &nose,
            &point(set, Landmark::LeftEar)?,
            &point(set, Landmark::RightEar)?,
        );
        let left_shoulder = point(set, Landmark::LeftShoulder)?;
        let right_shoulder = point(set, Landmark::RightShoulder)?;
        let neck = midpoint(&left_shoulder, &right_shoulder);

        let mut items = Vec::with_capacity(ITEMS.len());
        let mut observations = Vec::with_capacity(3);
        if let Some(limbs) = facing.limbs() {
            let shoulder = point(set, limbs.shoulder)?;
            let elbow = point(set, limbs.elbow)?;
            let wrist = point(set, limbs.wrist)?;

            let height = self.rules.height.evaluate(angle(&shoulder, &elbow, &wrist));
            let reach = self.rules.distance.evaluate(2.0 * distance(&shoulder, &wrist));
            items.push(AnalysisItem::new(Category::DeskPosition, 1, height));
            items.push(AnalysisItem::new(Category::DeskPosition, 2, reach));
            observations.extend(self.wrist(&wrist, &elbow));
            observations.push(
                if angle(&left_shoulder, &neck, &right_shoulder) < self.thresholds.back_straight {
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
        // The neck angle needs both shoulders and the nose only, so it survives an ambiguous side.
        let neck_label = self.rules.neck.evaluate(horizontal_angle(&neck, &nose));
        items.push(AnalysisItem::new(Category::DeskPosition, 3, neck_label));

        Ok(AnalysisResult {
            category: Category::DeskPosition,
            status: AnalysisStatus::Ok,
            facing: Some(facing),
            items,
            observations,
            gate: Some(gate),
        })
    }
}
