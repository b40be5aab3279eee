// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Domain classifiers.
//!
//! Each body classifier resolves its required landmarks against a [`BodyPlan`] once at
//! construction, gates incoming sets on confidence, resolves the facing side and evaluates
//! its rule tables. Items are emitted with explicit knowledge base item ids.

pub mod desk;
pub mod hand;
pub mod seated;

use std::sync::Arc;

use serde::Serialize;

use crate::category::Category;
use crate::config::AnalysisConfig;
use crate::error::{AssessmentError, Result};
use crate::gate::{ConfidenceGate, GateReport};
use crate::landmarks::{BodyPlan, Landmark, LandmarkPoint, LandmarkSet};
use crate::results::{AnalysisItem, AnalysisResult, ItemId};
use crate::rules::{Label, RuleTable};

pub use desk::DeskClassifier;
pub use hand::{
    FingerExtension, GripStyle, HandAssessment, HandBend, HandClassifier, WristFlexion,
};
pub use desk::DeskRules;
pub use seated::{SeatedClassifier, SeatedRules};

/// A classifier turning one body landmark set into an [`AnalysisResult`].
pub trait PostureClassifier: Send + Sync {
    /// Category whose knowledge base section the items refer to.
    fn category(&self) -> Category;

    /// Items this classifier can emit, in knowledge base order.
    fn items(&self) -> &'static [ItemSpec];

    /// Every item and label the rule tables can produce, in knowledge base order.
    fn outcomes(&self) -> Vec<AnalysisItem>;

    /// Classify one landmark set.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if the set was produced by a different body plan.
    fn classify(&self, set: &LandmarkSet) -> Result<AnalysisResult>;
}

/// Static description of one classifier item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: ItemId,
    pub name: &'static str,
    pub positive: &'static str,
    pub neutral: &'static str,
    pub negative: &'static str,
}

impl ItemSpec {
    /// Sentence describing `label` for this item.
    #[must_use]
    pub const fn sentence(&self, label: Label) -> &'static str {
        match label {
            Label::Positive => self.positive,
            Label::Neutral => self.neutral,
            Label::Negative => self.negative,
        }
    }
}

/// Item specs emitted for a category. Empty for categories without a wired classifier.
#[must_use]
pub const fn item_specs(category: Category) -> &'static [ItemSpec] {
    match category {
        Category::SeatedPosture => &seated::ITEMS,
        Category::DeskPosition => &desk::ITEMS,
        Category::HandPosition => &[],
    }
}

/// Outcomes the body classifiers built from `config` can produce, in category and item order.
#[must_use]
pub fn outcomes(config: &AnalysisConfig) -> Vec<AnalysisItem> {
    let mut outcomes = SeatedRules::from_thresholds(&config.seated).outcomes();
    outcomes.extend(DeskRules::from_thresholds(&config.desk).outcomes());
    outcomes
}

/// Pair each item spec with the reachable labels of its rule table.
pub(crate) fn table_outcomes(
    category: Category,
    specs: &[ItemSpec],
    tables: &[&RuleTable],
) -> Vec<AnalysisItem> {
    specs
        .iter()
        .zip(tables)
        .flat_map(|(spec, table)| {
            table.labels().into_iter().map(move |label| AnalysisItem {
                category,
                item_id: spec.id,
                label,
            })
        })
        .collect()
}

/// Sentence for a classified item, if the item is known.
#[must_use]
pub fn describe(category: Category, item_id: ItemId, label: Label) -> Option<&'static str> {
    item_specs(category)
        .iter()
        .find(|spec| spec.id == item_id)
        .map(|spec| spec.sentence(label))
}

/// Findings reported alongside the knowledge base items but not risk-ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    BackStraight,
    BackNotStraight,
    Balanced,
    LeaningLeft,
    LeaningRight,
    FeetGrounded,
    FeetUneven,
    LegsCrossed,
    LegsUncrossed,
    WristAboveElbow,
    WristBelowElbow,
}

impl Observation {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::BackStraight => "Back is straight.",
            Self::BackNotStraight => "Back is not straight.",
            Self::Balanced => "Body is well balanced.",
            Self::LeaningLeft => "Leaning to the left.",
            Self::LeaningRight => "Leaning to the right.",
            Self::FeetGrounded => "Both feet are placed on the ground.",
            Self::FeetUneven => {
                "Feet are not evenly placed on the ground or at least one foot is not on the ground."
            }
            Self::LegsCrossed => "The legs are crossed.",
            Self::LegsUncrossed => "The legs are not crossed.",
            Self::WristAboveElbow => "Wrist higher than elbow.",
            Self::WristBelowElbow => "Wrist lower than elbow.",
        }
    }
}

/// Sideways lean from the shoulder heights.
pub(crate) fn balance(
    left_shoulder: &LandmarkPoint,
    right_shoulder: &LandmarkPoint,
    tolerance: f32,
) -> Observation {
    if (left_shoulder.y - right_shoulder.y).abs() > tolerance {
        if left_shoulder.y > right_shoulder.y {
            Observation::LeaningRight
        } else {
            Observation::LeaningLeft
        }
    } else {
        Observation::Balanced
    }
}

/// Points of interest checked by the confidence gate.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Interest {
    /// Every point the plan emits.
    AllPoints,
    /// Only the named landmarks.
    Landmarks(&'static [Landmark]),
}

/// Plan binding and confidence gating shared by the body classifiers.
#[derive(Debug, Clone)]
pub(crate) struct PlanGate {
    plan: Arc<BodyPlan>,
    gate: ConfidenceGate,
    interest: Vec<usize>,
}

impl PlanGate {
    pub(crate) fn new(
        plan: Arc<BodyPlan>,
        required: &[Landmark],
        interest: Interest,
        gate: ConfidenceGate,
    ) -> Result<Self> {
        plan.require(required)?;
        let interest = match interest {
            Interest::AllPoints => (0..plan.num_points()).collect(),
            Interest::Landmarks(names) => plan.require(names)?,
        };
        Ok(Self {
            plan,
            gate,
            interest,
        })
    }

    pub(crate) fn plan(&self) -> &BodyPlan {
        &self.plan
    }

    /// Gate a set, failing if it was produced by another plan.
    pub(crate) fn check(&self, set: &LandmarkSet) -> Result<GateReport> {
        if set.plan() != self.plan.as_ref() {
            return Err(AssessmentError::ConfigError(format!(
                "classifier built for plan '{}' received landmarks from plan '{}'",
                self.plan.name(),
                set.plan().name()
            )));
        }
        Ok(self.gate.check(set, &self.interest))
    }
}

/// Named point lookup for a landmark whose presence the plan binding guarantees.
pub(crate) fn point(set: &LandmarkSet, landmark: Landmark) -> Result<LandmarkPoint> {
    set.get(landmark).copied().ok_or_else(|| {
        AssessmentError::ConfigError(format!(
            "plan '{}' has no index for {landmark:?}",
            set.plan().name()
        ))
    })
}
