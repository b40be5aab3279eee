// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! High-level analysis facade.
//!
//! [`PostureAnalyzer`] owns one classifier per category, built once from an
//! [`AnalysisConfig`] and the body plans of the landmark detectors in use. It can be shared
//! across threads; every call works on its own landmark data.

use std::sync::Arc;

use serde::Serialize;

use crate::category::Category;
use crate::classify::{DeskClassifier, HandClassifier, PostureClassifier, SeatedClassifier};
use crate::config::AnalysisConfig;
use crate::error::{AssessmentError, Result};
use crate::knowledge::KnowledgeBase;
use crate::landmarks::{BodyPlan, LandmarkSet};
use crate::report::{RiskAggregator, RiskReport};
use crate::results::{AnalysisItem, AnalysisResult, HandAnalysis};

/// Produces landmarks from encoded image bytes.
///
/// Implementations wrap a pose or hand landmark model. Decoding failures should be
/// reported as [`AssessmentError::InvalidImage`], model failures as
/// [`AssessmentError::DetectorError`].
pub trait LandmarkDetector: Send + Sync {
    /// Detect the most prominent body. `Ok(None)` when nobody is visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded or the model fails.
    fn detect_pose(&self, image: &[u8]) -> Result<Option<LandmarkSet>>;

    /// Detect every visible hand, in detector order.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded or the model fails.
    fn detect_hands(&self, image: &[u8]) -> Result<Vec<LandmarkSet>>;
}

/// Output of one analysis call.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Assessment {
    /// Seated or desk analysis.
    Body(AnalysisResult),
    /// Hand analysis.
    Hands(HandAnalysis),
}

impl Assessment {
    /// The body result, if this is a seated or desk analysis.
    #[must_use]
    pub const fn body(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Body(result) => Some(result),
            Self::Hands(_) => None,
        }
    }

    /// The hand result, if this is a hand analysis.
    #[must_use]
    pub const fn hands(&self) -> Option<&HandAnalysis> {
        match self {
            Self::Body(_) => None,
            Self::Hands(analysis) => Some(analysis),
        }
    }

    /// Human-readable findings.
    #[must_use]
    pub fn verbose(&self) -> String {
        match self {
            Self::Body(result) => result.verbose(),
            Self::Hands(analysis) => analysis.verbose(),
        }
    }
}

/// Posture analyzer for all categories.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use posture_assessment::{AnalysisConfig, BodyPlan, PostureAnalyzer};
///
/// let analyzer = PostureAnalyzer::new(
///     Arc::new(BodyPlan::coco()),
///     Arc::new(BodyPlan::hand()),
///     AnalysisConfig::default(),
/// )?;
/// assert_eq!(analyzer.body_plan().name(), "coco");
/// # Ok::<(), posture_assessment::AssessmentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PostureAnalyzer {
    config: AnalysisConfig,
    body_plan: Arc<BodyPlan>,
    seated: SeatedClassifier,
    desk: DeskClassifier,
    hand: HandClassifier,
}

impl PostureAnalyzer {
    /// Build the classifiers for the given body and hand plans.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if a plan lacks a landmark a classifier needs.
    pub fn new(
        body_plan: Arc<BodyPlan>,
        hand_plan: Arc<BodyPlan>,
        config: AnalysisConfig,
    ) -> Result<Self> {
        Ok(Self {
            seated: SeatedClassifier::new(Arc::clone(&body_plan), &config)?,
            desk: DeskClassifier::new(Arc::clone(&body_plan), &config)?,
            hand: HandClassifier::new(hand_plan, &config)?,
            body_plan,
            config,
        })
    }

    /// Analyzer for 33-point body and 21-point hand landmarks with default thresholds.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in plans; the `Result` mirrors [`Self::new`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Arc::new(BodyPlan::blazepose()),
            Arc::new(BodyPlan::hand()),
            AnalysisConfig::default(),
        )
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Plan of the body landmarks this analyzer expects.
    #[must_use]
    pub fn body_plan(&self) -> &BodyPlan {
        &self.body_plan
    }

    /// Plan of the hand landmarks this analyzer expects.
    #[must_use]
    pub fn hand_plan(&self) -> &BodyPlan {
        self.hand.plan()
    }

    /// Body classifier of a category. `None` for hand position.
    #[must_use]
    pub fn classifier(&self, category: Category) -> Option<&dyn PostureClassifier> {
        match category {
            Category::SeatedPosture => Some(&self.seated),
            Category::DeskPosition => Some(&self.desk),
            Category::HandPosition => None,
        }
    }

    /// Every item and label the body classifiers can produce with this configuration.
    #[must_use]
    pub fn outcomes(&self) -> Vec<AnalysisItem> {
        Category::ALL
            .into_iter()
            .filter_map(|category| self.classifier(category))
            .flat_map(|classifier| classifier.outcomes())
            .collect()
    }

    /// Classify seated posture.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if `set` comes from another body plan.
    pub fn analyze_seated(&self, set: &LandmarkSet) -> Result<AnalysisResult> {
        self.seated.classify(set)
    }

    /// Classify desk posture.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if `set` comes from another body plan.
    pub fn analyze_desk(&self, set: &LandmarkSet) -> Result<AnalysisResult> {
        self.desk.classify(set)
    }

    /// Classify every detected hand.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if a set comes from another hand plan.
    pub fn analyze_hands(&self, hands: &[LandmarkSet]) -> Result<HandAnalysis> {
        self.hand.classify(hands)
    }

    /// Classify a body category. A missing detection yields an `Unusable` result.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] for [`Category::HandPosition`] or a set from
    /// another body plan.
    pub fn analyze_body(
        &self,
        category: Category,
        set: Option<&LandmarkSet>,
    ) -> Result<AnalysisResult> {
        let classifier = self.classifier(category).ok_or_else(|| {
            AssessmentError::ConfigError(format!("{category} is not analysed from body landmarks"))
        })?;
        match set {
            Some(set) => classifier.classify(set),
            None => {
                crate::warn!("No person detected for {category} analysis");
                Ok(AnalysisResult::unusable(category, None))
            }
        }
    }

    /// Analyse the landmarks of one frame for `category`.
    ///
    /// Body categories read `body`; hand position reads `hands`.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if the landmarks come from another plan.
    pub fn analyze(
        &self,
        category: Category,
        body: Option<&LandmarkSet>,
        hands: &[LandmarkSet],
    ) -> Result<Assessment> {
        if category.uses_hand_landmarks() {
            Ok(Assessment::Hands(self.analyze_hands(hands)?))
        } else {
            Ok(Assessment::Body(self.analyze_body(category, body)?))
        }
    }

    /// Run `detector` on an encoded image and classify the result.
    ///
    /// # Errors
    ///
    /// Propagates detector errors, and fails as [`Self::analyze`] does.
    pub fn analyze_image<D: LandmarkDetector + ?Sized>(
        &self,
        detector: &D,
        category: Category,
        image: &[u8],
    ) -> Result<Assessment> {
        if category.uses_hand_landmarks() {
            let hands = detector.detect_hands(image)?;
            self.analyze(category, None, &hands)
        } else {
            let body = detector.detect_pose(image)?;
            self.analyze(category, body.as_ref(), &[])
        }
    }

    /// Aggregate body results into a risk report.
    #[must_use]
    pub fn assess(&self, kb: &KnowledgeBase, results: &[AnalysisResult]) -> RiskReport {
        RiskAggregator::new(kb).aggregate(results)
    }
}
