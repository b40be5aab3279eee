// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Hand posture classifier.
//!
//! Runs four independent checks on each detected hand: hand bend, wrist flexion,
//! claw grip and finger extension. Results are reported directly and do not pass
//! through the knowledge base.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{AnalysisConfig, HandThresholds};
use crate::error::{AssessmentError, Result};
use crate::geometry::distance;
use crate::landmarks::{BodyPlan, Landmark, LandmarkSet};
use crate::results::{AnalysisStatus, HandAnalysis};

use super::point;

/// Joints of one non-thumb finger, knuckle to tip.
#[derive(Debug, Clone, Copy)]
struct Finger {
    mcp: Landmark,
    pip: Landmark,
    dip: Landmark,
    tip: Landmark,
}

const FINGERS: [Finger; 4] = [
    Finger {
        mcp: Landmark::IndexMcp,
        pip: Landmark::IndexPip,
        dip: Landmark::IndexDip,
        tip: Landmark::IndexTip,
    },
    Finger {
        mcp: Landmark::MiddleMcp,
        pip: Landmark::MiddlePip,
        dip: Landmark::MiddleDip,
        tip: Landmark::MiddleTip,
    },
    Finger {
        mcp: Landmark::RingMcp,
        pip: Landmark::RingPip,
        dip: Landmark::RingDip,
        tip: Landmark::RingTip,
    },
    Finger {
        mcp: Landmark::PinkyMcp,
        pip: Landmark::PinkyPip,
        dip: Landmark::PinkyDip,
        tip: Landmark::PinkyTip,
    },
];

/// Landmarks the hand classifier reads.
pub const REQUIRED: &[Landmark] = &[
    Landmark::Wrist,
    Landmark::IndexMcp,
    Landmark::IndexPip,
    Landmark::IndexDip,
    Landmark::IndexTip,
    Landmark::MiddleMcp,
    Landmark::MiddlePip,
    Landmark::MiddleDip,
    Landmark::MiddleTip,
    Landmark::RingMcp,
    Landmark::RingPip,
    Landmark::RingDip,
    Landmark::RingTip,
    Landmark::PinkyMcp,
    Landmark::PinkyPip,
    Landmark::PinkyDip,
    Landmark::PinkyTip,
];

/// Middle fingertip height relative to its knuckle and the wrist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandBend {
    BentInward,
    BentOutward,
    NotBent,
}

impl HandBend {
    #[must_use]
    pub const fn sentence(&self) -> &'static str {
        match self {
            Self::BentInward => "Hand is bent inwards.",
            Self::BentOutward => "Hand is bent outwards.",
            Self::NotBent => "Hand is not bent inwards or outwards.",
        }
    }
}

/// Index and pinky knuckle height relative to the wrist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WristFlexion {
    FlexedUp,
    FlexedDown,
    NotFlexed,
}

impl WristFlexion {
    #[must_use]
    pub const fn sentence(&self) -> &'static str {
        match self {
            Self::FlexedUp => "Wrist is flexed upwards.",
            Self::FlexedDown => "Wrist is flexed downwards.",
            Self::NotFlexed => "Wrist is not flexed upwards or downwards.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GripStyle {
    ClawDetected,
    NoClaw,
}

impl GripStyle {
    #[must_use]
    pub const fn sentence(&self) -> &'static str {
        match self {
            Self::ClawDetected => "Claw grip detected.",
            Self::NoClaw => "Claw grip not detected.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerExtension {
    FingersExtended,
    FingersNotExtended,
}

impl FingerExtension {
    #[must_use]
    pub const fn sentence(&self) -> &'static str {
        match self {
            Self::FingersExtended => "Fingers are extended.",
            Self::FingersNotExtended => "Fingers are not extended.",
        }
    }
}

/// The four findings for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandAssessment {
    pub bend: HandBend,
    pub flexion: WristFlexion,
    pub grip: GripStyle,
    pub extension: FingerExtension,
}

impl HandAssessment {
    /// Sentences in report order: bend, flexion, grip, extension.
    #[must_use]
    pub const fn sentences(&self) -> [&'static str; 4] {
        [
            self.bend.sentence(),
            self.flexion.sentence(),
            self.grip.sentence(),
            self.extension.sentence(),
        ]
    }
}

/// Hand posture classifier bound to one hand plan.
#[derive(Debug, Clone)]
pub struct HandClassifier {
    plan: Arc<BodyPlan>,
    thresholds: HandThresholds,
}

impl HandClassifier {
    /// Create a classifier for hand landmarks produced by `plan`.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if the plan lacks a finger joint or the wrist,
    /// or if `max_hands` is zero.
    pub fn new(plan: Arc<BodyPlan>, config: &AnalysisConfig) -> Result<Self> {
        plan.require(REQUIRED)?;
        if config.hand.max_hands == 0 {
            return Err(AssessmentError::ConfigError("max_hands must be at least 1".to_string()));
        }
        Ok(Self {
            plan,
            thresholds: config.hand.clone(),
        })
    }

    /// The plan this classifier reads.
    #[must_use]
    pub fn plan(&self) -> &BodyPlan {
        &self.plan
    }

    /// Classify every detected hand, up to the configured maximum.
    ///
    /// An empty slice yields an `Unusable` analysis. Extra hands are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if a set was produced by another plan.
    pub fn classify(&self, hands: &[LandmarkSet]) -> Result<HandAnalysis> {
        if hands.is_empty() {
            return Ok(HandAnalysis {
                status: AnalysisStatus::Unusable,
                hands: Vec::new(),
            });
        }
        let max = self.thresholds.max_hands;
        if hands.len() > max {
            crate::warn!("{} hands detected, analysing the first {max}", hands.len());
        }
        let hands = hands
            .iter()
            .take(max)
            .map(|set| self.classify_hand(set))
            .collect::<Result<Vec<_>>>()?;
        Ok(HandAnalysis {
            status: AnalysisStatus::Ok,
            hands,
        })
    }

    /// Classify one hand.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::ConfigError`] if the set was produced by another plan.
    pub fn classify_hand(&self, set: &LandmarkSet) -> Result<HandAssessment> {
        if set.plan() != self.plan.as_ref() {
            return Err(AssessmentError::ConfigError(format!(
                "hand classifier built for plan '{}' received landmarks from plan '{}'",
                self.plan.name(),
                set.plan().name()
            )));
        }

        let wrist = point(set, Landmark::Wrist)?;
        let middle_mcp = point(set, Landmark::MiddleMcp)?;
        let middle_tip = point(set, Landmark::MiddleTip)?;
        let bend = if middle_tip.y < middle_mcp.y && middle_tip.y < wrist.y {
            HandBend::BentInward
        } else if middle_tip.y > middle_mcp.y && middle_tip.y > wrist.y {
            HandBend::BentOutward
        } else {
            HandBend::NotBent
        };

        let index_mcp = point(set, Landmark::IndexMcp)?;
        let pinky_mcp = point(set, Landmark::PinkyMcp)?;
        let flexion = if index_mcp.y < wrist.y && pinky_mcp.y < wrist.y {
            WristFlexion::FlexedUp
        } else if index_mcp.y > wrist.y && pinky_mcp.y > wrist.y {
            WristFlexion::FlexedDown
        } else {
            WristFlexion::NotFlexed
        };

        let mut curled = 0;
        let mut extended = 0;
        for finger in FINGERS {
            let mcp = point(set, finger.mcp)?;
            let pip = point(set, finger.pip)?;
            let dip = point(set, finger.dip)?;
            let tip = point(set, finger.tip)?;
            if distance(&tip, &mcp) < self.thresholds.claw_distance {
                curled += 1;
            }
            if tip.y < dip.y && dip.y < pip.y {
                extended += 1;
            }
        }
        let grip = if curled >= self.thresholds.min_fingers {
            GripStyle::ClawDetected
        } else {
            GripStyle::NoClaw
        };
        let extension = if extended >= self.thresholds.min_fingers {
            FingerExtension::FingersExtended
        } else {
            FingerExtension::FingersNotExtended
        };

        Ok(HandAssessment {
            bend,
            flexion,
            grip,
            extension,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fixtures::plan_set;

    fn classifier() -> HandClassifier {
        HandClassifier::new(Arc::new(BodyPlan::hand()), &AnalysisConfig::default()).unwrap()
    }

    /// A hand with the wrist at `wrist_y` and every finger's joints at the given heights.
    fn hand(wrist_y: f32, mcp_y: f32, pip_y: f32, dip_y: f32, tip_y: f32) -> LandmarkSet {
        let mut overrides = vec![(Landmark::Wrist, 0.5, wrist_y)];
        for (finger, x) in FINGERS.iter().zip([0.35, 0.45, 0.55, 0.65]) {
            overrides.push((finger.mcp, x, mcp_y));
            overrides.push((finger.pip, x, pip_y));
            overrides.push((finger.dip, x, dip_y));
            overrides.push((finger.tip, x, tip_y));
        }
        plan_set(Arc::new(BodyPlan::hand()), &overrides)
    }

    #[test]
    fn test_open_hand_pointing_up() {
        let assessment = classifier().classify_hand(&hand(0.9, 0.6, 0.5, 0.45, 0.4)).unwrap();
        assert_eq!(
            assessment,
            HandAssessment {
                bend: HandBend::BentInward,
                flexion: WristFlexion::FlexedUp,
                grip: GripStyle::NoClaw,
                extension: FingerExtension::FingersExtended,
            }
        );
    }

    #[test]
    fn test_claw_grip() {
        // tips curled back down next to the knuckles
        let assessment = classifier().classify_hand(&hand(0.9, 0.6, 0.5, 0.55, 0.62)).unwrap();
        assert_eq!(assessment.grip, GripStyle::ClawDetected);
        assert_eq!(assessment.extension, FingerExtension::FingersNotExtended);
        assert_eq!(assessment.bend, HandBend::NotBent);
    }

    #[test]
    fn test_hand_hanging_down() {
        let assessment = classifier().classify_hand(&hand(0.1, 0.4, 0.5, 0.6, 0.7)).unwrap();
        assert_eq!(assessment.bend, HandBend::BentOutward);
        assert_eq!(assessment.flexion, WristFlexion::FlexedDown);
    }

    #[test]
    fn test_level_wrist_is_not_flexed() {
        let assessment = classifier().classify_hand(&hand(0.6, 0.6, 0.5, 0.45, 0.4)).unwrap();
        assert_eq!(assessment.flexion, WristFlexion::NotFlexed);
    }

    #[test]
    fn test_two_of_four_fingers_is_not_enough() {
        let mut overrides = Vec::new();
        for (i, finger) in FINGERS.iter().enumerate() {
            let tip_y = if i < 2 { 0.4 } else { 0.55 };
            overrides.push((finger.mcp, 0.4, 0.6));
            overrides.push((finger.pip, 0.4, 0.5));
            overrides.push((finger.dip, 0.4, 0.45));
            overrides.push((finger.tip, 0.4, tip_y));
        }
        let set = plan_set(Arc::new(BodyPlan::hand()), &overrides);
        let assessment = classifier().classify_hand(&set).unwrap();
        assert_eq!(assessment.extension, FingerExtension::FingersNotExtended);
    }

    #[test]
    fn test_no_hands_is_unusable() {
        let analysis = classifier().classify(&[]).unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Unusable);
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_extra_hands_are_dropped() {
        let open = hand(0.9, 0.6, 0.5, 0.45, 0.4);
        let analysis = classifier()
            .classify(&[open.clone(), open.clone(), open])
            .unwrap();
        assert_eq!(analysis.status, AnalysisStatus::Ok);
        assert_eq!(analysis.len(), 2);
    }

    #[test]
    fn test_sentences_in_report_order() {
        let assessment = classifier().classify_hand(&hand(0.9, 0.6, 0.5, 0.45, 0.4)).unwrap();
        assert_eq!(
            assessment.sentences(),
            [
                "Hand is bent inwards.",
                "Wrist is flexed upwards.",
                "Claw grip not detected.",
                "Fingers are extended.",
            ]
        );
    }

    #[test]
    fn test_body_plan_is_rejected() {
        assert!(
            HandClassifier::new(Arc::new(BodyPlan::coco()), &AnalysisConfig::default()).is_err()
        );
        let set = crate::classify::fixtures::coco_set(&[]);
        assert!(classifier().classify_hand(&set).is_err());
    }

    #[test]
    fn test_zero_max_hands_is_rejected() {
        let config = AnalysisConfig::default().with_hand(HandThresholds {
            max_hands: 0,
            ..HandThresholds::default()
        });
        let err = HandClassifier::new(Arc::new(BodyPlan::hand()), &config).unwrap_err();
        assert!(matches!(err, AssessmentError::ConfigError(_)));
    }
}
