// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Result types produced by the domain classifiers.
//!
//! [`AnalysisResult`] is the per-image output of the seated and desk classifiers and feeds the
//! risk aggregator. [`HandAnalysis`] is the hand classifier's output and is reported as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classify::{self, HandAssessment, Observation};
use crate::facing::FacingSide;
use crate::gate::GateReport;
use crate::rules::Label;

/// Message returned when a landmark set fails the confidence gate.
pub const RETAKE_PHOTO: &str = "Improper picture. Please provide a clearer image.";

/// Message returned when no hands were detected.
pub const NO_HANDS: &str = "No hands detected. Please take another picture.";

/// Knowledge base item number within a category (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One classified item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub category: Category,
    pub item_id: ItemId,
    pub label: Label,
}

impl AnalysisItem {
    #[must_use]
    pub const fn new(category: Category, item_id: u32, label: Label) -> Self {
        Self {
            category,
            item_id: ItemId(item_id),
            label,
        }
    }

    /// Human-readable sentence for this finding, if the item is known.
    #[must_use]
    pub fn describe(&self) -> Option<&'static str> {
        classify::describe(self.category, self.item_id, self.label)
    }
}

/// Whether classification ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// Landmarks passed the gate and were classified.
    Ok,
    /// Landmarks were missing or too noisy; the user should retake the photo.
    Unusable,
}

/// Output of a body classifier for one image.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Category of the classifier that produced this result.
    pub category: Category,
    /// Whether classification ran.
    pub status: AnalysisStatus,
    /// Resolved facing side. `None` when classification did not run.
    pub facing: Option<FacingSide>,
    /// Classified items in knowledge base order. Facing-dependent items are absent when
    /// the facing side is ambiguous.
    pub items: Vec<AnalysisItem>,
    /// Findings outside the knowledge base.
    pub observations: Vec<Observation>,
    /// Confidence gate outcome. `None` when there were no landmarks to check.
    pub gate: Option<GateReport>,
}

impl AnalysisResult {
    /// A result for landmarks that could not be classified.
    #[must_use]
    pub const fn unusable(category: Category, gate: Option<GateReport>) -> Self {
        Self {
            category,
            status: AnalysisStatus::Unusable,
            facing: None,
            items: Vec::new(),
            observations: Vec::new(),
            gate,
        }
    }

    /// Returns whether classification ran.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.status == AnalysisStatus::Ok
    }

    /// Number of classified items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no items were classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Label of an item, if it was classified.
    #[must_use]
    pub fn label(&self, item_id: u32) -> Option<Label> {
        self.items
            .iter()
            .find(|item| item.item_id == ItemId(item_id))
            .map(|item| item.label)
    }

    /// Render the findings one sentence per line.
    #[must_use]
    pub fn verbose(&self) -> String {
        if !self.is_usable() {
            return format!("{RETAKE_PHOTO}\n");
        }
        let mut out = String::new();
        for item in &self.items {
            if let Some(sentence) = item.describe() {
                out.push_str(sentence);
                out.push('\n');
            }
        }
        for observation in &self.observations {
            out.push_str(observation.description());
            out.push('\n');
        }
        out
    }
}

/// Output of the hand classifier for one image.
#[derive(Debug, Clone, Serialize)]
pub struct HandAnalysis {
    /// `Unusable` when no hands were detected.
    pub status: AnalysisStatus,
    /// One assessment per detected hand, in detector order.
    pub hands: Vec<HandAssessment>,
}

impl HandAnalysis {
    /// Number of analysed hands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    /// Check if no hands were analysed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// Render the findings, four indented lines per hand.
    #[must_use]
    pub fn verbose(&self) -> String {
        if self.hands.is_empty() {
            return format!("{NO_HANDS}\n");
        }
        let mut out = String::new();
        for hand in &self.hands {
            for sentence in hand.sentences() {
                out.push_str("  ");
                out.push_str(sentence);
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_result_renders_retake_message() {
        let result = AnalysisResult::unusable(Category::SeatedPosture, None);
        assert!(!result.is_usable());
        assert!(result.is_empty());
        assert_eq!(result.verbose(), format!("{RETAKE_PHOTO}\n"));
    }

    #[test]
    fn test_verbose_lists_items_then_observations() {
        let result = AnalysisResult {
            category: Category::SeatedPosture,
            status: AnalysisStatus::Ok,
            facing: Some(FacingSide::Left),
            items: vec![
                AnalysisItem::new(Category::SeatedPosture, 1, Label::Positive),
                AnalysisItem::new(Category::SeatedPosture, 2, Label::Neutral),
            ],
            observations: vec![Observation::FeetGrounded],
            gate: None,
        };
        assert_eq!(result.label(1), Some(Label::Positive));
        assert_eq!(result.label(3), None);
        assert_eq!(
            result.verbose(),
            "Leaning forward.\nHip in line with legs.\nBoth feet are placed on the ground.\n"
        );
    }

    #[test]
    fn test_item_serializes_with_lowercase_label() {
        let item = AnalysisItem::new(Category::DeskPosition, 3, Label::Negative);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"category":"desk_position","item_id":3,"label":"negative"}"#
        );
    }

    #[test]
    fn test_empty_hand_analysis() {
        let analysis = HandAnalysis {
            status: AnalysisStatus::Unusable,
            hands: Vec::new(),
        };
        assert!(analysis.is_empty());
        assert_eq!(analysis.verbose(), format!("{NO_HANDS}\n"));
    }
}
