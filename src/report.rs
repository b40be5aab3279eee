// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Risk aggregation.
//!
//! The [`RiskAggregator`] resolves classified items against a [`KnowledgeBase`] and groups
//! the matching scenarios by risk level and condition list. Items without a scenario are
//! skipped and recorded; they never abort the report.

use std::fmt::Write as _;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::category::Category;
use crate::knowledge::{KnowledgeBase, RiskLevel, ScenarioEntry};
use crate::results::{AnalysisItem, AnalysisResult, ItemId};

/// One resolved item inside a condition group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub category: Category,
    pub item_id: ItemId,
    pub entry: ScenarioEntry,
}

/// Entries sharing the same condition list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionGroup {
    /// Conditions joined with `", "`, or `"None"`.
    pub conditions: String,
    pub entries: Vec<ReportEntry>,
}

/// Condition groups at one risk level, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskGroup {
    pub risk: RiskLevel,
    pub groups: Vec<ConditionGroup>,
}

impl RiskGroup {
    const fn new(risk: RiskLevel) -> Self {
        Self {
            risk,
            groups: Vec::new(),
        }
    }

    fn push(&mut self, conditions: String, entry: ReportEntry) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.conditions == conditions) {
            group.entries.push(entry);
        } else {
            self.groups.push(ConditionGroup {
                conditions,
                entries: vec![entry],
            });
        }
    }

    /// Number of entries across all condition groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Check if the level has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Advice attached to a resolved item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub item_id: ItemId,
    pub text: String,
}

/// Aggregated assessment.
///
/// Every risk level is computed; serialization and [`RiskReport::render`] only include
/// the reported levels (High and Medium).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskReport {
    risks: [RiskGroup; 3],
    /// Recommendations of every resolved item in processing order, not deduplicated.
    pub recommendations: Vec<Recommendation>,
    /// Items without a knowledge base scenario.
    pub skipped: Vec<AnalysisItem>,
}

impl Default for RiskReport {
    fn default() -> Self {
        Self {
            risks: RiskLevel::DESCENDING.map(RiskGroup::new),
            recommendations: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl RiskReport {
    /// All entries at a risk level, including the unreported Low level.
    #[must_use]
    pub fn group(&self, risk: RiskLevel) -> &RiskGroup {
        match risk {
            RiskLevel::High => &self.risks[0],
            RiskLevel::Medium => &self.risks[1],
            RiskLevel::Low => &self.risks[2],
        }
    }

    fn group_mut(&mut self, risk: RiskLevel) -> &mut RiskGroup {
        match risk {
            RiskLevel::High => &mut self.risks[0],
            RiskLevel::Medium => &mut self.risks[1],
            RiskLevel::Low => &mut self.risks[2],
        }
    }

    /// Non-empty High and Medium groups, most severe first.
    pub fn reported(&self) -> impl Iterator<Item = &RiskGroup> {
        self.risks
            .iter()
            .filter(|g| g.risk.is_reported() && !g.is_empty())
    }

    /// Check if nothing at High or Medium risk was found.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.reported().next().is_none()
    }

    /// Render the reported groups and the recommendations as text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_clear() {
            out.push_str("No high or medium health risks found.\n");
        }
        for risk in self.reported() {
            let _ = writeln!(out, "{} health risk", risk.risk);
            for group in &risk.groups {
                let _ = writeln!(out, "  {}", group.conditions);
                for e in &group.entries {
                    let parts = e.entry.affected_parts.join(", ");
                    let _ = writeln!(
                        out,
                        "    - {} #{} [{parts}]: {}",
                        e.category.title(),
                        e.item_id,
                        e.entry.current
                    );
                }
            }
        }
        if !self.recommendations.is_empty() {
            out.push_str("Recommendations\n");
            for r in &self.recommendations {
                let _ = writeln!(out, "  - {}", r.text);
            }
        }
        out
    }
}

impl Serialize for RiskReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let risks: Vec<&RiskGroup> = self.reported().collect();
        let mut state = serializer.serialize_struct("RiskReport", 3)?;
        state.serialize_field("risks", &risks)?;
        state.serialize_field("recommendations", &self.recommendations)?;
        state.serialize_field("skipped", &self.skipped)?;
        state.end()
    }
}

/// Merges classified items with the knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct RiskAggregator<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> RiskAggregator<'a> {
    #[must_use]
    pub const fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Aggregate the items of every result.
    ///
    /// Categories are processed in [`Category::ALL`] order regardless of the order of
    /// `results`; within a category, results and items keep their order.
    #[must_use]
    pub fn aggregate(&self, results: &[AnalysisResult]) -> RiskReport {
        let mut report = RiskReport::default();
        for category in Category::ALL {
            for item in results
                .iter()
                .flat_map(|r| r.items.iter())
                .filter(|item| item.category == category)
            {
                self.add(&mut report, item);
            }
        }
        report
    }

    /// Resolve one item into `report`.
    pub fn add(&self, report: &mut RiskReport, item: &AnalysisItem) {
        let Some(entry) = self.kb.lookup(item) else {
            crate::warn!(
                "No knowledge base scenario for {} item {} ({}), skipping",
                item.category,
                item.item_id,
                item.label
            );
            report.skipped.push(*item);
            return;
        };

        if !entry.recommendation.is_empty() {
            report.recommendations.push(Recommendation {
                category: item.category,
                item_id: item.item_id,
                text: entry.recommendation.clone(),
            });
        }
        report.group_mut(entry.risk).push(
            entry.condition_key(),
            ReportEntry {
                category: item.category,
                item_id: item.item_id,
                entry: entry.clone(),
            },
        );
    }
}
