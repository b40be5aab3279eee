// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Knowledge base of risk scenarios.
//!
//! Every classified item resolves to a [`ScenarioEntry`] keyed by category, item id and
//! label. The built-in table is embedded at compile time and parsed once; alternative
//! tables can be loaded from JSON files with the same layout:
//!
//! ```json
//! {"categories": [{"category": "seated_posture", "items": [
//!     {"id": 1, "scenarios": {"positive": {"risk": "High", "conditions": ["Lower back pain"],
//!      "affected_parts": ["Lower back"], "current": "...", "recommendation": "..."}}}
//! ]}]}
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classify;
use crate::config::AnalysisConfig;
use crate::error::{AssessmentError, Result};
use crate::results::{AnalysisItem, ItemId};
use crate::rules::Label;

const BUILTIN_JSON: &str = include_str!("../assets/knowledge_base.json");

static BUILTIN: OnceLock<std::result::Result<KnowledgeBase, String>> = OnceLock::new();

/// Health risk of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Levels from most to least severe.
    pub const DESCENDING: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Returns whether scenarios at this level appear in rendered reports.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Risk, affected body parts, conditions and advice for one classified outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEntry {
    pub risk: RiskLevel,
    #[serde(default)]
    pub affected_parts: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Description of the current posture.
    #[serde(default)]
    pub current: String,
    /// Advice, empty when nothing needs to change.
    #[serde(default)]
    pub recommendation: String,
}

impl ScenarioEntry {
    /// Conditions joined with `", "`, or `"None"` when there are none.
    #[must_use]
    pub fn condition_key(&self) -> String {
        let conditions: Vec<&str> = self
            .conditions
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if conditions.is_empty() {
            "None".to_string()
        } else {
            conditions.join(", ")
        }
    }
}

#[derive(Deserialize)]
struct KnowledgeBaseFile {
    categories: Vec<CategoryFile>,
}

#[derive(Deserialize)]
struct CategoryFile {
    category: Category,
    #[serde(default)]
    items: Vec<ItemFile>,
}

#[derive(Deserialize)]
struct ItemFile {
    id: ItemId,
    #[serde(default)]
    scenarios: BTreeMap<Label, ScenarioEntry>,
}

/// Immutable scenario table keyed by `(category, item id, label)`.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<(Category, ItemId, Label), ScenarioEntry>,
    items: BTreeMap<Category, Vec<ItemId>>,
}

impl KnowledgeBase {
    /// The knowledge base shipped with the crate, parsed on first use.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::KnowledgeBaseError`] if the embedded table is malformed.
    pub fn builtin() -> Result<&'static Self> {
        BUILTIN
            .get_or_init(|| Self::from_json_str(BUILTIN_JSON).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| AssessmentError::KnowledgeBaseError(e.clone()))
    }

    /// Parse a knowledge base from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a category or item id appears twice.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: KnowledgeBaseFile = serde_json::from_str(json)?;
        let mut kb = Self::default();
        for category in file.categories {
            if kb.items.contains_key(&category.category) {
                return Err(AssessmentError::KnowledgeBaseError(format!(
                    "category '{}' listed twice",
                    category.category
                )));
            }
            let mut ids = Vec::with_capacity(category.items.len());
            for item in category.items {
                if ids.contains(&item.id) {
                    return Err(AssessmentError::KnowledgeBaseError(format!(
                        "duplicate item id {} in category '{}'",
                        item.id, category.category
                    )));
                }
                ids.push(item.id);
                for (label, mut entry) in item.scenarios {
                    entry.conditions = entry
                        .conditions
                        .into_iter()
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .collect();
                    kb.entries.insert((category.category, item.id, label), entry);
                }
            }
            kb.items.insert(category.category, ids);
        }
        Ok(kb)
    }

    /// Load a knowledge base from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails [`Self::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Scenario for a classified outcome, if mapped.
    #[must_use]
    pub fn get(&self, category: Category, item_id: ItemId, label: Label) -> Option<&ScenarioEntry> {
        self.entries.get(&(category, item_id, label))
    }

    /// Scenario for an [`AnalysisItem`], if mapped.
    #[must_use]
    pub fn lookup(&self, item: &AnalysisItem) -> Option<&ScenarioEntry> {
        self.get(item.category, item.item_id, item.label)
    }

    /// Item ids of a category in file order. Empty for unknown categories.
    #[must_use]
    pub fn items(&self, category: Category) -> &[ItemId] {
        self.items.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Number of scenario entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of scenarios at each risk level.
    #[must_use]
    pub fn risk_counts(&self) -> BTreeMap<RiskLevel, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.risk).or_insert(0) += 1;
        }
        counts
    }

    /// Outcomes the default classifiers can emit that have no scenario, in category and item
    /// order.
    #[must_use]
    pub fn missing_scenarios(&self) -> Vec<AnalysisItem> {
        self.missing_from(&classify::outcomes(&AnalysisConfig::default()))
    }

    /// The entries of `outcomes` that have no scenario.
    #[must_use]
    pub fn missing_from(&self, outcomes: &[AnalysisItem]) -> Vec<AnalysisItem> {
        outcomes
            .iter()
            .filter(|item| self.lookup(item).is_none())
            .copied()
            .collect()
    }

    /// Fail unless every classifier outcome has a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`AssessmentError::KnowledgeBaseError`] listing the unmapped outcomes.
    pub fn require_complete(&self) -> Result<()> {
        let missing = self.missing_scenarios();
        if missing.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = missing
            .iter()
            .map(|m| format!("{}/{}/{}", m.category, m.item_id, m.label))
            .collect();
        Err(AssessmentError::KnowledgeBaseError(format!(
            "{} unmapped outcomes: {}",
            missing.len(),
            keys.join(", ")
        )))
    }
}
