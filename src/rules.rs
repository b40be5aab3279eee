// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Declarative threshold rules.
//!
//! Each classifier item is a [`RuleTable`]: an ordered list of `(comparator, threshold, label)`
//! rules evaluated first-match-wins, with a fallback label when none match. Keeping thresholds
//! in tables separates tuning from the geometry that produces the measured value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tri-state classification label.
///
/// The encoding is fixed across every domain: `Positive` is the first branch of an item
/// (e.g. leaning forward, desk too high), `Neutral` the acceptable middle, `Negative` the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// All labels in encoding order.
    pub const ALL: [Self; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Returns the lowercase key used by the knowledge base.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(LabelParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid label string.
#[derive(Debug, Clone)]
pub struct LabelParseError(String);

impl fmt::Display for LabelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid label '{}', expected one of: positive, neutral, negative",
            self.0
        )
    }
}

impl std::error::Error for LabelParseError {}

/// How a measured value is compared against a rule threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparator {
    /// Apply the comparison `value <op> threshold`.
    #[must_use]
    pub fn holds(self, value: f32, threshold: f32) -> bool {
        match self {
            Self::Less => value < threshold,
            Self::LessOrEqual => value <= threshold,
            Self::Greater => value > threshold,
            Self::GreaterOrEqual => value >= threshold,
        }
    }
}

/// A single `(comparator, threshold, label)` rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub comparator: Comparator,
    pub threshold: f32,
    pub label: Label,
}

impl Rule {
    #[must_use]
    pub const fn new(comparator: Comparator, threshold: f32, label: Label) -> Self {
        Self {
            comparator,
            threshold,
            label,
        }
    }
}

/// Ordered rules with a fallback label.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    otherwise: Label,
}

impl RuleTable {
    /// Create a table from ordered rules and the label used when none match.
    #[must_use]
    pub const fn new(rules: Vec<Rule>, otherwise: Label) -> Self {
        Self { rules, otherwise }
    }

    /// The common three-band shape: `value < low` is positive, `value > high` is negative,
    /// anything in `[low, high]` is neutral.
    #[must_use]
    pub fn banded(low: f32, high: f32) -> Self {
        Self::new(
            vec![
                Rule::new(Comparator::Less, low, Label::Positive),
                Rule::new(Comparator::Greater, high, Label::Negative),
            ],
            Label::Neutral,
        )
    }

    /// Label for a measured value. `NaN` matches no rule and falls through.
    #[must_use]
    pub fn evaluate(&self, value: f32) -> Label {
        self.rules
            .iter()
            .find(|rule| rule.comparator.holds(value, rule.threshold))
            .map_or(self.otherwise, |rule| rule.label)
    }

    /// The rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every label some finite value can produce, in [`Label::ALL`] order.
    ///
    /// Evaluation is constant between consecutive thresholds, so probing each threshold,
    /// each midpoint and one value beyond either end covers every band.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        let mut cuts: Vec<f32> = self
            .rules
            .iter()
            .map(|r| r.threshold)
            .filter(|t| t.is_finite())
            .collect();
        cuts.sort_by(f32::total_cmp);
        cuts.dedup();

        let mut probes = cuts.clone();
        probes.extend(cuts.windows(2).map(|w| (w[0] + w[1]) / 2.0));
        match (cuts.first(), cuts.last()) {
            (Some(&low), Some(&high)) => probes.extend([low - 1.0, high + 1.0]),
            _ => probes.push(0.0),
        }

        let mut labels: Vec<Label> = probes.into_iter().map(|v| self.evaluate(v)).collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banded_boundaries_are_neutral() {
        let table = RuleTable::banded(85.0, 115.0);
        assert_eq!(table.evaluate(84.999), Label::Positive);
        assert_eq!(table.evaluate(85.0), Label::Neutral);
        assert_eq!(table.evaluate(100.0), Label::Neutral);
        assert_eq!(table.evaluate(115.0), Label::Neutral);
        assert_eq!(table.evaluate(115.001), Label::Negative);
    }

    #[test]
    fn test_first_match_wins() {
        let table = RuleTable::new(
            vec![
                Rule::new(Comparator::GreaterOrEqual, 0.5, Label::Negative),
                Rule::new(Comparator::GreaterOrEqual, 0.1, Label::Positive),
            ],
            Label::Neutral,
        );
        assert_eq!(table.evaluate(0.7), Label::Negative);
        assert_eq!(table.evaluate(0.2), Label::Positive);
        assert_eq!(table.evaluate(0.0), Label::Neutral);
    }

    #[test]
    fn test_nan_falls_through() {
        assert_eq!(RuleTable::banded(1.0, 2.0).evaluate(f32::NAN), Label::Neutral);
    }

    #[test]
    fn test_labels() {
        assert_eq!(RuleTable::banded(1.0, 2.0).labels(), Label::ALL.to_vec());
        assert_eq!(RuleTable::banded(1.0, 1.0).labels(), Label::ALL.to_vec());
    }

    #[test]
    fn test_labels_skip_unreachable_bands() {
        // inverted band: everything is below 120 or above 100
        assert_eq!(
            RuleTable::banded(120.0, 100.0).labels(),
            vec![Label::Positive, Label::Negative]
        );

        let shadowed = RuleTable::new(
            vec![
                Rule::new(Comparator::GreaterOrEqual, 0.1, Label::Positive),
                Rule::new(Comparator::GreaterOrEqual, 0.5, Label::Negative),
            ],
            Label::Neutral,
        );
        assert_eq!(shadowed.labels(), vec![Label::Positive, Label::Neutral]);

        assert_eq!(RuleTable::new(Vec::new(), Label::Neutral).labels(), vec![Label::Neutral]);
    }

    #[test]
    fn test_label_from_str() {
        assert_eq!("Positive".parse::<Label>().unwrap(), Label::Positive);
        assert_eq!(" NEGATIVE ".parse::<Label>().unwrap(), Label::Negative);
        assert!("maybe".parse::<Label>().is_err());
        assert_eq!(Label::Neutral.to_string(), "neutral");
    }
}
