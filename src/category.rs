// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Assessment categories.
//!
//! Each category corresponds to one domain classifier and one section of the knowledge base.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Assessment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Seated posture - trunk and leg angles from a side view.
    SeatedPosture,
    /// Hand position - wrist and finger posture while typing or mousing.
    HandPosition,
    /// Desk position - desk height, distance and screen height.
    DeskPosition,
}

impl Category {
    /// Categories in the order the risk aggregator walks them.
    pub const ALL: [Self; 3] = [Self::SeatedPosture, Self::HandPosition, Self::DeskPosition];

    /// Returns the key used in the knowledge base.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SeatedPosture => "seated_posture",
            Self::HandPosition => "hand_position",
            Self::DeskPosition => "desk_position",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::SeatedPosture => "Seated posture",
            Self::HandPosition => "Hand position",
            Self::DeskPosition => "Desk position",
        }
    }

    /// Returns whether this category's classifier works on full-body landmarks.
    #[must_use]
    pub const fn uses_body_landmarks(&self) -> bool {
        matches!(self, Self::SeatedPosture | Self::DeskPosition)
    }

    /// Returns whether this category's classifier works on hand landmarks.
    #[must_use]
    pub const fn uses_hand_landmarks(&self) -> bool {
        matches!(self, Self::HandPosition)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seated_posture" | "seated" | "sitting" | "body" => Ok(Self::SeatedPosture),
            "hand_position" | "hand" | "hands" => Ok(Self::HandPosition),
            "desk_position" | "desk" => Ok(Self::DeskPosition),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid category string.
#[derive(Debug, Clone)]
pub struct CategoryParseError(String);

impl fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid category '{}', expected one of: seated, desk, hand",
            self.0
        )
    }
}

impl std::error::Error for CategoryParseError {}
