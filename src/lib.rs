// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Posture Assessment Library
//!
//! Ergonomic posture classification and risk aggregation from body and hand landmarks.
//!
//! The library consumes normalized `(x, y, confidence)` landmarks produced by an external
//! pose or hand detector, classifies seated, desk and hand posture with threshold rules,
//! and merges the findings with a knowledge base of risk scenarios into a report grouped by
//! risk level and medical condition.
//!
//! ## Features
//!
//! - **Detector Agnostic** - Body plans map landmark names to indices for `BlazePose` (33),
//!   COCO/MoveNet (17), the 21-point hand model or any custom scheme
//! - **Declarative Rules** - Every threshold lives in a rule table built from [`AnalysisConfig`]
//! - **Confidence Gating** - Noisy detections are reported as unusable instead of misclassified
//! - **Risk Reports** - Findings grouped by risk level and condition, with recommendations
//! - **Parallel Batches** - Independent frames run on the rayon thread pool
//!
//! ## Quick Start (Library)
//!
//! ```rust
//! use std::sync::Arc;
//! use posture_assessment::{
//!     AnalysisConfig, BodyPlan, KnowledgeBase, LandmarkPoint, LandmarkSet, PostureAnalyzer,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let plan = Arc::new(BodyPlan::coco());
//!     let analyzer = PostureAnalyzer::new(
//!         Arc::clone(&plan),
//!         Arc::new(BodyPlan::hand()),
//!         AnalysisConfig::default(),
//!     )?;
//!
//!     // Landmarks from your pose detector, in the plan's order
//!     let points = vec![LandmarkPoint::new(0.5, 0.5, 0.9); plan.num_points()];
//!     let set = LandmarkSet::new(plan, points)?;
//!
//!     let result = analyzer.analyze_seated(&set)?;
//!     print!("{}", result.verbose());
//!
//!     let report = analyzer.assess(KnowledgeBase::builtin()?, &[result]);
//!     print!("{}", report.render());
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Classify seated posture and print a risk report
//! posture-assessment analyze --domain seated --input frames.json --report
//!
//! # Desk posture from 17-point landmarks, as JSON
//! posture-assessment analyze -d desk -i frames.json --plan coco --json
//!
//! # Check a custom knowledge base for unmapped outcomes
//! posture-assessment knowledge --knowledge-base kb.json --strict
//! ```
//!
//! **Analyze Options:**
//!
//! | Option | Short | Description | Default |
//! |--------|-------|-------------|---------|
//! | `--domain` | `-d` | Category: `seated`, `desk` or `hand` | required |
//! | `--input` | `-i` | Landmark file (JSON) | required |
//! | `--plan` | | Body plan of the landmarks | file or `blazepose` |
//! | `--config` | | Threshold overrides (JSON) | built-in |
//! | `--knowledge-base` | | Knowledge base (JSON) | built-in |
//! | `--report` | | Aggregate a risk report | `false` |
//! | `--json` | | JSON output | `false` |
//! | `--verbose` | | Verbose output | `true` |
//!
//! Landmark files look like:
//!
//! ```json
//! {"plan": "coco", "frames": [
//!     {"name": "side.jpg", "landmarks": [[0.51, 0.12, 0.98], ...]},
//!     {"name": "hands.jpg", "hands": [[[0.43, 0.71, 1.0], ...]]}
//! ]}
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`landmarks`] | Points, landmark sets and body plans |
//! | [`geometry`] | Angles and distances between points |
//! | [`gate`] | Confidence gate |
//! | [`facing`] | Facing side and limb selection |
//! | [`rules`] | Labels and rule tables |
//! | [`classify`] | Seated, desk and hand classifiers |
//! | [`knowledge`] | Risk scenario knowledge base |
//! | [`report`] | Risk aggregation |
//! | [`analyzer`] | Analysis facade and detector seam |
//! | [`batch`] | Multi-frame analysis |

// Modules
pub mod analyzer;
pub mod batch;
pub mod category;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod facing;
pub mod gate;
pub mod geometry;
pub mod knowledge;
pub mod landmarks;
pub mod logging;
pub mod report;
pub mod results;
pub mod rules;

// Re-export main types for convenience
pub use analyzer::{Assessment, LandmarkDetector, PostureAnalyzer};
pub use category::Category;
pub use classify::{
    DeskClassifier, HandClassifier, Observation, PostureClassifier, SeatedClassifier,
};
pub use config::AnalysisConfig;
pub use error::{AssessmentError, Result};
pub use facing::FacingSide;
pub use knowledge::{KnowledgeBase, RiskLevel, ScenarioEntry};
pub use landmarks::{BodyPlan, Landmark, LandmarkPoint, LandmarkSet};
pub use report::{RiskAggregator, RiskReport};
pub use results::{AnalysisItem, AnalysisResult, AnalysisStatus, HandAnalysis, ItemId};
pub use rules::Label;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "posture-assessment");
    }
}
