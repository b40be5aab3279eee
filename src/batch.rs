// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Batch processing module.
//!
//! Frames are independent, so [`analyze_frames`] maps them over the rayon thread pool when
//! the `parallel` feature is enabled and sequentially otherwise. Output order always
//! matches input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::analyzer::{Assessment, PostureAnalyzer};
use crate::category::Category;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::landmarks::LandmarkSet;
use crate::report::RiskReport;

/// Landmarks detected in one image.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Name used in reports, usually the image file name.
    pub name: String,
    /// Body landmarks, `None` when no person was detected.
    pub body: Option<LandmarkSet>,
    /// Hand landmarks in detector order.
    pub hands: Vec<LandmarkSet>,
}

impl Frame {
    /// A frame with body landmarks only.
    #[must_use]
    pub fn body(name: impl Into<String>, body: LandmarkSet) -> Self {
        Self {
            name: name.into(),
            body: Some(body),
            hands: Vec::new(),
        }
    }

    /// A frame with hand landmarks only.
    #[must_use]
    pub fn hands(name: impl Into<String>, hands: Vec<LandmarkSet>) -> Self {
        Self {
            name: name.into(),
            body: None,
            hands,
        }
    }
}

/// Analysis and risk report of one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub name: String,
    pub assessment: Assessment,
    /// Risk report for body categories. `None` for hand analysis, which has no
    /// knowledge base mapping.
    pub report: Option<RiskReport>,
}

/// Analyse every frame for `category` and aggregate each into its own report.
///
/// # Errors
///
/// Returns the first error in frame order, such as landmarks from a plan the analyzer was not
/// built for.
pub fn analyze_frames(
    analyzer: &PostureAnalyzer,
    kb: &KnowledgeBase,
    category: Category,
    frames: &[Frame],
) -> Result<Vec<FrameReport>> {
    let run = |frame: &Frame| -> Result<FrameReport> {
        let assessment = analyzer.analyze(category, frame.body.as_ref(), &frame.hands)?;
        let report = assessment
            .body()
            .map(|result| analyzer.assess(kb, std::slice::from_ref(result)));
        Ok(FrameReport {
            name: frame.name.clone(),
            assessment,
            report,
        })
    };

    #[cfg(feature = "parallel")]
    let reports = frames.par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let reports = frames.iter().map(run).collect();
    reports
}
