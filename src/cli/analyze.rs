// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

use serde::Deserialize;

use crate::batch::{Frame, FrameReport, analyze_frames};
use crate::cli::args::AnalyzeArgs;
use crate::error::{AssessmentError, Result};
use crate::landmarks::{BodyPlan, LandmarkPoint, LandmarkSet};
use crate::{AnalysisConfig, KnowledgeBase, PostureAnalyzer, VERSION};
use crate::{error, section, verbose, warn};

/// Landmark input file.
#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default)]
    plan: Option<String>,
    frames: Vec<InputFrame>,
}

#[derive(Debug, Deserialize)]
struct InputFrame {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    landmarks: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    hands: Vec<Vec<[f32; 3]>>,
}

fn to_set(plan: &Arc<BodyPlan>, rows: Vec<[f32; 3]>) -> Result<LandmarkSet> {
    LandmarkSet::new(
        Arc::clone(plan),
        rows.into_iter().map(LandmarkPoint::from).collect(),
    )
}

/// Parse a landmark file into frames.
///
/// `plan_override` wins over the file's `plan` field; without either the 33-point plan is used.
///
/// # Errors
///
/// Returns an error if the file is unreadable, not valid JSON, names an unknown plan or holds
/// a landmark list of the wrong length.
pub fn load_frames<P: AsRef<Path>>(
    path: P,
    plan_override: Option<&str>,
) -> Result<(Arc<BodyPlan>, Vec<Frame>)> {
    let content = fs::read_to_string(path)?;
    let input: InputFile = serde_json::from_str(&content)?;
    let plan: BodyPlan = plan_override
        .or(input.plan.as_deref())
        .unwrap_or("blazepose")
        .parse()?;
    if plan.name() == "hand" {
        return Err(AssessmentError::ConfigError(
            "the body plan cannot be the hand plan; hand landmarks go in 'hands'".to_string(),
        ));
    }
    let plan = Arc::new(plan);
    let hand_plan = Arc::new(BodyPlan::hand());

    let frames = input
        .frames
        .into_iter()
        .enumerate()
        .map(|(i, frame)| -> Result<Frame> {
            let body = frame.landmarks.map(|rows| to_set(&plan, rows)).transpose()?;
            let hands = frame
                .hands
                .into_iter()
                .map(|rows| to_set(&hand_plan, rows))
                .collect::<Result<Vec<_>>>()?;
            Ok(Frame {
                name: frame.name.unwrap_or_else(|| format!("frame {i}")),
                body,
                hands,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((plan, frames))
}

/// Warn once about outcomes `analyzer` can produce that `kb` does not map. Returns the count.
fn warn_knowledge_gaps(kb: &KnowledgeBase, analyzer: &PostureAnalyzer) -> usize {
    let missing = kb.missing_from(&analyzer.outcomes());
    if !missing.is_empty() {
        let keys: Vec<String> = missing
            .iter()
            .map(|m| format!("{}/{}/{}", m.category, m.item_id, m.label))
            .collect();
        warn!(
            "Knowledge base has no scenario for {} classifier outcomes, skipping them: {}",
            missing.len(),
            keys.join(", ")
        );
    }
    missing.len()
}

fn execute(args: &AnalyzeArgs) -> Result<Vec<FrameReport>> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    let (plan, frames) = load_frames(&args.input, args.plan.as_deref())?;
    let analyzer = PostureAnalyzer::new(plan, Arc::new(BodyPlan::hand()), config)?;

    let loaded;
    let kb = match &args.knowledge_base {
        Some(path) => {
            loaded = KnowledgeBase::load(path)?;
            &loaded
        }
        None => KnowledgeBase::builtin()?,
    };
    warn_knowledge_gaps(kb, &analyzer);

    let mut reports = analyze_frames(&analyzer, kb, args.domain, &frames)?;
    if !args.report {
        for report in &mut reports {
            report.report = None;
        }
    }
    Ok(reports)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) {
    crate::logging::set_verbose(args.verbose);

    let reports = match execute(args) {
        Ok(reports) => reports,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize results: {e}");
                process::exit(1);
            }
        }
        return;
    }

    verbose!(
        "Posture assessment {VERSION} 🚀 {} on {}",
        args.domain.title(),
        args.input.display()
    );
    for frame in &reports {
        section!("{}", frame.name);
        print!("{}", frame.assessment.verbose());
        if let Some(report) = &frame.report {
            println!();
            print!("{}", report.render());
        }
    }
}
