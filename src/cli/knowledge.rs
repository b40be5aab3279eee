// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use crate::cli::args::KnowledgeArgs;
use crate::knowledge::RiskLevel;
use crate::classify;
use crate::{AnalysisConfig, Category, KnowledgeBase};
use crate::{error, info, success, warn};

/// Run the knowledge command.
pub fn run_knowledge(args: &KnowledgeArgs) {
    let loaded;
    let kb = match &args.knowledge_base {
        Some(path) => match KnowledgeBase::load(path) {
            Ok(kb) => {
                loaded = kb;
                &loaded
            }
            Err(e) => {
                error!("Error loading knowledge base: {e}");
                process::exit(1);
            }
        },
        None => match KnowledgeBase::builtin() {
            Ok(kb) => kb,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        },
    };

    let source = args
        .knowledge_base
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
    info!("Knowledge base: {source} ({} scenarios)", kb.len());
    for category in Category::ALL {
        let ids: Vec<String> = kb.items(category).iter().map(ToString::to_string).collect();
        info!("  {:<16} items [{}]", category.as_str(), ids.join(", "));
    }
    let counts = kb.risk_counts();
    for risk in RiskLevel::DESCENDING {
        info!("  {:<16} {}", risk.as_str(), counts.get(&risk).copied().unwrap_or(0));
    }

    let config = match &args.config {
        Some(path) => match AnalysisConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Error loading config: {e}");
                process::exit(1);
            }
        },
        None => AnalysisConfig::default(),
    };
    let missing = kb.missing_from(&classify::outcomes(&config));
    if missing.is_empty() {
        success!("Every classifier outcome has a scenario");
        return;
    }
    for item in &missing {
        warn!(
            "No scenario for {} item {} ({})",
            item.category, item.item_id, item.label
        );
    }
    if args.strict {
        error!("{} classifier outcomes are unmapped", missing.len());
        process::exit(1);
    }
}
