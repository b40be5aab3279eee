// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::category::Category;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Analyze Options:
    --domain, -d <DOMAIN>         Category to analyse (seated, desk, hand)
    --input, -i <INPUT>           Landmark file (JSON)
    --plan <PLAN>                 Body plan of the landmarks (blazepose, coco) [default: from file or blazepose]
    --config <CONFIG>             Threshold overrides (JSON)
    --knowledge-base <FILE>       Knowledge base replacing the built-in one (JSON)
    --report                      Aggregate body findings into a risk report
    --json                        Print JSON instead of text
    --verbose <BOOL>              Show verbose output [default: true]

Examples:
    posture-assessment analyze --domain seated --input frames.json --report
    posture-assessment analyze -d desk -i frames.json --plan coco --json
    posture-assessment analyze -d hand -i hands.json --verbose false
    posture-assessment knowledge --strict"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify landmark frames and optionally build risk reports
    Analyze(AnalyzeArgs),
    /// Summarise a knowledge base and list unmapped outcomes
    Knowledge(KnowledgeArgs),
}

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Category to analyse (seated, desk, hand)
    #[arg(short, long)]
    pub domain: Category,

    /// Landmark file (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Body plan of the landmarks, overriding the file
    #[arg(long)]
    pub plan: Option<String>,

    /// Threshold overrides (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Knowledge base replacing the built-in one (JSON)
    #[arg(long)]
    pub knowledge_base: Option<PathBuf>,

    /// Aggregate body findings into a risk report
    #[arg(long, default_value_t = false)]
    pub report: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the knowledge command.
#[derive(Args, Debug)]
pub struct KnowledgeArgs {
    /// Knowledge base to inspect instead of the built-in one (JSON)
    #[arg(long)]
    pub knowledge_base: Option<PathBuf>,

    /// Threshold overrides deciding which outcomes are reachable (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit with an error if any classifier outcome is unmapped
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_args_defaults() {
        let args = Cli::parse_from([
            "app",
            "analyze",
            "--domain",
            "seated",
            "--input",
            "frames.json",
        ]);
        match args.command {
            Commands::Analyze(analyze_args) => {
                assert_eq!(analyze_args.domain, Category::SeatedPosture);
                assert_eq!(analyze_args.input, PathBuf::from("frames.json"));
                assert!(analyze_args.plan.is_none());
                assert!(!analyze_args.report);
                assert!(!analyze_args.json);
                assert!(analyze_args.verbose);
            }
            Commands::Knowledge(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_args_custom() {
        let args = Cli::parse_from([
            "app",
            "analyze",
            "-d",
            "desk",
            "-i",
            "in.json",
            "--plan",
            "coco",
            "--report",
            "--json",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Analyze(analyze_args) => {
                assert_eq!(analyze_args.domain, Category::DeskPosition);
                assert_eq!(analyze_args.plan.as_deref(), Some("coco"));
                assert!(analyze_args.report);
                assert!(analyze_args.json);
                assert!(!analyze_args.verbose);
            }
            Commands::Knowledge(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_unknown_domain_is_rejected() {
        let result = Cli::try_parse_from(["app", "analyze", "-d", "standing", "-i", "x.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_knowledge_args() {
        let args = Cli::parse_from(["app", "knowledge", "--strict"]);
        match args.command {
            Commands::Knowledge(knowledge_args) => {
                assert!(knowledge_args.strict);
                assert!(knowledge_args.knowledge_base.is_none());
                assert!(knowledge_args.config.is_none());
            }
            Commands::Analyze(_) => panic!("expected knowledge"),
        }
    }
}
