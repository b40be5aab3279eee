// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::Parser;

use posture_assessment::cli::analyze::run_analyze;
use posture_assessment::cli::args::{Cli, Commands};
use posture_assessment::cli::knowledge::run_knowledge;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Knowledge(args) => run_knowledge(args),
    }
}
