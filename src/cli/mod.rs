// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running posture analysis.
//!
//! This module contains the command-line interface logic, including argument parsing
//! and the `analyze` and `knowledge` command implementations.

// Modules
/// Analyze command.
pub mod analyze;

/// CLI arguments.
pub mod args;

/// Knowledge command.
pub mod knowledge;
