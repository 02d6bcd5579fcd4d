//! Command-line interface for the region-grouping engine.
//!
//! The `group` command loads a scene links document, runs the GLOBAL and
//! SINGLEBODY passes and renders the resulting bodies as text or JSON.

mod commands;
mod scene;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GroupCommand, OutputFormat, render_summary, run_cli,
};
pub use scene::{LinkRecord, SceneDocument};

#[cfg(test)]
mod test_helpers;
