//! Command implementations and argument parsing for the guzman CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use guzman_core::{GroupingBuilder, GroupingError, GroupingResult, RoundPolicy};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::scene::SceneDocument;

const DEFAULT_LINK_THRESHOLD: u32 = 2;
const FALLBACK_SOURCE_NAME: &str = "scene";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "guzman",
    about = "Group the regions of a line drawing into 3-D bodies."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Group the regions of a scene links document.
    Group(GroupCommand),
}

/// Options accepted by the `group` command.
#[derive(Debug, Args, Clone)]
pub struct GroupCommand {
    /// Path to a JSON scene links document.
    pub path: PathBuf,

    /// Links GLOBAL needs before it merges two clusters.
    #[arg(long = "link-threshold", default_value_t = DEFAULT_LINK_THRESHOLD)]
    pub link_threshold: u32,

    /// Skip the SINGLEBODY pass.
    #[arg(long = "skip-single-body")]
    pub skip_single_body: bool,

    /// Run GLOBAL and SINGLEBODY once instead of until nothing merges.
    #[arg(long = "single-round")]
    pub single_round: bool,

    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Label reported for the scene (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Rendering applied by [`render_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `BODY n: regions [..]` line per body.
    #[default]
    Text,
    /// A single JSON object holding the source label and the bodies.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// The scene document could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The scene document was not valid JSON of the expected shape.
    #[error("failed to parse scene document `{path}`: {source}")]
    Json {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// Configuration or grouping failed in the engine.
    #[error(transparent)]
    Core(#[from] GroupingError),
}

impl CliError {
    /// Returns the engine error when the failure came from the core.
    #[must_use]
    pub const fn grouping_error(&self) -> Option<&GroupingError> {
        match self {
            Self::Core(error) => Some(error),
            _ => None,
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Label reported for the scene.
    pub source: String,
    /// Format requested for rendering.
    pub format: OutputFormat,
    /// Bodies and merge log produced by the engine.
    pub result: GroupingResult,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the scene or grouping fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use guzman_cli::cli::{Cli, Command, GroupCommand, OutputFormat, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), r#"{"background": 99, "links": [[1, 2, "A"], [1, 2, "B"]]}"#)?;
/// let cli = Cli {
///     command: Command::Group(GroupCommand {
///         path: file.path().to_path_buf(),
///         link_threshold: 2,
///         skip_single_body: false,
///         single_round: false,
///         format: OutputFormat::Text,
///         name: Some("pair".into()),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.source, "pair");
/// assert_eq!(summary.result.body_count(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Group(group) => {
            Span::current().record("command", field::display("group"));
            run_group(group)
        }
    }
}

#[instrument(
    name = "cli.group",
    err,
    skip(command),
    fields(source = field::Empty, link_threshold = command.link_threshold),
)]
pub(super) fn run_group(command: GroupCommand) -> Result<ExecutionSummary, CliError> {
    let GroupCommand {
        path,
        link_threshold,
        skip_single_body,
        single_round,
        format,
        name,
    } = command;
    let round_policy = if single_round {
        RoundPolicy::Single
    } else {
        RoundPolicy::UntilStable
    };
    let grouper = GroupingBuilder::new()
        .with_link_threshold(link_threshold)
        .with_single_body_stage(!skip_single_body)
        .with_round_policy(round_policy)
        .build()?;

    let source = derive_source_name(&path, name.as_deref());
    Span::current().record("source", field::display(&source));

    let scene = SceneDocument::load(&path)?;
    let result = grouper.group(&scene.links(), scene.background())?;
    info!(
        source = source.as_str(),
        bodies = result.body_count(),
        "group command completed"
    );
    Ok(ExecutionSummary {
        source,
        format,
        result,
    })
}

pub(super) fn derive_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| FALLBACK_SOURCE_NAME.to_owned(), ToOwned::to_owned)
}

#[derive(Serialize)]
struct BodiesReport<'a> {
    source: &'a str,
    bodies: Vec<Vec<i64>>,
}

/// Renders `summary` to `writer` in the summary's output format.
///
/// Text output numbers bodies from one in ascending smallest-region order.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use guzman_cli::cli::{ExecutionSummary, OutputFormat, render_summary};
/// # use guzman_core::{RegionId, RegionLink, group_regions};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let links = [RegionLink::new(1, 2, "A"), RegionLink::new(1, 2, "B")];
/// let summary = ExecutionSummary {
///     source: "demo".into(),
///     format: OutputFormat::Text,
///     result: group_regions(&links, Some(RegionId::new(99)))?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "BODY 1: regions [1, 2]\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Text => {
            for (index, body) in summary.result.bodies().iter().enumerate() {
                writeln!(writer, "BODY {}: regions {body}", index + 1)?;
            }
        }
        OutputFormat::Json => {
            let report = BodiesReport {
                source: &summary.source,
                bodies: summary
                    .result
                    .bodies()
                    .iter()
                    .map(|body| body.regions().iter().map(|region| region.get()).collect())
                    .collect(),
            };
            serde_json::to_writer(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
