//! CLI entry point for grouping the regions of a scene links document.
//!
//! Parses arguments with clap, runs the grouping engine, renders the bodies
//! to stdout and maps failures to a non-zero exit code. Logging goes to
//! stderr and is initialised before anything else runs.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use guzman_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse arguments, run the command and write the rendered bodies.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render bodies")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, invariant_code) = err
            .downcast_ref::<CliError>()
            .and_then(CliError::grouping_error)
            .map_or((None, None), |core| {
                (Some(core.code()), core.invariant_code())
            });

        error!(
            error = %err,
            code = code.map(|code| field::display(code.as_str())),
            invariant_code = invariant_code.map(|code| field::display(code.as_str())),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[allow(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
