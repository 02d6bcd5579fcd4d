//! Small helpers shared across CLI tests.

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, Command, GroupCommand, OutputFormat, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_scene(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// `group` command over `path` with every flag at its default.
pub(super) fn group_command(path: PathBuf) -> GroupCommand {
    GroupCommand {
        path,
        link_threshold: 2,
        skip_single_body: false,
        single_round: false,
        format: OutputFormat::Text,
        name: None,
    }
}

pub(super) fn run_group_expecting_error(command: GroupCommand, panic_msg: &str) -> CliError {
    match run_cli(Cli {
        command: Command::Group(command),
    }) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
