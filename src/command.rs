//! Running external tools.

use std::{process::Output, sync::LazyLock};

use regex::Regex;
use tokio::process::Command;

use crate::{error::ExtractError, prelude::*};

/// A default error regex for checking command output.
static ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error").expect("failed to compile regex"));

/// Poppler prints this while repairing slightly broken files, and then succeeds.
static DOWNGRADE_TO_WARNING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)error: xref num").expect("failed to compile regex")
});

/// Does this line of Poppler output contain an error?
pub fn is_error_line(line: &str) -> bool {
    ERROR_REGEX.is_match(line) && !DOWNGRADE_TO_WARNING_REGEX.is_match(line)
}

/// Run `cmd` to completion and capture its output.
///
/// If the program can't be started at all, we report `engine` as unavailable.
/// Checking the exit status is left to the caller, because what a failure
/// means depends on the tool.
#[instrument(level = "trace", skip_all, fields(engine = %engine, program = %program.display()))]
pub async fn run_command(
    engine: &str,
    program: &Path,
    cmd: &mut Command,
) -> Result<Output, ExtractError> {
    cmd.kill_on_drop(true)
        .output()
        .await
        .map_err(|err| ExtractError::cannot_spawn(engine, program, &err))
}

/// Report any command failures, and include any error output.
///
/// Standard output is logged at `debug`, and standard error at `warn` if it's
/// not empty. If `is_error` is supplied, any matching line on standard error
/// counts as a failure even if the exit status was zero.
pub fn check_for_command_failure(
    command_name: &str,
    output: &Output,
    is_error: Option<&dyn Fn(&str) -> bool>,
) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    debug!(
        command_name = command_name,
        output = %stdout,
        "Standard output from command"
    );
    if !stderr.trim().is_empty() {
        warn!(
            command_name = command_name,
            output = %stderr,
            "Standard error from command",
        );
    }

    if output.status.success() {
        if let Some(is_error) = is_error
            && stderr.lines().any(is_error)
        {
            return Err(anyhow!(
                "{} printed error output:\n{}",
                command_name,
                stderr.trim(),
            ));
        }
        Ok(())
    } else if let Some(exit_code) = output.status.code() {
        Err(anyhow!(
            "{} failed with exit code {} and error output:\n{}",
            command_name,
            exit_code,
            stderr.trim(),
        ))
    } else {
        Err(anyhow!(
            "{} failed with error output:\n{}",
            command_name,
            stderr.trim(),
        ))
    }
}
