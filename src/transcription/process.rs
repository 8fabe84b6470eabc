use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;
use log::{debug, error};
use tokio::process::Command;

use crate::errors::TranscriptionError;

// @module: External process execution

// Banner and stream listing lines that never explain a failure
const NOISE_PREFIXES: [&str; 19] = [
    "ffmpeg version",
    "built with",
    "configuration:",
    "lib",
    "Input #",
    "Metadata:",
    "Duration:",
    "Chapter",
    "Stream #",
    "title",
    "BPS",
    "DURATION",
    "NUMBER_OF",
    "_STATISTICS",
    "Output #",
    "Stream mapping:",
    "Press [q]",
    "encoder",
    "size=",
];

/// Keeps only the stderr lines that carry an actual diagnostic
pub fn filter_stderr(stderr: &str) -> String {
    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Runs `program` to completion, killing it once `timeout_secs` elapse.
///
/// A non-zero exit status is an error carrying the filtered stderr.
pub async fn run_tool<I, S>(program: &str, args: I, timeout_secs: u64) -> Result<Output, TranscriptionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    debug!("Running {:?}", command.as_std());

    let output_future = command.output();
    let timeout_duration = Duration::from_secs(timeout_secs);
    let output = tokio::select! {
        result = output_future => {
            result.map_err(|e| TranscriptionError::ToolNotFound {
                command: program.to_string(),
                message: e.to_string(),
            })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(TranscriptionError::Timeout {
                command: program.to_string(),
                timeout_secs,
            });
        }
    };

    if !output.status.success() {
        let stderr = filter_stderr(&String::from_utf8_lossy(&output.stderr));
        error!("{} failed: {}", program, stderr);
        return Err(TranscriptionError::ProcessFailed {
            command: program.to_string(),
            stderr,
        });
    }

    Ok(output)
}
