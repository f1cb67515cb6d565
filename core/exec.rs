use crate::error::{AppError, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Fixed ceiling for external metadata-retrieval calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run an external program with captured output and a hard deadline.
///
/// The child is polled until it exits or the timeout elapses; on timeout it
/// is killed and an error is returned. Output is decoded lossily and
/// trimmed. Callers degrade any error to a placeholder string; nothing here
/// aborts the run.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput> {
    log::debug!("Running external command: {} {:?}", program, args);
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AppError::Command(format!("Failed to spawn '{}': {}", program, e)))?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    log::warn!("Command '{}' timed out after {:?}", program, timeout);
                    return Err(AppError::CommandTimeout {
                        program: program.to_string(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(AppError::Command(format!(
                    "Failed waiting for '{}': {}",
                    program, e
                )));
            }
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| AppError::Command(format!("Failed to collect output of '{}': {}", program, e)))?;
    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Convenience wrapper for probing a binary that may not exist at `path`.
pub fn binary_exists(path: &Path) -> bool {
    path.is_file()
}
