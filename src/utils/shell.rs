// src/utils/shell.rs
use std::process::{ExitStatus, Stdio};
use anyhow::{Result, Context};
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// Output of a captured command, stdout followed by stderr
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub combined: Vec<u8>,
    pub stderr: String,
}

/// Execute a program and capture its combined output
pub async fn execute_captured(program: &str, args: &[String]) -> Result<CapturedOutput> {
    debug!("Executing command: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to execute command: {}", program))?;

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        warn!("Command failed: {} ({})\nStderr: {}", program, output.status, stderr);
    } else {
        trace!("Command succeeded: {}", program);
    }

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);

    Ok(CapturedOutput {
        status: output.status,
        combined,
        stderr,
    })
}

/// Execute a program in the foreground, forwarding stdout and stderr to our stdout
pub async fn execute_streaming(program: &str, args: &[String]) -> Result<ExitStatus> {
    debug!("Streaming command: {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .stdout(std::io::stdout())
        .stderr(std::io::stdout())
        .status()
        .await
        .with_context(|| format!("Failed to execute command: {}", program))?;

    if !status.success() {
        warn!("Command failed: {} ({})", program, status);
    }

    Ok(status)
}
