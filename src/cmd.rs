use anyhow::{Context, Result, anyhow};
use std::process::{Command, Output};
use tracing::{debug, trace};

/// A builder for executing external commands with unified error handling
pub struct Cmd<'a> {
    command: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Cmd<'a> {
    /// Create a new command builder
    pub fn new(command: &'a str) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    /// Add multiple arguments
    pub fn args(mut self, args: &[&'a str]) -> Self {
        self.args.extend_from_slice(args);
        self
    }

    /// Execute the command with captured output.
    /// Returns an error if the command fails (non-zero exit code)
    pub fn run(self) -> Result<Output> {
        let Cmd { command, args } = self;
        trace!(command, args = ?args, "cmd:run start");

        let output = Command::new(command)
            .args(&args)
            .output()
            .with_context(|| format!("Failed to execute command: {} {}", command, args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                command,
                args = ?args,
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "cmd:run failure"
            );
            return Err(anyhow!(
                "Command failed: {} {}\n{}",
                command,
                args.join(" "),
                stderr.trim()
            ));
        }
        trace!(command, "cmd:run success");
        Ok(output)
    }

    /// Execute the command attached to the caller's terminal.
    /// Blocks until the child exits; no timeout is applied.
    pub fn run_interactive(self) -> Result<()> {
        let Cmd { command, args } = self;
        trace!(command, args = ?args, "cmd:interactive start");

        let status = Command::new(command)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to execute command: {} {}", command, args.join(" ")))?;

        if !status.success() {
            debug!(command, status = ?status.code(), "cmd:interactive failure");
            return Err(anyhow!(
                "Command exited with code {}: {} {}",
                status.code().unwrap_or(-1),
                command,
                args.join(" ")
            ));
        }
        trace!(command, "cmd:interactive success");
        Ok(())
    }
}
