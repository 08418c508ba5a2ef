//! Runtime backends: the layer that actually starts, stops, execs into and
//! copies into devboxes.
//!
//! The core only talks to [`RuntimeBackend`]. [`CliBackend`] implements it by
//! shelling out to `docker`/`podman` for local devboxes and `kubectl` for
//! cluster devboxes.

mod docker;
mod kubectl;
#[cfg(test)]
pub mod testing;

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::{debug, info};

use crate::cmd::Cmd;
use crate::config::{ContainerRuntime, Settings};
use crate::devbox::{Devbox, Runtime};
use crate::filesystem::expand_tilde;
use crate::shell::command_line;

/// How an exec is attached to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Attach the caller's terminal (shell sessions).
    Interactive,
    /// Run a command string through `sh -c` and wait for it.
    Batch,
}

/// Capabilities the core needs from a container engine or cluster.
pub trait RuntimeBackend {
    fn start(&self, devbox: &Devbox) -> Result<()>;

    fn stop(&self, devbox: &Devbox) -> Result<()>;

    /// Interactive mode runs `command` as the program to attach to (a
    /// shell); batch mode runs it as a shell command line.
    fn exec(&self, devbox: &Devbox, command: &str, mode: ExecMode) -> Result<()>;

    fn copy_in(&self, devbox: &Devbox, src: &Path, dst: &str) -> Result<()>;
}

/// One backend operation, before it is rendered for a specific runtime.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Request<'a> {
    Start,
    Stop,
    Exec { command: &'a str, mode: ExecMode },
    CopyIn { src: &'a Path, dst: &'a str },
}

/// A fully rendered external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub(crate) fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub(crate) fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn command_line(&self) -> String {
        command_line(&self.program, &self.args)
    }
}

/// Backend that drives the `docker`/`podman` and `kubectl` CLIs.
pub struct CliBackend {
    runtime: ContainerRuntime,
    dry_run: bool,
    verbose: bool,
}

impl CliBackend {
    pub fn new(settings: &Settings) -> Self {
        Self {
            runtime: settings.runtime.clone(),
            dry_run: settings.dry_run,
            verbose: settings.verbose,
        }
    }

    /// Render `request` for the devbox's runtime.
    pub(crate) fn plan(&self, devbox: &Devbox, request: Request<'_>) -> Result<Invocation> {
        match &devbox.runtime {
            Runtime::Local => Ok(docker::plan(self.runtime.program(), devbox, request)),
            Runtime::Cluster {
                kubeconfig,
                namespace,
            } => {
                let kubeconfig = expand_tilde(kubeconfig)?;
                Ok(kubectl::plan(&kubeconfig, namespace, devbox, request))
            }
        }
    }

    fn dispatch(&self, devbox: &Devbox, request: Request<'_>) -> Result<()> {
        let invocation = self.plan(devbox, request)?;
        let line = invocation.command_line();

        if self.dry_run || self.verbose {
            println!("{} {}", style("cmd:").dim(), line);
        }
        if self.dry_run {
            debug!(command = %line, "backend:dry-run");
            return Ok(());
        }

        which::which(&invocation.program)
            .with_context(|| format!("{} not found on PATH", invocation.program))?;

        info!(name = %devbox.name, command = %line, "backend:exec");
        let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
        let cmd = Cmd::new(&invocation.program).args(&args);
        match request {
            Request::Exec {
                mode: ExecMode::Interactive,
                ..
            } => cmd.run_interactive(),
            _ => cmd.run().map(|_| ()),
        }
    }
}

impl RuntimeBackend for CliBackend {
    fn start(&self, devbox: &Devbox) -> Result<()> {
        self.dispatch(devbox, Request::Start)
    }

    fn stop(&self, devbox: &Devbox) -> Result<()> {
        self.dispatch(devbox, Request::Stop)
    }

    fn exec(&self, devbox: &Devbox, command: &str, mode: ExecMode) -> Result<()> {
        self.dispatch(devbox, Request::Exec { command, mode })
    }

    fn copy_in(&self, devbox: &Devbox, src: &Path, dst: &str) -> Result<()> {
        self.dispatch(devbox, Request::CopyIn { src, dst })
    }
}
