//! In-memory backend for exercising the core without a container engine.

use std::cell::RefCell;
use std::path::Path;

use anyhow::{Result, bail};

use super::{ExecMode, RuntimeBackend};
use crate::devbox::Devbox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Stop(String),
    Exec {
        name: String,
        command: String,
        mode: ExecMode,
    },
    CopyIn {
        name: String,
        src: String,
        dst: String,
    },
}

/// Records every call; fails any call whose rendering contains `fail_on`.
#[derive(Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    fail_on: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let rendered = format!("{call:?}");
        self.calls.borrow_mut().push(call);
        if let Some(needle) = &self.fail_on
            && rendered.contains(needle.as_str())
        {
            bail!("simulated failure on {rendered}");
        }
        Ok(())
    }
}

impl RuntimeBackend for RecordingBackend {
    fn start(&self, devbox: &Devbox) -> Result<()> {
        self.record(Call::Start(devbox.name.clone()))
    }

    fn stop(&self, devbox: &Devbox) -> Result<()> {
        self.record(Call::Stop(devbox.name.clone()))
    }

    fn exec(&self, devbox: &Devbox, command: &str, mode: ExecMode) -> Result<()> {
        self.record(Call::Exec {
            name: devbox.name.clone(),
            command: command.to_string(),
            mode,
        })
    }

    fn copy_in(&self, devbox: &Devbox, src: &Path, dst: &str) -> Result<()> {
        self.record(Call::CopyIn {
            name: devbox.name.clone(),
            src: src.display().to_string(),
            dst: dst.to_string(),
        })
    }
}
