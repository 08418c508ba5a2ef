//! YAML persistence for the registry.
//!
//! Writes go to a temporary file in the destination directory which is then
//! renamed over the state file, so a failed write never truncates it.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::devbox::Devbox;
use crate::error::{DevboxError, Result};

/// Document layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct StateFile {
    #[serde(default)]
    pub active: String,
    #[serde(default)]
    pub boxes: BTreeMap<String, Devbox>,
}

pub(super) fn read(path: &Path) -> Result<StateFile> {
    debug!(path = %path.display(), "state:reading");
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DevboxError::StateNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(DevboxError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // An empty file is an empty registry, not a parse failure.
    if contents.trim().is_empty() {
        return Ok(StateFile::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| DevboxError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn write(path: &Path, state: &StateFile) -> Result<()> {
    let io_err = |source| DevboxError::Io {
        path: path.to_path_buf(),
        source,
    };

    let yaml = serde_yaml::to_string(state).map_err(|e| {
        io_err(std::io::Error::new(ErrorKind::InvalidData, e.to_string()))
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(yaml.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    debug!(path = %path.display(), boxes = state.boxes.len(), "state:written");
    Ok(())
}
