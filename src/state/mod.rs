//! The devbox registry: every known devbox definition plus the active
//! selection, persisted as a single YAML document.
//!
//! Every mutation rewrites the whole file. Two processes mutating the same
//! state file concurrently race, and the last writer wins.

mod store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::devbox::Devbox;
use crate::error::{DevboxError, Result};

/// Default location of the state file.
pub const DEFAULT_STATE_FILE: &str = "~/.devbox.state.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    active: String,
    boxes: BTreeMap<String, Devbox>,
    path: PathBuf,
}

impl Registry {
    /// An empty registry bound to `path`. Nothing is written until [`Registry::save`].
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            active: String::new(),
            boxes: BTreeMap::new(),
            path: path.into(),
        }
    }

    /// Load the registry stored at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = store::read(&path)?;

        if file.boxes.contains_key("") {
            return Err(DevboxError::validation(format!(
                "state file {} contains a devbox with an empty id",
                path.display()
            )));
        }

        // A hand-edited file may point at a devbox that no longer exists.
        let active = if file.active.is_empty() || file.boxes.contains_key(&file.active) {
            file.active
        } else {
            debug!(active = %file.active, "state:dropping dangling active selection");
            String::new()
        };

        debug!(path = %path.display(), boxes = file.boxes.len(), "state:loaded");
        Ok(Self {
            active,
            boxes: file.boxes,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active selection, if any.
    pub fn active(&self) -> Option<&str> {
        Some(self.active.as_str()).filter(|a| !a.is_empty())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.boxes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&Devbox> {
        self.boxes
            .get(id)
            .ok_or_else(|| DevboxError::NotFound(id.to_string()))
    }

    /// Devboxes ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Devbox)> {
        self.boxes.iter().map(|(id, devbox)| (id.as_str(), devbox))
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Add a devbox and make it the active selection.
    ///
    /// The definition is stored in the form it takes after a reload.
    pub fn add(&mut self, id: &str, devbox: Devbox) -> Result<()> {
        if id.is_empty() {
            return Err(DevboxError::validation("devbox id must not be empty"));
        }
        if self.contains(id) {
            return Err(DevboxError::Duplicate(id.to_string()));
        }

        let mut boxes = self.boxes.clone();
        boxes.insert(id.to_string(), devbox.normalize()?);
        self.commit(id.to_string(), boxes)?;
        info!(id, "state:added devbox");
        Ok(())
    }

    /// Remove a devbox, clearing the active selection if it pointed at it.
    ///
    /// Returns whether the active selection was cleared.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if !self.contains(id) {
            return Err(DevboxError::NotFound(id.to_string()));
        }

        let mut boxes = self.boxes.clone();
        boxes.remove(id);
        let cleared = self.active == id;
        let active = if cleared {
            String::new()
        } else {
            self.active.clone()
        };
        self.commit(active, boxes)?;
        info!(id, cleared_active = cleared, "state:removed devbox");
        Ok(cleared)
    }

    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if !self.contains(id) {
            return Err(DevboxError::NotFound(id.to_string()));
        }
        self.commit(id.to_string(), self.boxes.clone())?;
        info!(id, "state:set active devbox");
        Ok(())
    }

    pub fn clear_active(&mut self) -> Result<()> {
        self.commit(String::new(), self.boxes.clone())?;
        info!("state:cleared active devbox");
        Ok(())
    }

    /// Write the whole registry. With a path, the registry is rebound to it
    /// once the write succeeds.
    pub fn save(&mut self, path: Option<&Path>) -> Result<()> {
        let target = path.unwrap_or(&self.path).to_path_buf();
        store::write(&target, &self.snapshot())?;
        self.path = target;
        Ok(())
    }

    fn snapshot(&self) -> store::StateFile {
        store::StateFile {
            active: self.active.clone(),
            boxes: self.boxes.clone(),
        }
    }

    /// Persist the next state, then adopt it. A failed write leaves `self`
    /// untouched.
    fn commit(&mut self, active: String, boxes: BTreeMap<String, Devbox>) -> Result<()> {
        let file = store::StateFile { active, boxes };
        store::write(&self.path, &file)?;
        self.active = file.active;
        self.boxes = file.boxes;
        Ok(())
    }

    /// Pick the devbox an operation applies to: an explicit id wins, then
    /// the active selection.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<String> {
        match explicit.filter(|id| !id.is_empty()).or(self.active()) {
            Some(id) => Ok(id.to_string()),
            None => Err(DevboxError::validation(
                "no devbox id given and no active devbox context set",
            )),
        }
    }
}
