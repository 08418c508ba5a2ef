//! Local filesystem access used by `init` and the provisioner.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

/// What, if anything, lives at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    None,
    File,
    Directory,
}

pub trait Filesystem {
    /// Home directory used to expand `~`.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Kind of entry at `path`, following symlinks.
    fn kind(&self, path: &Path) -> PathKind;

    /// Path to hand to a copy: the symlink target if `path` is a link,
    /// otherwise `path` itself.
    fn copy_source(&self, path: &Path) -> PathBuf;

    /// Expand a leading `~` against [`Filesystem::home_dir`].
    fn expand(&self, path: &str) -> Result<PathBuf> {
        match self.home_dir() {
            Some(home) => Ok(expand_with_home(path, &home)),
            None if path.starts_with('~') => {
                Err(anyhow!("Could not determine home directory to expand {path}"))
            }
            None => Ok(PathBuf::from(path)),
        }
    }
}

/// The real filesystem.
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn home_dir(&self) -> Option<PathBuf> {
        home::home_dir()
    }

    fn kind(&self, path: &Path) -> PathKind {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => PathKind::Directory,
            Ok(_) => PathKind::File,
            Err(_) => PathKind::None,
        }
    }

    fn copy_source(&self, path: &Path) -> PathBuf {
        match fs::read_link(path) {
            Ok(target) if target.is_absolute() => target,
            Ok(target) => path
                .parent()
                .map(|parent| parent.join(&target))
                .unwrap_or(target),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// Expand a leading `~` (alone or followed by `/`) using `home`.
pub fn expand_with_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Expand a leading `~` against the current user's home directory.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    LocalFs.expand(path)
}
