use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use crate::config::Settings;
use crate::filesystem::{Filesystem, LocalFs, PathKind};
use crate::state::Registry;

pub fn run(settings: &Settings, force: bool) -> Result<()> {
    let path = &settings.state_file;
    let existed = init_state(path, &LocalFs, force)?;
    let verb = if existed { "re-initialized" } else { "initialized" };
    println!("✓ {} state in {}", verb, style(path.display()).bold());
    Ok(())
}

/// Write an empty registry to `path`. Returns whether a file was replaced.
fn init_state(path: &Path, fs: &dyn Filesystem, force: bool) -> Result<bool> {
    let existed = fs.kind(path) != PathKind::None;
    if existed && !force {
        bail!(
            "state file {} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    Registry::create(path).save(None)?;
    Ok(existed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devbox::{Devbox, Runtime};
    use tempfile::TempDir;

    #[test]
    fn creates_empty_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.yaml");

        assert!(!init_state(&path, &LocalFs, false).unwrap());
        let registry = Registry::load(&path).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.active(), None);
    }

    #[test]
    fn refuses_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.yaml");
        let mut registry = Registry::create(&path);
        registry
            .add(
                "a",
                Devbox {
                    name: "a".to_string(),
                    description: String::new(),
                    image: "img".to_string(),
                    shell: String::new(),
                    user: None,
                    runtime: Runtime::Local,
                },
            )
            .unwrap();

        let err = init_state(&path, &LocalFs, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(Registry::load(&path).unwrap().contains("a"));

        assert!(init_state(&path, &LocalFs, true).unwrap());
        assert!(Registry::load(&path).unwrap().is_empty());
    }
}
