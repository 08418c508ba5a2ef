//! Turns devbox ids into ordered backend operations.
//!
//! Targets are processed one at a time, in the order given, and the first
//! failure is returned with the id it happened on. Whether a devbox is
//! running is never recorded: the registry tracks definitions only, so
//! removing an entry does not stop its sandbox.

use std::path::Path;

use tracing::info;

use crate::backend::{ExecMode, RuntimeBackend};
use crate::devbox::Devbox;
use crate::error::{DevboxError, Result};
use crate::filesystem::Filesystem;
use crate::manifest::Manifest;
use crate::provision::{ItemReport, Provisioner};
use crate::state::Registry;

pub struct Lifecycle<'a> {
    registry: &'a Registry,
    backend: &'a dyn RuntimeBackend,
}

impl<'a> Lifecycle<'a> {
    pub fn new(registry: &'a Registry, backend: &'a dyn RuntimeBackend) -> Self {
        Self { registry, backend }
    }

    /// Explicit ids in order, or the active selection when none are given.
    /// Every id must be registered.
    pub fn resolve_targets(&self, ids: &[String]) -> Result<Vec<(String, &'a Devbox)>> {
        let ids = if ids.is_empty() {
            vec![self.registry.resolve(None)?]
        } else {
            ids.to_vec()
        };
        ids.into_iter()
            .map(|id| {
                let devbox = self.registry.get(&id)?;
                Ok((id, devbox))
            })
            .collect()
    }

    /// Resolve exactly one target.
    pub fn resolve_single(&self, ids: &[String]) -> Result<(String, &'a Devbox)> {
        if ids.len() > 1 {
            return Err(DevboxError::validation(format!(
                "only one devbox id allowed, got {}",
                ids.len()
            )));
        }
        let id = self.registry.resolve(ids.first().map(String::as_str))?;
        let devbox = self.registry.get(&id)?;
        Ok((id, devbox))
    }

    /// Start each target; `started` is called after each success.
    pub fn start(&self, ids: &[String], mut started: impl FnMut(&str)) -> Result<()> {
        for (id, devbox) in self.resolve_targets(ids)? {
            info!(id = %id, name = %devbox.name, cluster = devbox.is_cluster(), "lifecycle:start");
            self.backend
                .start(devbox)
                .map_err(|e| DevboxError::backend(format!("cannot start devbox {id}"), e))?;
            started(&id);
        }
        Ok(())
    }

    /// Stop each target; `stopped` is called after each success.
    pub fn stop(&self, ids: &[String], mut stopped: impl FnMut(&str)) -> Result<()> {
        for (id, devbox) in self.resolve_targets(ids)? {
            info!(id = %id, name = %devbox.name, cluster = devbox.is_cluster(), "lifecycle:stop");
            self.backend
                .stop(devbox)
                .map_err(|e| DevboxError::backend(format!("cannot stop devbox {id}"), e))?;
            stopped(&id);
        }
        Ok(())
    }

    /// Open an interactive shell. Shell choice: `shell_override`, then the
    /// devbox's configured shell, then `sh`.
    pub fn shell(&self, ids: &[String], shell_override: Option<&str>) -> Result<()> {
        let (id, devbox) = self.resolve_single(ids)?;
        let shell = devbox.resolve_shell(shell_override);
        info!(id = %id, shell, "lifecycle:shell");
        self.backend
            .exec(devbox, shell, ExecMode::Interactive)
            .map_err(|e| {
                DevboxError::backend(format!("cannot open {shell} shell in devbox {id}"), e)
            })
    }

    /// Copy a local path into the devbox as-is.
    pub fn copy(&self, ids: &[String], src: &Path, dst: &str) -> Result<()> {
        let (id, devbox) = self.resolve_single(ids)?;
        info!(id = %id, src = %src.display(), dst, "lifecycle:copy");
        self.backend.copy_in(devbox, src, dst).map_err(|e| {
            DevboxError::backend(
                format!("cannot copy {} to {dst} in devbox {id}", src.display()),
                e,
            )
        })
    }

    /// Provision the selected manifest categories into each target.
    ///
    /// Categories are validated before any target is touched.
    /// `on_category` is called with (id, category) before each category.
    pub fn setup(
        &self,
        ids: &[String],
        fs: &dyn Filesystem,
        manifest: &Manifest,
        include: &[String],
        exclude: &[String],
        mut on_category: impl FnMut(&str, &str),
    ) -> Result<Vec<ItemReport>> {
        let categories = manifest.select(include, exclude)?;
        let targets = self.resolve_targets(ids)?;
        let provisioner = Provisioner::new(self.backend, fs);

        let mut reports = Vec::new();
        for (id, devbox) in targets {
            for category in &categories {
                on_category(&id, &category.name);
                info!(id = %id, category = %category.name, "lifecycle:setup");
                reports.extend(provisioner.provision_category(devbox, category)?);
            }
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{Call, RecordingBackend};
    use crate::devbox::Runtime;
    use crate::filesystem::PathKind;
    use crate::provision::tests::FakeFs;
    use tempfile::TempDir;

    fn devbox(name: &str, shell: &str) -> Devbox {
        Devbox {
            name: name.to_string(),
            description: String::new(),
            image: "img".to_string(),
            shell: shell.to_string(),
            user: None,
            runtime: Runtime::Local,
        }
    }

    /// Registry with a, b, c (c active).
    fn registry(dir: &TempDir) -> Registry {
        let mut registry = Registry::create(dir.path().join("state.yaml"));
        registry.add("a", devbox("box-a", "bash")).unwrap();
        registry.add("b", devbox("box-b", "")).unwrap();
        registry.add("c", devbox("box-c", "zsh")).unwrap();
        registry
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn start_defaults_to_active() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        let mut started = Vec::new();
        lifecycle
            .start(&[], |id| started.push(id.to_string()))
            .unwrap();
        assert_eq!(started, ["c"]);
        assert_eq!(backend.calls(), [Call::Start("box-c".to_string())]);
    }

    #[test]
    fn start_processes_targets_in_order() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        lifecycle.start(&ids(&["b", "a"]), |_| {}).unwrap();
        assert_eq!(
            backend.calls(),
            [
                Call::Start("box-b".to_string()),
                Call::Start("box-a".to_string())
            ]
        );
    }

    #[test]
    fn first_failure_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::failing_on("box-b");
        let lifecycle = Lifecycle::new(&registry, &backend);

        let mut stopped = Vec::new();
        let err = lifecycle
            .stop(&ids(&["a", "b", "c"]), |id| stopped.push(id.to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("cannot stop devbox b"));
        assert_eq!(stopped, ["a"]);
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn unknown_target_fails_before_any_call() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        let err = lifecycle.start(&ids(&["a", "zzz"]), |_| {}).unwrap_err();
        assert!(matches!(err, DevboxError::NotFound(ref id) if id == "zzz"));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn no_target_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut registry = registry(&dir);
        registry.clear_active().unwrap();
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        assert!(matches!(
            lifecycle.start(&[], |_| {}).unwrap_err(),
            DevboxError::Validation(_)
        ));
        assert!(matches!(
            lifecycle.shell(&[], None).unwrap_err(),
            DevboxError::Validation(_)
        ));
    }

    #[test]
    fn shell_resolves_override_then_definition_then_fallback() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        lifecycle.shell(&ids(&["a"]), Some("fish")).unwrap();
        lifecycle.shell(&ids(&["a"]), None).unwrap();
        lifecycle.shell(&ids(&["b"]), None).unwrap();

        let shells: Vec<String> = backend
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::Exec { command, mode, .. } => {
                    assert_eq!(mode, ExecMode::Interactive);
                    command
                }
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(shells, ["fish", "bash", "sh"]);
    }

    #[test]
    fn shell_and_copy_take_one_target() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        assert!(matches!(
            lifecycle.shell(&ids(&["a", "b"]), None).unwrap_err(),
            DevboxError::Validation(_)
        ));
        assert!(matches!(
            lifecycle
                .copy(&ids(&["a", "b"]), Path::new("/tmp/x"), "/tmp/x")
                .unwrap_err(),
            DevboxError::Validation(_)
        ));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn copy_is_unconditional() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);

        lifecycle
            .copy(&[], Path::new("/does/not/exist"), "/home/developer/x")
            .unwrap();
        assert_eq!(
            backend.calls(),
            [Call::CopyIn {
                name: "box-c".to_string(),
                src: "/does/not/exist".to_string(),
                dst: "/home/developer/x".to_string(),
            }]
        );
    }

    #[test]
    fn setup_validates_categories_before_work() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);
        let fs = FakeFs::default().with("/home/tester/.bashrc", PathKind::File);

        let err = lifecycle
            .setup(
                &ids(&["a"]),
                &fs,
                &Manifest::builtin(),
                &ids(&["bash", "fish"]),
                &[],
                |_, _| {},
            )
            .unwrap_err();
        assert!(matches!(err, DevboxError::Validation(_)));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn setup_with_empty_selection_issues_nothing() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);
        let fs = FakeFs::default().with("/home/tester/.gitconfig", PathKind::File);

        let reports = lifecycle
            .setup(
                &[],
                &fs,
                &Manifest::builtin(),
                &ids(&["git"]),
                &ids(&["git"]),
                |_, _| panic!("no category should run"),
            )
            .unwrap();
        assert!(reports.is_empty());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn setup_walks_targets_then_categories() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let backend = RecordingBackend::new();
        let lifecycle = Lifecycle::new(&registry, &backend);
        let fs = FakeFs::default()
            .with("/home/tester/.bashrc", PathKind::File)
            .with("/home/tester/.gitconfig", PathKind::File);

        let mut seen = Vec::new();
        lifecycle
            .setup(
                &ids(&["a", "b"]),
                &fs,
                &Manifest::builtin(),
                &ids(&["git", "bash"]),
                &[],
                |id, category| seen.push(format!("{id}/{category}")),
            )
            .unwrap();
        assert_eq!(seen, ["a/bash", "a/git", "b/bash", "b/git"]);
        assert_eq!(backend.calls().len(), 4);
    }
}
