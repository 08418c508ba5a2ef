//! Copies a user's local configuration into a devbox, category by
//! category, and runs each item's follow-up commands.
//!
//! Provisioning is not transactional. A failure stops the run and leaves
//! whatever was already copied in place. Re-running is safe: items whose
//! local path is missing are skipped, and copies overwrite.

use tracing::{debug, info};

use crate::backend::{ExecMode, RuntimeBackend};
use crate::devbox::Devbox;
use crate::error::{DevboxError, Result};
use crate::filesystem::{Filesystem, PathKind};
use crate::manifest::{BREAK_COMMAND, Category, ManifestItem};
use crate::template::{TemplateEnv, create_template_env, render_command};

/// What happened to one manifest item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Placeholder item with no path.
    Placeholder,
    /// Local path absent or of the wrong kind.
    Missing,
    /// Copied, then ran `commands` of its commands.
    Provisioned { commands: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub path: String,
    pub outcome: ItemOutcome,
}

pub struct Provisioner<'a> {
    backend: &'a dyn RuntimeBackend,
    fs: &'a dyn Filesystem,
    templates: TemplateEnv,
}

impl<'a> Provisioner<'a> {
    pub fn new(backend: &'a dyn RuntimeBackend, fs: &'a dyn Filesystem) -> Self {
        Self {
            backend,
            fs,
            templates: create_template_env(),
        }
    }

    /// Provision every item of `category` into `devbox`, in declaration order.
    pub fn provision_category(
        &self,
        devbox: &Devbox,
        category: &Category,
    ) -> Result<Vec<ItemReport>> {
        debug!(name = %devbox.name, category = %category.name, "provision:category start");
        category
            .items
            .iter()
            .map(|item| {
                let scope = || {
                    format!(
                        "{} config item {} in devbox {}",
                        category.name, item.path, devbox.name
                    )
                };
                let outcome = self.provision_item(devbox, item).map_err(|e| match e {
                    DevboxError::Backend { context, source } => DevboxError::Backend {
                        context: format!("{}: {context}", scope()),
                        source,
                    },
                    DevboxError::Validation(message) => {
                        DevboxError::Validation(format!("{}: {message}", scope()))
                    }
                    other => other,
                })?;
                Ok(ItemReport {
                    path: item.path.clone(),
                    outcome,
                })
            })
            .collect()
    }

    fn provision_item(&self, devbox: &Devbox, item: &ManifestItem) -> Result<ItemOutcome> {
        if item.path.is_empty() {
            return Ok(ItemOutcome::Placeholder);
        }

        let local = self
            .fs
            .expand(&item.path)
            .map_err(|e| DevboxError::backend("resolving local path", e))?;
        let wanted = if item.is_directory() {
            PathKind::Directory
        } else {
            PathKind::File
        };
        if self.fs.kind(&local) != wanted {
            debug!(path = %item.path, "provision:item missing locally, skipping");
            return Ok(ItemOutcome::Missing);
        }

        // `dir/.` copies the directory's contents, so a second run merges into
        // the existing destination instead of nesting a copy inside it.
        let src = self.fs.copy_source(&local);
        let src = if item.is_directory() {
            src.join(".")
        } else {
            src
        };
        let dst = remote_path(&item.path, devbox);
        info!(name = %devbox.name, src = %src.display(), dst = %dst, "provision:copy");
        self.backend
            .copy_in(devbox, &src, &dst)
            .map_err(|e| DevboxError::backend(format!("copying to {dst}"), e))?;

        let mut ran = 0;
        for template in &item.commands {
            if template == BREAK_COMMAND {
                debug!(path = %item.path, "provision:break");
                break;
            }
            let command = render_command(&self.templates, template, devbox)?;
            info!(name = %devbox.name, command = %command, "provision:exec");
            self.backend
                .exec(devbox, &command, ExecMode::Batch)
                .map_err(|e| DevboxError::backend(format!("running '{command}'"), e))?;
            ran += 1;
        }

        Ok(ItemOutcome::Provisioned { commands: ran })
    }
}

/// Destination of a manifest path inside the devbox: the `~` shorthand
/// becomes the devbox user's home, and a trailing separator is dropped.
pub fn remote_path(path: &str, devbox: &Devbox) -> String {
    let path = path.trim_end_matches('/');
    if path == "~" {
        return devbox.home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => format!("{}/{}", devbox.home_dir(), rest),
        None => path.to_string(),
    }
}
