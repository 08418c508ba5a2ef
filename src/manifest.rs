//! The provisioning manifest: which local configuration files belong to
//! each category, and what to run in the devbox after copying them.

use crate::error::{DevboxError, Result};

/// Command value that stops the remaining commands of the current item.
pub const BREAK_COMMAND: &str = "done";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// Local path, `~`-relative or absolute. A trailing `/` marks a
    /// directory. Empty paths are placeholders and are skipped.
    pub path: String,
    /// Command templates run inside the devbox after the copy.
    pub commands: Vec<String>,
}

impl ManifestItem {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            commands: Vec::new(),
        }
    }

    pub fn with_commands(path: &str, commands: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.path.ends_with('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<ManifestItem>,
}

/// Ordered table of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    categories: Vec<Category>,
}

impl Manifest {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The dotfile manifest shipped with devbox.
    pub fn builtin() -> Self {
        let category = |name: &str, items: Vec<ManifestItem>| Category {
            name: name.to_string(),
            items,
        };

        Self::new(vec![
            category(
                "bash",
                vec![
                    ManifestItem::new("~/.bash_profile"),
                    ManifestItem::new("~/.bashrc"),
                    ManifestItem::new("~/.profile"),
                ],
            ),
            category(
                "zsh",
                vec![
                    ManifestItem::new("~/.zshrc"),
                    ManifestItem::new("~/.zshenv"),
                    ManifestItem::new("~/.zlogin"),
                    ManifestItem::new("~/.zlogout"),
                    ManifestItem::new("~/.zprofile"),
                    ManifestItem::new("~/.oh-my-zsh/"),
                ],
            ),
            category(
                "git",
                vec![
                    ManifestItem::new("~/.gitconfig"),
                    ManifestItem::new("~/.gitignore"),
                    ManifestItem::new("~/.gitattributes"),
                ],
            ),
            category("ssh", vec![ManifestItem::new("~/.ssh/")]),
            category(
                "tmux",
                vec![
                    ManifestItem::new("~/.tmux.conf"),
                    ManifestItem::new("~/.tmux/"),
                ],
            ),
            category(
                "vim",
                vec![
                    ManifestItem::new("~/.vimrc"),
                    ManifestItem::new("~/.viminfo"),
                    ManifestItem::new("~/.vim/"),
                ],
            ),
            category(
                "emacs",
                vec![
                    ManifestItem::with_commands(
                        "~/.spacemacs",
                        &[
                            "git clone https://github.com/syl20bnr/spacemacs {{ box.home }}/.emacs.d",
                            BREAK_COMMAND,
                        ],
                    ),
                    ManifestItem::with_commands(
                        "~/.doom.d/",
                        &[
                            "git clone https://github.com/hlissner/doom-emacs {{ box.home }}/.emacs.d",
                            BREAK_COMMAND,
                        ],
                    ),
                    ManifestItem::new("~/.emacs.d/"),
                ],
            ),
        ])
    }

    /// Category names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Categories to provision: `include` (or every category when empty)
    /// minus `exclude`, in declaration order.
    ///
    /// Unknown names in either list are rejected before anything runs.
    pub fn select(&self, include: &[String], exclude: &[String]) -> Result<Vec<&Category>> {
        for (flag, names) in [("--include", include), ("--exclude", exclude)] {
            if let Some(unknown) = names.iter().find(|n| self.category(n).is_none()) {
                return Err(DevboxError::validation(format!(
                    "invalid manifest category {unknown} in {flag} (known: {})",
                    self.names().collect::<Vec<_>>().join(", ")
                )));
            }
        }

        Ok(self
            .categories
            .iter()
            .filter(|c| include.is_empty() || include.contains(&c.name))
            .filter(|c| !exclude.contains(&c.name))
            .collect())
    }
}
