//! Devbox definitions: the identity and connection parameters of one sandbox.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DevboxError, Result};

/// User assumed inside the sandbox when a definition does not name one.
pub const DEFAULT_USER: &str = "developer";

/// Shell opened when neither the caller nor the definition picks one.
pub const FALLBACK_SHELL: &str = "sh";

/// Kubeconfig used for cluster devboxes added with only a namespace.
pub const DEFAULT_KUBECONFIG: &str = "~/.kube/config";

/// Where a devbox runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runtime {
    /// Local container engine (docker or podman).
    Local,
    /// Kubernetes pod in `namespace`, reached through `kubeconfig`.
    Cluster {
        kubeconfig: String,
        namespace: String,
    },
}

impl Runtime {
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Runtime::Local => None,
            Runtime::Cluster { namespace, .. } => Some(namespace),
        }
    }

    pub fn kubeconfig(&self) -> Option<&str> {
        match self {
            Runtime::Local => None,
            Runtime::Cluster { kubeconfig, .. } => Some(kubeconfig),
        }
    }
}

/// A registered devbox. Immutable once added to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DevboxRecord", into = "DevboxRecord")]
pub struct Devbox {
    /// Container or pod name.
    pub name: String,
    pub description: String,
    pub image: String,
    /// Shell path or name; empty means "use the fallback".
    pub shell: String,
    pub user: Option<String>,
    pub runtime: Runtime,
}

impl Devbox {
    /// User the sandbox is provisioned for.
    pub fn user(&self) -> &str {
        self.user
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER)
    }

    /// Home directory of [`Devbox::user`] inside the sandbox.
    pub fn home_dir(&self) -> String {
        match self.user() {
            "root" => "/root".to_string(),
            user => format!("/home/{user}"),
        }
    }

    /// Shell resolution: explicit override, then the configured shell, then `sh`.
    pub fn resolve_shell<'a>(&'a self, shell_override: Option<&'a str>) -> &'a str {
        shell_override
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.shell.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or(FALLBACK_SHELL)
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self.runtime, Runtime::Cluster { .. })
    }

    /// The definition as it reads back from the state file: an empty user
    /// becomes `None` and an empty kubeconfig becomes [`DEFAULT_KUBECONFIG`].
    /// A cluster runtime needs a namespace.
    pub fn normalize(self) -> Result<Self> {
        if let Runtime::Cluster { namespace, .. } = &self.runtime
            && namespace.is_empty()
        {
            return Err(DevboxError::validation(format!(
                "devbox {} has a cluster runtime without a namespace",
                self.name
            )));
        }
        Ok(Devbox::from(DevboxRecord::from(self)))
    }
}

/// On-disk shape of a devbox. Every key is always written, empty or not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DevboxRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    shell: String,
    #[serde(default)]
    kubeconfig: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    user: String,
}

impl From<DevboxRecord> for Devbox {
    fn from(record: DevboxRecord) -> Self {
        let runtime = if record.namespace.is_empty() {
            if !record.kubeconfig.is_empty() {
                warn!(
                    name = %record.name,
                    kubeconfig = %record.kubeconfig,
                    "kubeconfig set without namespace, treating devbox as local"
                );
            }
            Runtime::Local
        } else {
            let kubeconfig = if record.kubeconfig.is_empty() {
                DEFAULT_KUBECONFIG.to_string()
            } else {
                record.kubeconfig
            };
            Runtime::Cluster {
                kubeconfig,
                namespace: record.namespace,
            }
        };

        Devbox {
            name: record.name,
            description: record.description,
            image: record.image,
            shell: record.shell,
            user: Some(record.user).filter(|u| !u.is_empty()),
            runtime,
        }
    }
}

impl From<Devbox> for DevboxRecord {
    fn from(devbox: Devbox) -> Self {
        let (kubeconfig, namespace) = match devbox.runtime {
            Runtime::Local => (String::new(), String::new()),
            Runtime::Cluster {
                kubeconfig,
                namespace,
            } => (kubeconfig, namespace),
        };
        DevboxRecord {
            name: devbox.name,
            description: devbox.description,
            image: devbox.image,
            shell: devbox.shell,
            kubeconfig,
            namespace,
            user: devbox.user.unwrap_or_default(),
        }
    }
}
