use std::path::PathBuf;

/// Errors surfaced by the registry, provisioner and lifecycle layers.
#[derive(Debug, thiserror::Error)]
pub enum DevboxError {
    #[error("devbox {0} not found")]
    NotFound(String),

    #[error("state file {} not found (run `devbox init` first)", .0.display())]
    StateNotFound(PathBuf),

    #[error("devbox {0} already exists")]
    Duplicate(String),

    #[error("cannot parse state file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{context}: {source:#}")]
    Backend {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot access state file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DevboxError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn backend(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Backend {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = DevboxError> = std::result::Result<T, E>;
