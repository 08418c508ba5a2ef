pub mod add;
pub mod args;
pub mod context;
pub mod copy;
pub mod init;
pub mod list;
pub mod remove;
pub mod setup;
pub mod shell;
pub mod start;
pub mod stop;

use anyhow::Result;
use tracing::debug;

use crate::config::Settings;
use crate::state::Registry;

/// Load the registry named by the resolved settings.
pub fn load_registry(settings: &Settings) -> Result<Registry> {
    let registry = Registry::load(&settings.state_file)?;
    debug!(path = %registry.path().display(), "command:loaded registry");
    Ok(registry)
}
