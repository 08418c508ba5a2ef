use anyhow::Result;
use console::style;

use super::load_registry;
use crate::backend::CliBackend;
use crate::config::Settings;
use crate::lifecycle::Lifecycle;

pub fn run(settings: &Settings, ids: &[String]) -> Result<()> {
    let registry = load_registry(settings)?;
    let backend = CliBackend::new(settings);
    Lifecycle::new(&registry, &backend)
        .stop(ids, |id| println!("✓ Stopped devbox {}", style(id).bold()))?;
    Ok(())
}
