use anyhow::Result;

use super::load_registry;
use crate::backend::CliBackend;
use crate::config::Settings;
use crate::lifecycle::Lifecycle;

pub fn run(settings: &Settings, id: Option<&str>, shell: Option<&str>) -> Result<()> {
    let registry = load_registry(settings)?;
    let backend = CliBackend::new(settings);
    let ids: Vec<String> = id.map(str::to_string).into_iter().collect();
    Lifecycle::new(&registry, &backend).shell(&ids, shell)?;
    Ok(())
}
