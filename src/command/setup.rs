use anyhow::Result;
use console::style;

use super::args::CategoryArgs;
use super::load_registry;
use crate::backend::CliBackend;
use crate::config::Settings;
use crate::filesystem::LocalFs;
use crate::lifecycle::Lifecycle;
use crate::manifest::Manifest;
use crate::provision::ItemOutcome;

pub fn run(settings: &Settings, ids: &[String], categories: &CategoryArgs) -> Result<()> {
    let registry = load_registry(settings)?;
    let backend = CliBackend::new(settings);
    let manifest = Manifest::builtin();

    let reports = Lifecycle::new(&registry, &backend).setup(
        ids,
        &LocalFs,
        &manifest,
        &categories.include,
        &categories.exclude,
        |id, category| {
            println!(
                "setting up devbox {} with {} config",
                style(id).bold(),
                style(category).cyan()
            )
        },
    )?;

    let copied = reports
        .iter()
        .filter(|r| matches!(r.outcome, ItemOutcome::Provisioned { .. }))
        .count();
    let missing = reports
        .iter()
        .filter(|r| r.outcome == ItemOutcome::Missing)
        .count();
    println!(
        "✓ Copied {} item(s); {} not present locally",
        copied,
        style(missing).dim()
    );
    Ok(())
}
