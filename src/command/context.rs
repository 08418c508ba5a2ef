use anyhow::Result;
use console::style;

use super::list::{DevboxRow, render};
use super::load_registry;
use crate::config::Settings;

pub fn run(settings: &Settings, id: Option<&str>, unset: bool) -> Result<()> {
    let mut registry = load_registry(settings)?;

    if unset {
        registry.clear_active()?;
        println!("✓ Active context cleared");
        return Ok(());
    }

    if let Some(id) = id {
        registry.set_active(id)?;
        println!("✓ Active context is now {}", style(id).bold());
        return Ok(());
    }

    match registry.active() {
        None => println!("No active context"),
        Some(active) if settings.verbose => {
            let devbox = registry.get(active)?;
            println!("{}", render(vec![DevboxRow::new(active, devbox, true)]));
        }
        Some(active) => println!("{active}"),
    }
    Ok(())
}
