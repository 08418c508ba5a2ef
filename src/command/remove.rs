use anyhow::Result;
use console::style;

use super::load_registry;
use crate::config::Settings;

pub fn run(settings: &Settings, id: &str) -> Result<()> {
    let mut registry = load_registry(settings)?;
    let cleared = registry.remove(id)?;
    println!("✓ Removed devbox {}", style(id).bold());
    if cleared {
        println!("  active context cleared; run 'devbox context ID' to pick another");
    }
    Ok(())
}
