use anyhow::Result;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Padding, Style, object::Columns},
};

use super::load_registry;
use crate::config::Settings;
use crate::devbox::Devbox;

#[derive(Tabled)]
pub(super) struct DevboxRow {
    #[tabled(rename = "")]
    active: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "IMAGE")]
    image: String,
    #[tabled(rename = "SHELL")]
    shell: String,
    #[tabled(rename = "USER")]
    user: String,
    #[tabled(rename = "KUBECONFIG")]
    kubeconfig: String,
    #[tabled(rename = "NAMESPACE")]
    namespace: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

impl DevboxRow {
    pub(super) fn new(id: &str, devbox: &Devbox, active: bool) -> Self {
        Self {
            active: if active { "*".to_string() } else { String::new() },
            id: id.to_string(),
            name: devbox.name.clone(),
            image: devbox.image.clone(),
            shell: or_dash(&devbox.shell),
            user: or_dash(devbox.user.as_deref().unwrap_or_default()),
            kubeconfig: or_dash(devbox.runtime.kubeconfig().unwrap_or_default()),
            namespace: or_dash(devbox.runtime.namespace().unwrap_or_default()),
            description: or_dash(&devbox.description),
        }
    }
}

pub(super) fn render(rows: Vec<DevboxRow>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .modify(Columns::new(0..9), Padding::new(0, 1, 0, 0));
    table.to_string()
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    id: &'a str,
    active: bool,
    #[serde(flatten)]
    devbox: &'a Devbox,
}

pub fn run(settings: &Settings, json: bool) -> Result<()> {
    let registry = load_registry(settings)?;
    let active = registry.active();

    if json {
        let entries: Vec<JsonEntry> = registry
            .iter()
            .map(|(id, devbox)| JsonEntry {
                id,
                active: active == Some(id),
                devbox,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("No devboxes registered");
        return Ok(());
    }

    let rows = registry
        .iter()
        .map(|(id, devbox)| DevboxRow::new(id, devbox, active == Some(id)))
        .collect();
    println!("{}", render(rows));
    Ok(())
}
