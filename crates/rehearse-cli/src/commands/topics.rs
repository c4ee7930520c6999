//! The `rehearse topics` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use rehearse_core::Domain;

use super::load_registry;

pub fn execute(domain: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let (_, registry) = load_registry(config_path.as_deref())?;

    let wanted = domain.as_deref().map(Domain::new);
    if let Some(domain) = &wanted {
        anyhow::ensure!(
            registry.is_known(domain),
            "unknown domain '{domain}' (known: {})",
            registry.domains().map(|d| d.id()).collect::<Vec<_>>().join(", ")
        );
    }

    for catalog in registry.domains() {
        if wanted.as_ref().is_some_and(|d| d.as_str() != catalog.id()) {
            continue;
        }

        println!("Domain: {} ({})", catalog.name(), catalog.id());
        if !catalog.description().is_empty() {
            println!("{}", catalog.description());
        }

        let mut table = Table::new();
        table.set_header(vec!["Topic", "Title", "Depth", "Type", "Questions"]);
        for topic in catalog.topics() {
            table.add_row(vec![
                Cell::new(&topic.id),
                Cell::new(&topic.title),
                Cell::new(topic.depth),
                Cell::new(topic.question_type),
                Cell::new(topic.questions.len()),
            ]);
        }
        println!("{table}\n");
    }

    Ok(())
}
