//! The `rehearse validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use rehearse_core::catalog::{
    load_catalog_directory, parse_catalog, validate_catalog, DomainCatalog,
};
use rehearse_core::lexicon::Lexicon;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let files = if catalog_path.is_dir() {
        load_catalog_directory(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };
    anyhow::ensure!(!files.is_empty(), "no catalogs found in {}", catalog_path.display());

    let lexicon = Lexicon::builtin().context("builtin lexicon is invalid")?;
    let mut total_warnings = 0;

    for file in files {
        let warnings = validate_catalog(&file);
        let name = file.domain.name.clone();
        let catalog = DomainCatalog::compile(file, &lexicon)
            .with_context(|| format!("catalog '{name}' is invalid"))?;

        println!(
            "Catalog: {} ({} topics, {} keywords)",
            catalog.name(),
            catalog.topics().len(),
            catalog.keywords().len()
        );

        for w in &warnings {
            let prefix = w
                .topic_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
