//! Subcommand implementations and the helpers they share.

pub mod init;
pub mod practice;
pub mod score;
pub mod session;
pub mod topics;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use rehearse_core::config::{load_config_from, RehearseConfig};
use rehearse_core::score::{Axis, AxisTier};
use rehearse_core::statistics::SessionStats;
use rehearse_core::{CatalogRegistry, Domain, ScoreResult};

/// Load the config and build the catalog registry it describes.
pub fn load_registry(config_path: Option<&Path>) -> Result<(RehearseConfig, Arc<CatalogRegistry>)> {
    let config = load_config_from(config_path)?;
    let registry = config.build_registry()?;
    Ok((config, Arc::new(registry)))
}

/// The requested domain, or the configured default. Unknown tags are kept
/// and resolved by the registry.
pub fn pick_domain(
    registry: &CatalogRegistry,
    config: &RehearseConfig,
    requested: Option<&str>,
) -> Domain {
    let domain = Domain::new(requested.unwrap_or(&config.default_domain));
    if !registry.is_known(&domain) {
        tracing::warn!(
            "unknown domain '{domain}', using '{}'",
            registry.default_domain().id()
        );
    }
    domain
}

/// Axis breakdown table for one score.
pub fn score_table(score: &ScoreResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Axis", "Score", "Tier"]);
    for axis in Axis::ALL {
        let value = score.axis(axis);
        table.add_row(vec![
            Cell::new(axis.label()),
            Cell::new(value),
            Cell::new(AxisTier::of(value).as_str()),
        ]);
    }
    table.add_row(vec![
        Cell::new("overall"),
        Cell::new(score.overall_score()),
        Cell::new(""),
    ]);
    table
}

/// Summary table for a finished session.
pub fn stats_table(stats: &SessionStats) -> Table {
    let show = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".into());

    let mut table = Table::new();
    table.set_header(vec![
        "Answers",
        "Avg Overall",
        "Best",
        "Worst",
        "Transitions",
        "Follow-ups",
        "Guidance",
        "Trend",
    ]);
    table.add_row(vec![
        Cell::new(stats.answers),
        Cell::new(format!("{:.1}", stats.averages.overall)),
        Cell::new(show(stats.best_overall)),
        Cell::new(show(stats.worst_overall)),
        Cell::new(stats.decisions.transitions),
        Cell::new(stats.decisions.follow_ups),
        Cell::new(stats.decisions.guidance),
        Cell::new(stats.trend.as_str()),
    ]);
    table
}

/// Indent every line of `text`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
