//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{load_catalog_directory, CatalogRegistry, DEFAULT_DOMAIN};
use crate::model::Domain;
use crate::scorer::DEFAULT_MIN_ANSWER_CHARS;
use crate::session::SessionConfig;

/// Top-level rehearse configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehearseConfig {
    /// Domain used when none is given, and for unknown domain tags.
    #[serde(default = "default_domain")]
    pub default_domain: String,
    /// Extra catalogs, loaded on top of the builtin ones.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// Fixed seed for topic draws and phrase selection.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Answers shorter than this are not scored.
    #[serde(default = "default_min_answer_chars")]
    pub min_answer_chars: usize,
    /// Output directory for session reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}
fn default_min_answer_chars() -> usize {
    DEFAULT_MIN_ANSWER_CHARS
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./rehearse-sessions")
}

impl Default for RehearseConfig {
    fn default() -> Self {
        Self {
            default_domain: default_domain(),
            catalog_dir: None,
            seed: None,
            min_answer_chars: default_min_answer_chars(),
            output_dir: default_output_dir(),
        }
    }
}

impl RehearseConfig {
    /// Builtin catalogs, plus `catalog_dir` if set, with the configured
    /// default domain.
    pub fn build_registry(&self) -> Result<CatalogRegistry> {
        let mut registry = CatalogRegistry::builtin().context("builtin catalogs are invalid")?;

        if let Some(dir) = &self.catalog_dir {
            for file in load_catalog_directory(dir)? {
                let id = file.domain.id.clone();
                registry
                    .insert(file)
                    .with_context(|| format!("failed to compile catalog '{id}'"))?;
            }
        }

        registry
            .set_default_domain(&Domain::new(&self.default_domain))
            .context("invalid default_domain in config")?;
        Ok(registry)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            min_answer_chars: self.min_answer_chars,
            seed: self.seed,
        }
    }

    /// Apply `REHEARSE_*` overrides using `lookup` to read variables.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(seed) = lookup("REHEARSE_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("REHEARSE_SEED is not a number: '{seed}'"))?;
            self.seed = Some(seed);
        }
        if let Some(dir) = lookup("REHEARSE_CATALOG_DIR") {
            self.catalog_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to an empty string. Substituted values are not
/// expanded again.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order without a path:
/// 1. `rehearse.toml` in the current directory
/// 2. `~/.config/rehearse/config.toml`
///
/// Environment variable overrides: `REHEARSE_SEED`, `REHEARSE_CATALOG_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<RehearseConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("rehearse.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RehearseConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RehearseConfig::default(),
    };

    config.apply_overrides(|name| std::env::var(name).ok())?;

    config.catalog_dir = config.catalog_dir.as_deref().map(resolve_path);
    config.output_dir = resolve_path(&config.output_dir);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("rehearse"))
}
