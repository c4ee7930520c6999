//! Domain catalogs and the catalog registry.
//!
//! Each domain is described by a TOML catalog: its keywords, technology
//! stack terms, and a topic list where every topic carries a depth rank and
//! a pool of questions. The registry compiles catalogs against the shared
//! lexicon and resolves domain tags, falling back to a default domain for
//! anything it does not know.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::lexicon::{Lexicon, TermSet};
use crate::model::{Domain, QuestionType};

const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("ai.toml", include_str!("../catalogs/ai.toml")),
    ("bigdata.toml", include_str!("../catalogs/bigdata.toml")),
    ("iot.toml", include_str!("../catalogs/iot.toml")),
];

/// Domain used when a tag is empty or unknown.
pub const DEFAULT_DOMAIN: &str = "ai";

/// A topic an interview can be on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    /// Human-readable title, substituted into phrase templates.
    pub title: String,
    /// Depth rank; higher means more advanced.
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub questions: Vec<String>,
}

fn default_depth() -> u8 {
    1
}

/// Serialized form of a domain catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub domain: DomainHeader,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub stack_terms: Vec<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainHeader {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A compiled domain catalog.
#[derive(Debug, Clone)]
pub struct DomainCatalog {
    id: String,
    name: String,
    description: String,
    keywords: TermSet,
    stack_terms: TermSet,
    topics: Vec<Topic>,
}

impl DomainCatalog {
    /// Compile a catalog file. Stack terms from the lexicon are merged in.
    ///
    /// Fails when the catalog has no topics or a topic has no questions, so
    /// a compiled catalog can always produce a question.
    pub fn compile(file: CatalogFile, lexicon: &Lexicon) -> Result<Self, CatalogError> {
        let id = Domain::new(&file.domain.id).as_str().to_string();

        if file.topics.is_empty() {
            return Err(CatalogError::NoTopics(id));
        }
        if let Some(topic) = file.topics.iter().find(|t| t.questions.is_empty()) {
            return Err(CatalogError::NoQuestions {
                domain: id,
                topic: topic.id.clone(),
            });
        }

        let keywords = TermSet::compile("keywords", &file.keywords)?;
        let mut stack_terms = TermSet::compile("stack_terms", &file.stack_terms)?;
        for term in &lexicon.stack_terms {
            stack_terms.insert("stack_terms", term)?;
        }

        Ok(Self {
            id,
            name: file.domain.name,
            description: file.domain.description,
            keywords,
            stack_terms,
            topics: file.topics,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn keywords(&self) -> &TermSet {
        &self.keywords
    }

    pub fn stack_terms(&self) -> &TermSet {
        &self.stack_terms
    }

    /// Never empty.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }
}

/// Compiled catalogs keyed by domain, plus the shared lexicon.
#[derive(Debug, Clone)]
pub struct CatalogRegistry {
    lexicon: Lexicon,
    // Entries are replaced but never removed, so `default_index` stays valid.
    domains: Vec<DomainCatalog>,
    default_index: usize,
}

impl CatalogRegistry {
    /// The builtin lexicon and the `ai`, `bigdata` and `iot` catalogs.
    pub fn builtin() -> Result<Self, CatalogError> {
        let lexicon = Lexicon::builtin()?;
        let files = BUILTIN_CATALOGS
            .iter()
            .map(|(name, content)| parse_catalog_str(content, name))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(lexicon, files, DEFAULT_DOMAIN)
    }

    pub fn new(
        lexicon: Lexicon,
        files: Vec<CatalogFile>,
        default_domain: &str,
    ) -> Result<Self, CatalogError> {
        let mut domains: Vec<DomainCatalog> = Vec::with_capacity(files.len());
        for file in files {
            let catalog = DomainCatalog::compile(file, &lexicon)?;
            match domains.iter_mut().find(|d| d.id == catalog.id) {
                Some(existing) => *existing = catalog,
                None => domains.push(catalog),
            }
        }

        let wanted = Domain::new(default_domain);
        let default_index = domains
            .iter()
            .position(|d| d.id == wanted.as_str())
            .ok_or_else(|| CatalogError::UnknownDefaultDomain(wanted.to_string()))?;

        Ok(Self {
            lexicon,
            domains,
            default_index,
        })
    }

    /// Add a catalog, replacing any existing catalog with the same id.
    pub fn insert(&mut self, file: CatalogFile) -> Result<(), CatalogError> {
        let catalog = DomainCatalog::compile(file, &self.lexicon)?;
        tracing::debug!(domain = catalog.id(), "registering catalog");
        match self.domains.iter_mut().find(|d| d.id == catalog.id) {
            Some(existing) => *existing = catalog,
            None => self.domains.push(catalog),
        }
        Ok(())
    }

    /// Change the fallback domain.
    pub fn set_default_domain(&mut self, domain: &Domain) -> Result<(), CatalogError> {
        self.default_index = self
            .domains
            .iter()
            .position(|d| d.id == domain.as_str())
            .ok_or_else(|| CatalogError::UnknownDefaultDomain(domain.to_string()))?;
        Ok(())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn default_domain(&self) -> &DomainCatalog {
        &self.domains[self.default_index]
    }

    pub fn get(&self, domain: &Domain) -> Option<&DomainCatalog> {
        self.domains.iter().find(|d| d.id == domain.as_str())
    }

    pub fn is_known(&self, domain: &Domain) -> bool {
        self.get(domain).is_some()
    }

    /// The catalog for `domain`, or the default catalog if it is unknown.
    pub fn resolve(&self, domain: &Domain) -> &DomainCatalog {
        match self.get(domain) {
            Some(catalog) => catalog,
            None => {
                tracing::debug!(
                    domain = domain.as_str(),
                    fallback = self.default_domain().id(),
                    "unknown domain, using default catalog"
                );
                self.default_domain()
            }
        }
    }

    pub fn domains(&self) -> impl Iterator<Item = &DomainCatalog> {
        self.domains.iter()
    }
}

/// Parse a catalog from a TOML string.
pub fn parse_catalog_str(content: &str, source_name: &str) -> Result<CatalogFile, CatalogError> {
    toml::from_str(content).map_err(|e| CatalogError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Parse a catalog file from disk.
pub fn parse_catalog(path: &Path) -> Result<CatalogFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
    let file = parse_catalog_str(&content, &path.display().to_string())?;
    Ok(file)
}

/// Recursively load all `.toml` catalog files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<CatalogFile>> {
    let mut files = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            files.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(files)
}

/// A non-fatal issue found while validating a catalog.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The topic ID (if applicable).
    pub topic_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues that do not stop it compiling.
pub fn validate_catalog(file: &CatalogFile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if file.keywords.is_empty() {
        warnings.push(ValidationWarning {
            topic_id: None,
            message: "no keywords defined; technical depth will rely on patterns only".into(),
        });
    }

    let mut seen_keywords = HashSet::new();
    for keyword in &file.keywords {
        if !seen_keywords.insert(keyword.trim().to_lowercase()) {
            warnings.push(ValidationWarning {
                topic_id: None,
                message: format!("duplicate keyword: {keyword}"),
            });
        }
    }

    let mut seen_ids = HashSet::new();
    for topic in &file.topics {
        if !seen_ids.insert(&topic.id) {
            warnings.push(ValidationWarning {
                topic_id: Some(topic.id.clone()),
                message: format!("duplicate topic ID: {}", topic.id),
            });
        }
    }

    for topic in &file.topics {
        if topic.depth == 0 {
            warnings.push(ValidationWarning {
                topic_id: Some(topic.id.clone()),
                message: "depth rank is 0; ranks start at 1".into(),
            });
        }
        if topic.questions.iter().any(|q| q.trim().is_empty()) {
            warnings.push(ValidationWarning {
                topic_id: Some(topic.id.clone()),
                message: "topic contains an empty question".into(),
            });
        }
    }

    warnings
}
