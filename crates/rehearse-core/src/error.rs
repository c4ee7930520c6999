//! Catalog error types.
//!
//! Only catalog construction can fail. Once a `CatalogRegistry` exists the
//! scorer, controller and rationale generator are total functions, so these
//! errors surface at load time rather than mid-interview.

use thiserror::Error;

/// Errors that can occur while loading or compiling catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The TOML source could not be parsed.
    #[error("failed to parse catalog {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A signal family contains a pattern that is not a valid regex.
    #[error("invalid pattern '{pattern}' in family '{family}': {source}")]
    InvalidPattern {
        family: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A domain defines no topics, so no question can ever be drawn.
    #[error("domain '{0}' has no topics")]
    NoTopics(String),

    /// A topic has no questions.
    #[error("topic '{topic}' in domain '{domain}' has no questions")]
    NoQuestions { domain: String, topic: String },

    /// The phrasebook lacks templates for a required slot.
    #[error("phrasebook has no templates for '{0}'")]
    MissingPhrases(String),

    /// The configured default domain is not present in the registry.
    #[error("default domain '{0}' is not a known catalog")]
    UnknownDefaultDomain(String),
}

impl CatalogError {
    /// Returns the domain the error refers to, when there is one.
    pub fn domain(&self) -> Option<&str> {
        match self {
            CatalogError::NoTopics(domain)
            | CatalogError::UnknownDefaultDomain(domain)
            | CatalogError::NoQuestions { domain, .. } => Some(domain),
            _ => None,
        }
    }
}
