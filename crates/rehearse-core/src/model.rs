//! Core input types for rehearse.
//!
//! An `Answer` is the immutable unit the scorer consumes: the candidate's raw
//! text plus the domain and question type it was given for.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A technical domain tag such as `ai`, `bigdata` or `iot`.
///
/// Tags are normalized (trimmed, lowercased) on construction. Whether a tag
/// names a known catalog is decided by the `CatalogRegistry`, which falls
/// back to its default domain for anything it does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    pub fn new(tag: &str) -> Self {
        Self(tag.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty tag, which always resolves to the default domain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Domain {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Domain {
    fn from(tag: String) -> Self {
        Self::new(&tag)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of question an answer responds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    Technical,
    Project,
    SystemDesign,
    Behavioral,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Technical => write!(f, "technical"),
            QuestionType::Project => write!(f, "project"),
            QuestionType::SystemDesign => write!(f, "system_design"),
            QuestionType::Behavioral => write!(f, "behavioral"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" | "tech" => Ok(QuestionType::Technical),
            "project" => Ok(QuestionType::Project),
            "system_design" | "system-design" | "design" => Ok(QuestionType::SystemDesign),
            "behavioral" | "behavioural" => Ok(QuestionType::Behavioral),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A candidate's answer, as handed to the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The raw answer text, unmodified.
    pub text: String,
    /// Domain the question was asked in.
    pub domain: Domain,
    /// Kind of question being answered.
    #[serde(default)]
    pub question_type: QuestionType,
}

impl Answer {
    pub fn new(
        text: impl Into<String>,
        domain: impl Into<Domain>,
        question_type: QuestionType,
    ) -> Self {
        Self {
            text: text.into(),
            domain: domain.into(),
            question_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_normalized() {
        assert_eq!(Domain::new("  BigData ").as_str(), "bigdata");
        assert!(Domain::new("   ").is_empty());
        assert_eq!(Domain::from("IoT"), Domain::new("iot"));
    }

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::SystemDesign.to_string(), "system_design");
        assert_eq!("Project".parse::<QuestionType>().unwrap(), QuestionType::Project);
        assert_eq!("design".parse::<QuestionType>().unwrap(), QuestionType::SystemDesign);
        assert_eq!("behavioural".parse::<QuestionType>().unwrap(), QuestionType::Behavioral);
        assert!("trivia".parse::<QuestionType>().is_err());
    }

    #[test]
    fn answer_serde_normalizes_domain() {
        let answer: Answer = serde_json::from_str(r#"{"text":"hi","domain":" AI "}"#).unwrap();
        assert_eq!(answer.domain.as_str(), "ai");
        assert_eq!(answer.question_type, QuestionType::Technical);
    }
}
