//! Signal families, term sets and the shared lexicon.
//!
//! A *signal family* is a named set of case-insensitive patterns worth a
//! fixed number of points for every distinct pattern that matches. A *term
//! set* is a list of literal phrases (domain keywords, stack terms) matched
//! on word boundaries. The lexicon bundles the families for every scoring
//! axis together with the phrasebook used for follow-ups and rationales.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::controller::FollowUpTarget;
use crate::error::CatalogError;
use crate::rationale::QualityTier;

const BUILTIN_LEXICON: &str = include_str!("../catalogs/lexicon.toml");

// ---------------------------------------------------------------------------
// Signal families
// ---------------------------------------------------------------------------

/// Serialized form of a signal family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilySpec {
    /// Family name, used in logs and error messages.
    pub name: String,
    /// Points per distinct matching pattern.
    pub weight: u32,
    /// Case-insensitive regular expressions.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// A compiled signal family.
#[derive(Debug, Clone)]
pub struct SignalFamily {
    name: String,
    weight: u32,
    patterns: Vec<Regex>,
}

/// Points and matched text produced by scanning one or more families.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyHits {
    pub points: u32,
    /// Matched text, lowercased, in first-seen order without duplicates.
    pub matches: Vec<String>,
}

impl FamilyHits {
    fn absorb(&mut self, other: FamilyHits) {
        self.points = self.points.saturating_add(other.points);
        for m in other.matches {
            push_unique(&mut self.matches, m);
        }
    }
}

impl SignalFamily {
    /// Compile every pattern of `spec`. `\b` becomes an ASCII word boundary.
    pub fn compile(spec: &FamilySpec) -> Result<Self, CatalogError> {
        let patterns = spec
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(&ascii_boundaries(p))
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| CatalogError::InvalidPattern {
                        family: spec.name.clone(),
                        pattern: p.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: spec.name.clone(),
            weight: spec.weight,
            patterns,
        })
    }

    /// Name of the family.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Score `text`: `weight` points for each distinct pattern that matches.
    pub fn scan(&self, text: &str) -> FamilyHits {
        let mut hits = FamilyHits::default();
        for pattern in &self.patterns {
            if let Some(m) = pattern.find(text) {
                hits.points = hits.points.saturating_add(self.weight);
                push_unique(&mut hits.matches, m.as_str().trim().to_lowercase());
            }
        }
        hits
    }
}

/// Scan a group of families and cap the combined points.
pub fn scan_group(families: &[SignalFamily], text: &str, cap: u32) -> FamilyHits {
    let mut total = FamilyHits::default();
    for family in families {
        let hits = family.scan(text);
        if hits.points > 0 {
            tracing::trace!(family = family.name(), points = hits.points, "family matched");
        }
        total.absorb(hits);
    }
    total.points = total.points.min(cap);
    total
}

// ---------------------------------------------------------------------------
// Term sets
// ---------------------------------------------------------------------------

/// Literal phrases matched case-insensitively.
///
/// Terms that start or end with an ASCII letter or digit are anchored on ASCII
/// word boundaries at that end, so `ai` does not fire inside `maintain` but
/// `pytorch` still fires in `使用pytorch训练`. CJK terms match as plain
/// substrings.
#[derive(Debug, Clone, Default)]
pub struct TermSet {
    terms: Vec<(String, Regex)>,
}

impl TermSet {
    /// Compile `terms`. `label` names the set in error messages.
    pub fn compile<S: AsRef<str>>(label: &str, terms: &[S]) -> Result<Self, CatalogError> {
        let mut set = TermSet::default();
        for term in terms {
            set.insert(label, term.as_ref())?;
        }
        Ok(set)
    }

    /// Add a term. Blank terms and duplicates (ignoring case) are skipped.
    pub fn insert(&mut self, label: &str, term: &str) -> Result<(), CatalogError> {
        let normalized = term.trim().to_lowercase();
        if normalized.is_empty() || self.terms.iter().any(|(t, _)| *t == normalized) {
            return Ok(());
        }
        let pattern = term_pattern(&normalized);
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                family: label.to_string(),
                pattern,
                source,
            })?;
        self.terms.push((normalized, regex));
        Ok(())
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Normalized terms, in declaration order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(t, _)| t.as_str())
    }

    /// Distinct terms present in `text`, in declaration order.
    pub fn matches(&self, text: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(t, _)| t.clone())
            .collect()
    }
}

fn term_pattern(term: &str) -> String {
    let escaped = regex::escape(term);
    let lead = term.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let trail = term.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    format!(
        "{}{}{}",
        if lead { ASCII_BOUNDARY } else { "" },
        escaped,
        if trail { ASCII_BOUNDARY } else { "" }
    )
}

const ASCII_BOUNDARY: &str = r"(?-u:\b)";

/// Rewrite `\b` and `\B` as ASCII-only assertions.
///
/// Unicode boundaries treat CJK characters as word characters, so `\bkafka\b`
/// would never match in `使用kafka做消息队列`.
fn ascii_boundaries(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(b @ ('b' | 'B')) if chars.peek() != Some(&'{') => {
                out.push_str("(?-u:\\");
                out.push(b);
                out.push(')');
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

// ---------------------------------------------------------------------------
// Phrasebook
// ---------------------------------------------------------------------------

/// Follow-up templates, one list per target area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpPhrases {
    /// How something was built.
    pub implementation_detail: Vec<String>,
    /// A concrete project the candidate worked on.
    pub project_example: Vec<String>,
    /// The end-to-end arc of problem, solution and result.
    pub solution_completeness: Vec<String>,
    pub optimization_depth: Vec<String>,
    pub technical_detail: Vec<String>,
    pub problem_solving: Vec<String>,
    /// Measured effect of a change.
    pub performance_impact: Vec<String>,
}

/// Rationale openings, one list per quality tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningPhrases {
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub moderate: Vec<String>,
    pub needs_improvement: Vec<String>,
}

/// Phrase templates. `{topic}` and `{question}` are substituted at render
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phrasebook {
    /// Shown when moving to a new topic. Uses `{topic}` and `{question}`.
    pub transition: Vec<String>,
    /// Structured outlines for weak answers. Uses `{topic}`.
    pub guidance: Vec<String>,
    /// Follow-up questions per target area. Uses `{topic}`.
    pub follow_up: FollowUpPhrases,
    /// First sentence of a rationale, per quality tier.
    pub openings: OpeningPhrases,
}

impl Phrasebook {
    /// Templates for a follow-up on `target`.
    pub fn follow_up(&self, target: FollowUpTarget) -> &[String] {
        let p = &self.follow_up;
        match target {
            FollowUpTarget::ImplementationDetail => &p.implementation_detail,
            FollowUpTarget::ProjectExample => &p.project_example,
            FollowUpTarget::SolutionCompleteness => &p.solution_completeness,
            FollowUpTarget::OptimizationDepth => &p.optimization_depth,
            FollowUpTarget::TechnicalDetail => &p.technical_detail,
            FollowUpTarget::ProblemSolving => &p.problem_solving,
            FollowUpTarget::PerformanceImpact => &p.performance_impact,
        }
    }

    /// Rationale openings for `tier`.
    pub fn opening(&self, tier: QualityTier) -> &[String] {
        let p = &self.openings;
        match tier {
            QualityTier::Excellent => &p.excellent,
            QualityTier::Good => &p.good,
            QualityTier::Moderate => &p.moderate,
            QualityTier::NeedsImprovement => &p.needs_improvement,
        }
    }

    /// Every slot must offer at least one template.
    pub fn check(&self) -> Result<(), CatalogError> {
        let mut slots: Vec<(String, &[String])> = vec![
            (String::from("transition"), self.transition.as_slice()),
            (String::from("guidance"), self.guidance.as_slice()),
        ];
        for target in FollowUpTarget::ALL {
            slots.push((format!("follow_up.{}", target.as_str()), self.follow_up(target)));
        }
        for tier in QualityTier::ALL {
            slots.push((format!("openings.{}", tier.as_str()), self.opening(tier)));
        }

        match slots.into_iter().find(|(_, templates)| templates.is_empty()) {
            Some((slot, _)) => Err(CatalogError::MissingPhrases(slot)),
            None => Ok(()),
        }
    }
}

/// Replace `{key}` placeholders in `template`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    stack_terms: Vec<String>,
    technical: TechnicalSpec,
    completeness: CompletenessSpec,
    examples: ExampleSpec,
    phrases: Phrasebook,
}

#[derive(Debug, Deserialize)]
struct TechnicalSpec {
    #[serde(default)]
    implementation: Vec<FamilySpec>,
    #[serde(default)]
    concrete_detail: Vec<FamilySpec>,
    #[serde(default)]
    quantitative: Vec<FamilySpec>,
}

#[derive(Debug, Deserialize)]
struct CompletenessSpec {
    #[serde(default)]
    structure: Vec<FamilySpec>,
    #[serde(default)]
    problem_solving: Vec<FamilySpec>,
}

#[derive(Debug, Deserialize)]
struct ExampleSpec {
    #[serde(default)]
    project_experience: Vec<FamilySpec>,
    #[serde(default)]
    concrete_example: Vec<FamilySpec>,
}

/// The compiled shared lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Technical depth: architecture, tuning, debugging and similar.
    pub implementation: Vec<SignalFamily>,
    /// Technical depth: APIs, configuration, versions, monitoring.
    pub concrete_detail: Vec<SignalFamily>,
    /// Technical depth: numbers with units.
    pub quantitative: Vec<SignalFamily>,
    /// Completeness: sequencing words.
    pub structure: Vec<SignalFamily>,
    /// Completeness: problem, solution and result markers.
    pub problem_solving: Vec<SignalFamily>,
    /// Example richness: first-hand project experience.
    pub project_experience: Vec<SignalFamily>,
    /// Example richness: examples and incidents.
    pub concrete_example: Vec<SignalFamily>,
    /// Stack terms common to every domain, merged into each domain's set.
    pub stack_terms: Vec<String>,
    pub phrases: Phrasebook,
}

impl Lexicon {
    /// The lexicon shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_LEXICON, "builtin lexicon")
    }

    /// Parse and compile a lexicon file. `source_name` labels parse errors.
    pub fn from_toml(content: &str, source_name: &str) -> Result<Self, CatalogError> {
        let file: LexiconFile = toml::from_str(content).map_err(|e| CatalogError::Parse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        let compile_all = |specs: &[FamilySpec]| {
            specs
                .iter()
                .map(SignalFamily::compile)
                .collect::<Result<Vec<_>, _>>()
        };

        file.phrases.check()?;

        Ok(Self {
            implementation: compile_all(&file.technical.implementation)?,
            concrete_detail: compile_all(&file.technical.concrete_detail)?,
            quantitative: compile_all(&file.technical.quantitative)?,
            structure: compile_all(&file.completeness.structure)?,
            problem_solving: compile_all(&file.completeness.problem_solving)?,
            project_experience: compile_all(&file.examples.project_experience)?,
            concrete_example: compile_all(&file.examples.concrete_example)?,
            stack_terms: file.stack_terms,
            phrases: file.phrases,
        })
    }
}
