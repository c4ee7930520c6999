//! Score value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of every axis and of the overall score.
pub const MAX_SCORE: u32 = 100;

/// Overall score at or above which the candidate may move on.
pub const CONTINUE_THRESHOLD: u32 = 70;
/// Overall score at or above which a follow-up is still worthwhile.
pub const FOLLOW_UP_THRESHOLD: u32 = 45;

/// Content signals detected while scoring, kept for the rationale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    #[serde(default)]
    pub technical_terms: Vec<String>,
    #[serde(default)]
    pub stack_terms: Vec<String>,
    #[serde(default)]
    pub project_markers: Vec<String>,
    #[serde(default)]
    pub problem_solving_markers: Vec<String>,
}

impl Signals {
    pub fn is_empty(&self) -> bool {
        self.technical_terms.is_empty()
            && self.stack_terms.is_empty()
            && self.project_markers.is_empty()
            && self.problem_solving_markers.is_empty()
    }
}

/// The scorer's verdict on one answer.
///
/// Axes are clamped to `0..=100` and the overall score is always derived
/// from them. Deserializing recomputes the overall score, so a stored value
/// can never drift from the axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScoreRecord")]
pub struct ScoreResult {
    technical_depth: u32,
    completeness: u32,
    example_richness: u32,
    overall_score: u32,
    too_brief: bool,
    signals: Signals,
}

#[derive(Deserialize)]
struct ScoreRecord {
    #[serde(default)]
    technical_depth: u32,
    #[serde(default)]
    completeness: u32,
    #[serde(default)]
    example_richness: u32,
    #[serde(default)]
    too_brief: bool,
    #[serde(default)]
    signals: Signals,
}

impl From<ScoreRecord> for ScoreResult {
    fn from(record: ScoreRecord) -> Self {
        let mut score = ScoreResult::from_axes(
            record.technical_depth,
            record.completeness,
            record.example_richness,
        )
        .with_signals(record.signals);
        score.too_brief = record.too_brief;
        score
    }
}

impl ScoreResult {
    /// Build a score from the three measured axes.
    pub fn from_axes(technical_depth: u32, completeness: u32, example_richness: u32) -> Self {
        let technical_depth = technical_depth.min(MAX_SCORE);
        let completeness = completeness.min(MAX_SCORE);
        let example_richness = example_richness.min(MAX_SCORE);
        Self {
            technical_depth,
            completeness,
            example_richness,
            overall_score: overall(technical_depth, completeness, example_richness),
            too_brief: false,
            signals: Signals::default(),
        }
    }

    /// The all-zero score given to answers below the minimum length.
    pub fn too_brief_answer() -> Self {
        Self {
            too_brief: true,
            ..Self::from_axes(0, 0, 0)
        }
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }

    pub fn technical_depth(&self) -> u32 {
        self.technical_depth
    }

    pub fn completeness(&self) -> u32 {
        self.completeness
    }

    pub fn example_richness(&self) -> u32 {
        self.example_richness
    }

    pub fn overall_score(&self) -> u32 {
        self.overall_score
    }

    /// Derived problem-solving term: `completeness × 0.6 + technical depth × 0.4`.
    pub fn problem_solving(&self) -> u32 {
        (6 * self.completeness + 4 * self.technical_depth + 5) / 10
    }

    pub fn axis(&self, axis: Axis) -> u32 {
        match axis {
            Axis::TechnicalDepth => self.technical_depth,
            Axis::ExampleRichness => self.example_richness,
            Axis::Completeness => self.completeness,
            Axis::ProblemSolving => self.problem_solving(),
        }
    }

    pub fn is_too_brief(&self) -> bool {
        self.too_brief
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn should_continue(&self) -> bool {
        self.overall_score >= CONTINUE_THRESHOLD
    }

    pub fn needs_follow_up(&self) -> bool {
        (FOLLOW_UP_THRESHOLD..CONTINUE_THRESHOLD).contains(&self.overall_score)
    }

    pub fn should_restart(&self) -> bool {
        self.overall_score < FOLLOW_UP_THRESHOLD
    }
}

/// Weighted overall score.
///
/// `td×0.30 + ex×0.25 + (c×0.6 + td×0.4)×0.25 + c×0.20`, which expands to
/// `(40·td + 25·ex + 35·c) / 100`. Completeness is counted twice, once
/// directly and once through the problem-solving term. Integer arithmetic
/// keeps the half-up rounding exact.
pub fn overall(technical_depth: u32, completeness: u32, example_richness: u32) -> u32 {
    let hundredths = 40 * technical_depth + 25 * example_richness + 35 * completeness;
    ((hundredths + 50) / 100).min(MAX_SCORE)
}

/// A score dimension shown in breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    TechnicalDepth,
    ExampleRichness,
    Completeness,
    ProblemSolving,
}

impl Axis {
    /// Breakdown order.
    pub const ALL: [Axis; 4] = [
        Axis::TechnicalDepth,
        Axis::ExampleRichness,
        Axis::Completeness,
        Axis::ProblemSolving,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::TechnicalDepth => "technical depth",
            Axis::ExampleRichness => "example richness",
            Axis::Completeness => "completeness",
            Axis::ProblemSolving => "problem solving",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-axis tier marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTier {
    Strong,
    Adequate,
    Weak,
}

impl AxisTier {
    pub fn of(value: u32) -> Self {
        match value {
            v if v >= 80 => AxisTier::Strong,
            v if v >= 60 => AxisTier::Adequate,
            _ => AxisTier::Weak,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AxisTier::Strong => "strong",
            AxisTier::Adequate => "adequate",
            AxisTier::Weak => "weak",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(td: u32, c: u32, ex: u32) -> f64 {
        let (td, c, ex) = (td as f64, c as f64, ex as f64);
        td * 0.30 + ex * 0.25 + (c * 0.6 + td * 0.4) * 0.25 + c * 0.20
    }

    #[test]
    fn overall_matches_weighted_formula() {
        for td in (0..=100).step_by(7) {
            for c in (0..=100).step_by(11) {
                for ex in (0..=100).step_by(13) {
                    let score = ScoreResult::from_axes(td, c, ex);
                    let expected = reference(td, c, ex);
                    let diff = (score.overall_score() as f64 - expected).abs();
                    assert!(diff <= 0.5 + 1e-9, "td={td} c={c} ex={ex}: {diff}");
                }
            }
        }
    }

    #[test]
    fn overall_known_values() {
        assert_eq!(ScoreResult::from_axes(80, 50, 60).overall_score(), 65);
        assert_eq!(ScoreResult::from_axes(100, 100, 100).overall_score(), 100);
        assert_eq!(ScoreResult::from_axes(0, 0, 0).overall_score(), 0);
    }

    #[test]
    fn axes_are_clamped() {
        let score = ScoreResult::from_axes(250, 101, 999);
        assert_eq!(score.technical_depth(), 100);
        assert_eq!(score.completeness(), 100);
        assert_eq!(score.example_richness(), 100);
        assert_eq!(score.overall_score(), 100);
    }

    #[test]
    fn raising_one_axis_never_lowers_overall() {
        for base in (0..=100).step_by(5) {
            for bump in 1..=10 {
                let raised = (base + bump).min(100);
                let b = ScoreResult::from_axes(base, base, base).overall_score();
                assert!(ScoreResult::from_axes(raised, base, base).overall_score() >= b);
                assert!(ScoreResult::from_axes(base, raised, base).overall_score() >= b);
                assert!(ScoreResult::from_axes(base, base, raised).overall_score() >= b);
            }
        }
    }

    #[test]
    fn derived_flags() {
        assert!(ScoreResult::from_axes(100, 100, 100).should_continue());
        let middling = ScoreResult::from_axes(60, 60, 60);
        assert_eq!(middling.overall_score(), 60);
        assert!(middling.needs_follow_up());
        assert!(!middling.should_continue());
        assert!(ScoreResult::too_brief_answer().should_restart());
    }

    #[test]
    fn problem_solving_term() {
        assert_eq!(ScoreResult::from_axes(50, 80, 0).problem_solving(), 68);
        assert_eq!(ScoreResult::from_axes(100, 100, 0).problem_solving(), 100);
    }

    #[test]
    fn deserialize_recomputes_overall() {
        let json = r#"{"technical_depth":80,"completeness":50,"example_richness":60,"overall_score":3}"#;
        let score: ScoreResult = serde_json::from_str(json).unwrap();
        assert_eq!(score.overall_score(), 65);
        assert!(!score.is_too_brief());
    }

    #[test]
    fn axis_tiers() {
        assert_eq!(AxisTier::of(80), AxisTier::Strong);
        assert_eq!(AxisTier::of(79), AxisTier::Adequate);
        assert_eq!(AxisTier::of(60), AxisTier::Adequate);
        assert_eq!(AxisTier::of(59), AxisTier::Weak);
    }
}
