//! Rationale generator.
//!
//! Explains a score and the decision taken on it in plain text: a quality
//! tier, the per-axis breakdown, the signals the scorer found, and a closing
//! statement a reader can check against the numbers. Only the opening phrase
//! is chosen at random.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogRegistry;
use crate::controller::{
    Action, Decision, DecisionReason, FollowUpTarget, EXCELLENT_OVERALL, FOLLOW_UP_FLOOR,
    MAX_FOLLOW_UPS, OUTSTANDING_DEPTH,
};
use crate::score::{Axis, AxisTier, ScoreResult, CONTINUE_THRESHOLD};
use crate::traits::{choose, RandomSource, StdRandom};

/// Overall-score band that selects the opening phrase set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// 85 and above.
    Excellent,
    /// 75 to 84.
    Good,
    /// 60 to 74.
    Moderate,
    /// Below 60.
    NeedsImprovement,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Excellent,
        QualityTier::Good,
        QualityTier::Moderate,
        QualityTier::NeedsImprovement,
    ];

    /// Tier for an overall score.
    pub fn of(overall: u32) -> Self {
        match overall {
            o if o >= 85 => QualityTier::Excellent,
            o if o >= 75 => QualityTier::Good,
            o if o >= 60 => QualityTier::Moderate,
            _ => QualityTier::NeedsImprovement,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "excellent",
            QualityTier::Good => "good",
            QualityTier::Moderate => "moderate",
            QualityTier::NeedsImprovement => "needs_improvement",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::NeedsImprovement => "needs improvement",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const TOO_BRIEF: &str = "The answer was too brief to evaluate. Describe what you worked on, \
                         how you approached it and what came out of it.";

/// Builds explanations for scored answers.
#[derive(Debug, Clone)]
pub struct RationaleGenerator<R: RandomSource = StdRandom> {
    registry: Arc<CatalogRegistry>,
    rng: R,
}

impl RationaleGenerator<StdRandom> {
    /// Generator with an OS-seeded random source.
    pub fn new(registry: Arc<CatalogRegistry>) -> Self {
        Self::with_random(registry, StdRandom::from_os())
    }
}

impl<R: RandomSource> RationaleGenerator<R> {
    /// Generator drawing opening phrases from `rng`.
    pub fn with_random(registry: Arc<CatalogRegistry>, rng: R) -> Self {
        Self { registry, rng }
    }

    /// Explain `score` and the `decision` taken on it.
    pub fn explain(&mut self, score: &ScoreResult, decision: &Decision) -> String {
        if score.is_too_brief() {
            return format!("{TOO_BRIEF}\n\n{}", strategy_statement(score, decision));
        }

        let tier = QualityTier::of(score.overall_score());
        let openings = self.registry.lexicon().phrases.opening(tier);
        let opening = choose(&mut self.rng, openings)
            .map(String::as_str)
            .unwrap_or("Answer reviewed.");

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{opening} Overall score {}/100 ({}).",
            score.overall_score(),
            tier.label()
        );

        out.push_str("\nScore breakdown:\n");
        for axis in Axis::ALL {
            let value = score.axis(axis);
            let _ = writeln!(out, "  - {axis}: {value} ({})", AxisTier::of(value).as_str());
        }

        out.push_str("\nDetected signals:\n");
        let signals = score.signals();
        if signals.is_empty() {
            out.push_str("  - none found\n");
        } else {
            for (label, found) in [
                ("technical terms", &signals.technical_terms),
                ("technology stack", &signals.stack_terms),
                ("project experience", &signals.project_markers),
                ("problem solving", &signals.problem_solving_markers),
            ] {
                if !found.is_empty() {
                    let _ = writeln!(out, "  - {label}: {}", found.join(", "));
                }
            }
        }

        let strengths = axes_where(score, |v| AxisTier::of(v) == AxisTier::Strong);
        let gaps = axes_where(score, |v| AxisTier::of(v) == AxisTier::Weak);
        if !strengths.is_empty() || !gaps.is_empty() {
            out.push('\n');
        }
        if !strengths.is_empty() {
            let _ = writeln!(out, "Strengths: {}.", strengths.join(", "));
        }
        if !gaps.is_empty() {
            let _ = writeln!(out, "To improve: {}.", gaps.join(", "));
        }

        out.push('\n');
        out.push_str(&strategy_statement(score, decision));
        out
    }
}

fn axes_where(score: &ScoreResult, keep: impl Fn(u32) -> bool) -> Vec<&'static str> {
    Axis::ALL
        .into_iter()
        .filter(|axis| keep(score.axis(*axis)))
        .map(|axis| axis.label())
        .collect()
}

/// The axis a follow-up target addresses, if it maps to one.
fn target_axis(target: FollowUpTarget) -> Option<Axis> {
    match target {
        FollowUpTarget::ImplementationDetail | FollowUpTarget::TechnicalDetail => {
            Some(Axis::TechnicalDepth)
        }
        FollowUpTarget::ProjectExample => Some(Axis::ExampleRichness),
        FollowUpTarget::SolutionCompleteness | FollowUpTarget::ProblemSolving => {
            Some(Axis::Completeness)
        }
        FollowUpTarget::OptimizationDepth | FollowUpTarget::PerformanceImpact => None,
    }
}

/// One sentence naming the chosen action and the numbers behind it.
pub fn strategy_statement(score: &ScoreResult, decision: &Decision) -> String {
    let overall = score.overall_score();
    match (decision.action, decision.reason) {
        (_, DecisionReason::ManualSkip) => {
            String::from("Next step: a new topic, because this one was skipped.")
        }
        (Action::Transition, DecisionReason::FullyMet) => format!(
            "Next step: a new topic, because the overall score {overall} is at least \
             {CONTINUE_THRESHOLD} and no axis is below 60."
        ),
        (Action::Transition, DecisionReason::OverallExcellent) => format!(
            "Next step: a new topic, because the overall score {overall} is at least \
             {EXCELLENT_OVERALL}."
        ),
        (Action::Transition, DecisionReason::TechnicalDepthOutstanding) => format!(
            "Next step: a new topic, because technical depth {} is at least {OUTSTANDING_DEPTH} \
             and the overall score {overall} is at least {CONTINUE_THRESHOLD}.",
            score.technical_depth()
        ),
        (Action::Transition, _) => format!(
            "Next step: a new topic, because the overall score {overall} is at least \
             {CONTINUE_THRESHOLD} and this topic already had a follow-up."
        ),
        (Action::FollowUp, _) => {
            let target = decision
                .target_area
                .unwrap_or(FollowUpTarget::PerformanceImpact);
            match target_axis(target) {
                Some(axis) => format!(
                    "Next step: a follow-up on {}, because {axis} scored {}.",
                    target.label(),
                    score.axis(axis)
                ),
                None => format!(
                    "Next step: a follow-up on {}, because the overall score {overall} is below \
                     {CONTINUE_THRESHOLD}.",
                    target.label()
                ),
            }
        }
        (Action::Guidance, DecisionReason::FollowUpLimit) => format!(
            "Next step: a structured outline, because the overall score {overall} is still below \
             {CONTINUE_THRESHOLD} after {MAX_FOLLOW_UPS} follow-ups."
        ),
        (Action::Guidance, _) => format!(
            "Next step: a structured outline, because the overall score {overall} is below \
             {FOLLOW_UP_FLOOR}."
        ),
    }
}
