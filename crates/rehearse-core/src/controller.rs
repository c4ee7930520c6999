//! Interview flow controller.
//!
//! The controller looks at a score and the session state and decides what
//! happens next: move to a new topic, probe the current topic with a
//! follow-up, or hand the candidate a structured outline. The rule table is
//! pure ([`evaluate_rules`]); [`FlowController`] applies the verdict to the
//! state and renders the next question.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRegistry, DomainCatalog, Topic};
use crate::lexicon::render;
use crate::model::{Answer, Domain, QuestionType};
use crate::score::{ScoreResult, CONTINUE_THRESHOLD};
use crate::state::{HistoryEntry, InterviewState};
use crate::traits::{choose, RandomSource, StdRandom};

/// Overall score that excuses a weak axis.
pub const EXCELLENT_OVERALL: u32 = 80;
/// Minimum per-axis score for a clean pass.
pub const AXIS_PASS: u32 = 60;
/// Technical depth that excuses a weak axis.
pub const OUTSTANDING_DEPTH: u32 = 80;
/// Lowest overall score that still earns a follow-up.
pub const FOLLOW_UP_FLOOR: u32 = 55;
/// Follow-ups allowed per topic.
pub const MAX_FOLLOW_UPS: u32 = 2;

const TARGETED_DEPTH: u32 = 70;
const TARGETED_COMPLETENESS: u32 = 70;

// ---------------------------------------------------------------------------
// Decision types
// ---------------------------------------------------------------------------

/// What the controller decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Transition,
    FollowUp,
    Guidance,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Transition => "transition",
            Action::FollowUp => "follow_up",
            Action::Guidance => "guidance",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Overall ≥ 70 and every axis ≥ 60.
    FullyMet,
    /// Overall ≥ 80 despite a weak axis.
    OverallExcellent,
    /// Technical depth ≥ 80 despite a weak axis.
    TechnicalDepthOutstanding,
    /// Overall ≥ 70 after the topic already had a follow-up.
    PostFollowUp,
    /// Overall ≥ 70 with a weak axis, first follow-up on the topic.
    TargetedFollowUp,
    /// Overall in `55..70` with follow-ups left.
    ModerateFollowUp,
    /// Overall below 55.
    LowScore,
    /// Overall in `55..70` but the follow-up budget is spent.
    FollowUpLimit,
    /// The host skipped the topic.
    ManualSkip,
}

/// The area a follow-up question probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpTarget {
    ImplementationDetail,
    ProjectExample,
    SolutionCompleteness,
    OptimizationDepth,
    TechnicalDetail,
    ProblemSolving,
    PerformanceImpact,
}

impl FollowUpTarget {
    pub const ALL: [FollowUpTarget; 7] = [
        FollowUpTarget::ImplementationDetail,
        FollowUpTarget::ProjectExample,
        FollowUpTarget::SolutionCompleteness,
        FollowUpTarget::OptimizationDepth,
        FollowUpTarget::TechnicalDetail,
        FollowUpTarget::ProblemSolving,
        FollowUpTarget::PerformanceImpact,
    ];

    /// Key used in the phrasebook and in serialized decisions.
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpTarget::ImplementationDetail => "implementation_detail",
            FollowUpTarget::ProjectExample => "project_example",
            FollowUpTarget::SolutionCompleteness => "solution_completeness",
            FollowUpTarget::OptimizationDepth => "optimization_depth",
            FollowUpTarget::TechnicalDetail => "technical_detail",
            FollowUpTarget::ProblemSolving => "problem_solving",
            FollowUpTarget::PerformanceImpact => "performance_impact",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FollowUpTarget::ImplementationDetail => "implementation detail",
            FollowUpTarget::ProjectExample => "a project example",
            FollowUpTarget::SolutionCompleteness => "solution completeness",
            FollowUpTarget::OptimizationDepth => "optimization depth",
            FollowUpTarget::TechnicalDetail => "technical detail",
            FollowUpTarget::ProblemSolving => "problem solving",
            FollowUpTarget::PerformanceImpact => "performance impact",
        }
    }
}

impl fmt::Display for FollowUpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The controller's output for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reason: DecisionReason,
    pub next_question: String,
    pub reasoning: String,
    /// Topic id the next question belongs to.
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_transition: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_area: Option<FollowUpTarget>,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Outcome of the rule table, before any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Transition(DecisionReason),
    FollowUp(FollowUpTarget, DecisionReason),
    Guidance(DecisionReason),
}

impl Verdict {
    pub fn action(&self) -> Action {
        match self {
            Verdict::Transition(_) => Action::Transition,
            Verdict::FollowUp(..) => Action::FollowUp,
            Verdict::Guidance(_) => Action::Guidance,
        }
    }
}

/// Apply the decision rules, in order, to a score and follow-up count.
pub fn evaluate_rules(score: &ScoreResult, follow_up_count: u32) -> Verdict {
    let overall = score.overall_score();
    let td = score.technical_depth();
    let ex = score.example_richness();
    let c = score.completeness();

    if overall >= CONTINUE_THRESHOLD {
        if td >= AXIS_PASS && ex >= AXIS_PASS && c >= AXIS_PASS {
            return Verdict::Transition(DecisionReason::FullyMet);
        }
        if overall >= EXCELLENT_OVERALL {
            return Verdict::Transition(DecisionReason::OverallExcellent);
        }
        if td >= OUTSTANDING_DEPTH {
            return Verdict::Transition(DecisionReason::TechnicalDepthOutstanding);
        }
        if follow_up_count == 0 {
            let target = if td < TARGETED_DEPTH {
                FollowUpTarget::ImplementationDetail
            } else if ex < AXIS_PASS {
                FollowUpTarget::ProjectExample
            } else if c < TARGETED_COMPLETENESS {
                FollowUpTarget::SolutionCompleteness
            } else {
                FollowUpTarget::OptimizationDepth
            };
            return Verdict::FollowUp(target, DecisionReason::TargetedFollowUp);
        }
        return Verdict::Transition(DecisionReason::PostFollowUp);
    }

    if overall >= FOLLOW_UP_FLOOR {
        if follow_up_count < MAX_FOLLOW_UPS {
            let target = if td < AXIS_PASS {
                FollowUpTarget::TechnicalDetail
            } else if ex < AXIS_PASS {
                FollowUpTarget::ProjectExample
            } else if c < AXIS_PASS {
                FollowUpTarget::ProblemSolving
            } else {
                FollowUpTarget::PerformanceImpact
            };
            return Verdict::FollowUp(target, DecisionReason::ModerateFollowUp);
        }
        return Verdict::Guidance(DecisionReason::FollowUpLimit);
    }

    Verdict::Guidance(DecisionReason::LowScore)
}

fn axes_summary(score: &ScoreResult) -> String {
    format!(
        "technical depth {}, example richness {}, completeness {}",
        score.technical_depth(),
        score.example_richness(),
        score.completeness()
    )
}

/// Plain-language justification for a verdict.
fn reasoning(score: &ScoreResult, verdict: Verdict, follow_up_count: u32) -> String {
    let overall = score.overall_score();
    let axes = axes_summary(score);
    match verdict {
        Verdict::Transition(DecisionReason::FullyMet) => format!(
            "Overall score {overall} reaches {CONTINUE_THRESHOLD} and every axis is at least \
             {AXIS_PASS} ({axes}). Moving to a new topic."
        ),
        Verdict::Transition(DecisionReason::OverallExcellent) => format!(
            "Overall score {overall} is {EXCELLENT_OVERALL} or more, which outweighs the weaker \
             axis ({axes}). Moving to a new topic."
        ),
        Verdict::Transition(DecisionReason::TechnicalDepthOutstanding) => format!(
            "Technical depth {} is outstanding and the overall score {overall} reaches \
             {CONTINUE_THRESHOLD} ({axes}). Moving to a new topic.",
            score.technical_depth()
        ),
        Verdict::Transition(_) => format!(
            "Overall score {overall} reaches {CONTINUE_THRESHOLD} after a follow-up on this \
             topic ({axes}). Moving to a new topic."
        ),
        Verdict::FollowUp(target, DecisionReason::TargetedFollowUp) => format!(
            "Overall score {overall} reaches {CONTINUE_THRESHOLD} but one axis is weak ({axes}). \
             Asking one follow-up about {}.",
            target.label()
        ),
        Verdict::FollowUp(target, _) => format!(
            "Overall score {overall} is between {FOLLOW_UP_FLOOR} and {} ({axes}). Follow-up {} \
             of {MAX_FOLLOW_UPS} asks about {}.",
            CONTINUE_THRESHOLD - 1,
            follow_up_count + 1,
            target.label()
        ),
        Verdict::Guidance(DecisionReason::FollowUpLimit) => format!(
            "Overall score {overall} is still below {CONTINUE_THRESHOLD} and the \
             {MAX_FOLLOW_UPS} follow-ups for this topic are used up ({axes}). Offering an \
             outline to structure the answer."
        ),
        Verdict::Guidance(_) if score.is_too_brief() => String::from(
            "The answer was too brief to evaluate. Offering an outline to structure the answer.",
        ),
        Verdict::Guidance(_) => format!(
            "Overall score {overall} is below {FOLLOW_UP_FLOOR} ({axes}). Offering an outline \
             to structure the answer."
        ),
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Applies the rule table to caller-owned interview state.
#[derive(Debug, Clone)]
pub struct FlowController<R: RandomSource = StdRandom> {
    registry: Arc<CatalogRegistry>,
    rng: R,
}

impl FlowController<StdRandom> {
    pub fn new(registry: Arc<CatalogRegistry>) -> Self {
        Self::with_random(registry, StdRandom::from_os())
    }
}

impl<R: RandomSource> FlowController<R> {
    pub fn with_random(registry: Arc<CatalogRegistry>, rng: R) -> Self {
        Self { registry, rng }
    }

    pub fn registry(&self) -> &Arc<CatalogRegistry> {
        &self.registry
    }

    /// Create the state for a new interview, positioned on a random topic.
    pub fn start(&mut self, domain: &Domain) -> InterviewState {
        let registry = Arc::clone(&self.registry);
        let catalog = registry.resolve(domain);
        let state = match self.draw(catalog) {
            Some((topic, question)) => {
                InterviewState::new(Domain::new(catalog.id()), topic, question)
            }
            None => {
                let topic = fallback_topic(catalog);
                let question = fallback_question(&topic.title);
                InterviewState::new(Domain::new(catalog.id()), &topic, question)
            }
        };
        tracing::info!(
            session = %state.id(),
            domain = state.domain().as_str(),
            topic = state.current_topic(),
            "interview started"
        );
        state
    }

    /// Decide the next step after `answer` was scored as `score`.
    ///
    /// The answer is recorded in the history before the decision is made.
    pub fn decide(
        &mut self,
        answer: &Answer,
        score: &ScoreResult,
        state: &mut InterviewState,
    ) -> Decision {
        state.begin_deciding();
        state.record(HistoryEntry {
            question: state.current_question().to_string(),
            answer: answer.text.clone(),
            score: score.clone(),
            topic: state.current_topic().to_string(),
            question_type: state.question_type(),
            recorded_at: Utc::now(),
        });

        let verdict = evaluate_rules(score, state.follow_up_count());
        let reasoning = reasoning(score, verdict, state.follow_up_count());

        let registry = Arc::clone(&self.registry);
        let catalog = registry.resolve(state.domain());
        let phrases = &registry.lexicon().phrases;
        let title = topic_title(catalog, state.current_topic());

        let decision = match verdict {
            Verdict::Transition(reason) => {
                let mut decision = self.transition(catalog, state, reason, reasoning);
                decision.auto_transition = Some(true);
                decision
            }
            Verdict::FollowUp(target, reason) => {
                let question = match choose(&mut self.rng, phrases.follow_up(target)) {
                    Some(template) => render(template, &[("topic", title.as_str())]),
                    None => fallback_question(&title),
                };
                state.enter_follow_up(question.clone());
                Decision {
                    action: Action::FollowUp,
                    reason,
                    next_question: question,
                    reasoning,
                    topic: state.current_topic().to_string(),
                    auto_transition: None,
                    target_area: Some(target),
                }
            }
            Verdict::Guidance(reason) => {
                let prompt = match choose(&mut self.rng, &phrases.guidance) {
                    Some(template) => render(template, &[("topic", title.as_str())]),
                    None => fallback_question(&title),
                };
                state.enter_guidance(prompt.clone());
                Decision {
                    action: Action::Guidance,
                    reason,
                    next_question: prompt,
                    reasoning,
                    topic: state.current_topic().to_string(),
                    auto_transition: None,
                    target_area: None,
                }
            }
        };

        state.finish_decision(decision.action);
        tracing::debug!(
            session = %state.id(),
            action = %decision.action,
            reason = ?decision.reason,
            overall = score.overall_score(),
            follow_ups = state.follow_up_count(),
            "decision made"
        );
        decision
    }

    /// Move to a new topic at the host's request.
    ///
    /// Nothing is added to the history.
    pub fn skip_topic(&mut self, state: &mut InterviewState) -> Decision {
        let registry = Arc::clone(&self.registry);
        let catalog = registry.resolve(state.domain());
        let reasoning = format!("Topic {} skipped on request.", state.current_topic());
        let mut decision = self.transition(catalog, state, DecisionReason::ManualSkip, reasoning);
        decision.auto_transition = Some(false);
        state.finish_decision(Action::Transition);
        decision
    }

    fn transition(
        &mut self,
        catalog: &DomainCatalog,
        state: &mut InterviewState,
        reason: DecisionReason,
        reasoning: String,
    ) -> Decision {
        let registry = Arc::clone(&self.registry);
        let phrases = &registry.lexicon().phrases;
        let next_question = match self.draw(catalog) {
            Some((topic, question)) => {
                let text = match choose(&mut self.rng, &phrases.transition) {
                    Some(template) => render(
                        template,
                        &[("topic", topic.title.as_str()), ("question", question.as_str())],
                    ),
                    None => question,
                };
                tracing::info!(
                    session = %state.id(),
                    from = state.current_topic(),
                    to = topic.id.as_str(),
                    reason = ?reason,
                    "topic transition"
                );
                state.enter_topic(topic, text.clone());
                text
            }
            None => state.current_question().to_string(),
        };

        Decision {
            action: Action::Transition,
            reason,
            next_question,
            reasoning,
            topic: state.current_topic().to_string(),
            auto_transition: None,
            target_area: None,
        }
    }

    /// Draw a topic and one of its questions. Repeats are allowed.
    fn draw<'c>(&mut self, catalog: &'c DomainCatalog) -> Option<(&'c Topic, String)> {
        let topic = choose(&mut self.rng, catalog.topics())?;
        let question = choose(&mut self.rng, &topic.questions)?;
        Some((topic, question.clone()))
    }
}

fn topic_title(catalog: &DomainCatalog, topic_id: &str) -> String {
    catalog
        .topic(topic_id)
        .map(|t| t.title.clone())
        .unwrap_or_else(|| topic_id.to_string())
}

fn fallback_topic(catalog: &DomainCatalog) -> Topic {
    Topic {
        id: catalog.id().to_string(),
        title: catalog.name().to_string(),
        depth: 1,
        question_type: QuestionType::Technical,
        questions: Vec::new(),
    }
}

fn fallback_question(title: &str) -> String {
    format!("Tell me about your hands-on experience with {title}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FixedRandom;

    fn registry() -> Arc<CatalogRegistry> {
        Arc::new(CatalogRegistry::builtin().unwrap())
    }

    fn controller() -> FlowController<FixedRandom> {
        FlowController::with_random(registry(), FixedRandom(0))
    }

    fn answer(text: &str) -> Answer {
        Answer::new(text, "ai", QuestionType::Technical)
    }

    #[test]
    fn rule_table_transitions() {
        let full = ScoreResult::from_axes(70, 70, 70);
        assert_eq!(
            evaluate_rules(&full, 0),
            Verdict::Transition(DecisionReason::FullyMet)
        );

        let excellent = ScoreResult::from_axes(95, 95, 40);
        assert_eq!(excellent.overall_score(), 81);
        assert_eq!(
            evaluate_rules(&excellent, 0),
            Verdict::Transition(DecisionReason::OverallExcellent)
        );

        let deep = ScoreResult::from_axes(85, 75, 45);
        assert_eq!(deep.overall_score(), 72);
        assert_eq!(
            evaluate_rules(&deep, 0),
            Verdict::Transition(DecisionReason::TechnicalDepthOutstanding)
        );
    }

    #[test]
    fn rule_table_targeted_follow_ups() {
        let shallow = ScoreResult::from_axes(65, 95, 55);
        assert_eq!(shallow.overall_score(), 73);
        assert_eq!(
            evaluate_rules(&shallow, 0),
            Verdict::FollowUp(
                FollowUpTarget::ImplementationDetail,
                DecisionReason::TargetedFollowUp
            )
        );

        let no_example = ScoreResult::from_axes(75, 90, 50);
        assert_eq!(no_example.overall_score(), 74);
        assert_eq!(
            evaluate_rules(&no_example, 0),
            Verdict::FollowUp(FollowUpTarget::ProjectExample, DecisionReason::TargetedFollowUp)
        );
        assert_eq!(
            evaluate_rules(&no_example, 1),
            Verdict::Transition(DecisionReason::PostFollowUp)
        );
    }

    #[test]
    fn rule_table_moderate_band() {
        let cases = [
            ((50, 70, 70), FollowUpTarget::TechnicalDetail),
            ((70, 70, 50), FollowUpTarget::ProjectExample),
            ((70, 50, 70), FollowUpTarget::ProblemSolving),
            ((65, 65, 65), FollowUpTarget::PerformanceImpact),
        ];
        for ((td, c, ex), target) in cases {
            let score = ScoreResult::from_axes(td, c, ex);
            assert!((55..70).contains(&score.overall_score()));
            assert_eq!(
                evaluate_rules(&score, 1),
                Verdict::FollowUp(target, DecisionReason::ModerateFollowUp)
            );
            assert_eq!(
                evaluate_rules(&score, 2),
                Verdict::Guidance(DecisionReason::FollowUpLimit)
            );
        }
    }

    #[test]
    fn low_scores_get_guidance() {
        let weak = ScoreResult::from_axes(50, 50, 50);
        assert_eq!(evaluate_rules(&weak, 0), Verdict::Guidance(DecisionReason::LowScore));
        assert_eq!(
            evaluate_rules(&ScoreResult::too_brief_answer(), 0),
            Verdict::Guidance(DecisionReason::LowScore)
        );
    }

    #[test]
    fn transition_guaranteed_after_follow_up() {
        for td in (0..=100).step_by(5) {
            for c in (0..=100).step_by(5) {
                for ex in (0..=100).step_by(5) {
                    let score = ScoreResult::from_axes(td, c, ex);
                    if score.overall_score() < CONTINUE_THRESHOLD {
                        continue;
                    }
                    for count in 1..=MAX_FOLLOW_UPS {
                        assert_eq!(
                            evaluate_rules(&score, count).action(),
                            Action::Transition,
                            "td={td} c={c} ex={ex} count={count}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn follow_up_count_never_exceeds_cap() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));
        for td in (0..=100).step_by(10) {
            for c in (0..=100).step_by(10) {
                let score = ScoreResult::from_axes(td, c, 60);
                controller.decide(&answer("some answer text"), &score, &mut state);
                assert!(state.follow_up_count() <= MAX_FOLLOW_UPS);
            }
        }
    }

    #[test]
    fn moderate_answer_follows_up_then_falls_back_to_guidance() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));
        let moderate = ScoreResult::from_axes(60, 60, 60);
        let topic = state.current_topic().to_string();

        let first = controller.decide(&answer("moderate"), &moderate, &mut state);
        assert_eq!(first.action, Action::FollowUp);
        assert_eq!(first.target_area, Some(FollowUpTarget::PerformanceImpact));
        assert_eq!(state.follow_up_count(), 1);

        let second = controller.decide(&answer("moderate"), &moderate, &mut state);
        assert_eq!(second.action, Action::FollowUp);
        assert_eq!(state.follow_up_count(), 2);

        let third = controller.decide(&answer("moderate"), &moderate, &mut state);
        assert_eq!(third.action, Action::Guidance);
        assert_eq!(third.reason, DecisionReason::FollowUpLimit);
        assert_eq!(state.follow_up_count(), 2);
        assert_eq!(state.current_topic(), topic);
        assert_eq!(state.history().len(), 3);
        assert_eq!(state.tally().follow_ups, 2);
        assert_eq!(state.tally().guidance, 1);
    }

    #[test]
    fn transition_resets_count_and_records_history() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));
        let first_question = state.current_question().to_string();

        controller.decide(&answer("moderate"), &ScoreResult::from_axes(60, 60, 60), &mut state);
        assert_eq!(state.follow_up_count(), 1);

        let decision =
            controller.decide(&answer("great"), &ScoreResult::from_axes(90, 90, 90), &mut state);
        assert_eq!(decision.action, Action::Transition);
        assert_eq!(decision.reason, DecisionReason::FullyMet);
        assert_eq!(decision.auto_transition, Some(true));
        assert_eq!(state.follow_up_count(), 0);
        assert!(decision.reasoning.contains("technical depth"));

        let history = state.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, first_question);
        assert_eq!(history[1].answer, "great");
    }

    #[test]
    fn transition_prompt_is_the_recorded_question() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));

        let decision =
            controller.decide(&answer("great"), &ScoreResult::from_axes(90, 90, 90), &mut state);
        assert_eq!(decision.action, Action::Transition);
        assert_eq!(state.current_question(), decision.next_question);

        let topic = registry()
            .resolve(&Domain::new("ai"))
            .topic(state.current_topic())
            .cloned()
            .unwrap();
        assert!(topic.questions.iter().any(|q| decision.next_question.contains(q.as_str())));

        controller.decide(&answer("next"), &ScoreResult::from_axes(20, 20, 20), &mut state);
        assert_eq!(state.history()[1].question, decision.next_question);
    }

    #[test]
    fn fixed_source_picks_first_topic() {
        let mut controller = controller();
        let state = controller.start(&Domain::new("ai"));
        let registry = registry();
        let first = &registry.resolve(&Domain::new("ai")).topics()[0];
        assert_eq!(state.current_topic(), first.id);
        assert_eq!(state.current_question(), first.questions[0]);
        assert_eq!(state.topic_depth(), first.depth);
    }

    #[test]
    fn unknown_domain_starts_on_default_catalog() {
        let mut controller = controller();
        let state = controller.start(&Domain::new("underwater-basket-weaving"));
        assert_eq!(state.domain().as_str(), "ai");
    }

    #[test]
    fn follow_up_question_names_topic() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));
        let registry = registry();
        let title = registry
            .resolve(&Domain::new("ai"))
            .topic(state.current_topic())
            .unwrap()
            .title
            .clone();
        let decision =
            controller.decide(&answer("moderate"), &ScoreResult::from_axes(60, 60, 60), &mut state);
        assert!(decision.next_question.contains(&title));
        assert_eq!(state.current_question(), decision.next_question);
    }

    #[test]
    fn skip_topic_is_manual_and_leaves_history_alone() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("iot"));
        controller.decide(&answer("moderate"), &ScoreResult::from_axes(60, 60, 60), &mut state);

        let decision = controller.skip_topic(&mut state);
        assert_eq!(decision.action, Action::Transition);
        assert_eq!(decision.reason, DecisionReason::ManualSkip);
        assert_eq!(decision.auto_transition, Some(false));
        assert_eq!(state.follow_up_count(), 0);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn seeded_controllers_agree() {
        let registry = registry();
        let mut a = FlowController::with_random(Arc::clone(&registry), StdRandom::seeded(7));
        let mut b = FlowController::with_random(Arc::clone(&registry), StdRandom::seeded(7));
        let mut sa = a.start(&Domain::new("bigdata"));
        let mut sb = b.start(&Domain::new("bigdata"));
        assert_eq!(sa.current_question(), sb.current_question());

        for score in [(90, 90, 90), (60, 60, 60), (20, 20, 20), (95, 95, 95)] {
            let score = ScoreResult::from_axes(score.0, score.1, score.2);
            let da = a.decide(&answer("text"), &score, &mut sa);
            let db = b.decide(&answer("text"), &score, &mut sb);
            assert_eq!(da, db);
        }
    }

    #[test]
    fn decision_serializes_snake_case() {
        let mut controller = controller();
        let mut state = controller.start(&Domain::new("ai"));
        let decision =
            controller.decide(&answer("moderate"), &ScoreResult::from_axes(60, 60, 60), &mut state);
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["action"], "follow_up");
        assert_eq!(json["target_area"], "performance_impact");
        assert!(json.get("auto_transition").is_none());
    }
}
