//! Interview session orchestrator.
//!
//! Wires the scorer, the flow controller and the rationale generator together
//! for one interview: every submitted answer runs Score → Decide → Explain
//! against the session's own state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogRegistry;
use crate::controller::{Decision, FlowController};
use crate::model::{Answer, Domain};
use crate::rationale::RationaleGenerator;
use crate::report::SessionReport;
use crate::score::ScoreResult;
use crate::scorer::{LexicalScorer, DEFAULT_MIN_ANSWER_CHARS};
use crate::state::InterviewState;
use crate::traits::{RandomSource, StdRandom};

/// Configuration for an interview session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Answers shorter than this are not scored.
    pub min_answer_chars: usize,
    /// Seed for topic draws and phrase selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_answer_chars: DEFAULT_MIN_ANSWER_CHARS,
            seed: None,
        }
    }
}

/// Everything produced for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub score: ScoreResult,
    pub decision: Decision,
    pub rationale: String,
}

/// Progress reporting trait.
pub trait SessionObserver {
    fn on_answer_scored(&self, question: &str, score: &ScoreResult);
    fn on_decision(&self, decision: &Decision, rationale: &str);
    fn on_session_complete(&self, report: &SessionReport);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_answer_scored(&self, _: &str, _: &ScoreResult) {}
    fn on_decision(&self, _: &Decision, _: &str) {}
    fn on_session_complete(&self, _: &SessionReport) {}
}

/// One running interview.
pub struct InterviewSession<R: RandomSource = StdRandom> {
    scorer: LexicalScorer,
    controller: FlowController<R>,
    rationale: RationaleGenerator<R>,
    state: InterviewState,
}

impl InterviewSession<StdRandom> {
    /// Start a session on `domain`.
    ///
    /// With a seed, the rationale generator uses `seed + 1` so it does not
    /// mirror the controller's draws.
    pub fn new(registry: Arc<CatalogRegistry>, domain: &Domain, config: &SessionConfig) -> Self {
        let (controller_rng, rationale_rng) = match config.seed {
            Some(seed) => (StdRandom::seeded(seed), StdRandom::seeded(seed.wrapping_add(1))),
            None => (StdRandom::from_os(), StdRandom::from_os()),
        };
        Self::with_random(registry, domain, config, controller_rng, rationale_rng)
    }
}

impl<R: RandomSource> InterviewSession<R> {
    pub fn with_random(
        registry: Arc<CatalogRegistry>,
        domain: &Domain,
        config: &SessionConfig,
        controller_rng: R,
        rationale_rng: R,
    ) -> Self {
        let scorer = LexicalScorer::new(Arc::clone(&registry))
            .with_min_answer_chars(config.min_answer_chars);
        let mut controller = FlowController::with_random(Arc::clone(&registry), controller_rng);
        let rationale = RationaleGenerator::with_random(registry, rationale_rng);
        let state = controller.start(domain);
        Self {
            scorer,
            controller,
            rationale,
            state,
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    /// The question the candidate should answer next.
    pub fn current_question(&self) -> &str {
        self.state.current_question()
    }

    /// Score an answer to the current question and decide what comes next.
    pub fn submit(&mut self, text: &str, observer: &dyn SessionObserver) -> TurnOutcome {
        let answer = Answer::new(text, self.state.domain().clone(), self.state.question_type());
        let score = self.scorer.score(&answer);
        observer.on_answer_scored(self.state.current_question(), &score);

        let decision = self.controller.decide(&answer, &score, &mut self.state);
        let rationale = self.rationale.explain(&score, &decision);
        observer.on_decision(&decision, &rationale);

        TurnOutcome {
            score,
            decision,
            rationale,
        }
    }

    /// Abandon the current topic and move to another one.
    pub fn skip_topic(&mut self) -> Decision {
        self.controller.skip_topic(&mut self.state)
    }

    /// End the session and build its report.
    pub fn finish(self, observer: &dyn SessionObserver) -> SessionReport {
        let report = SessionReport::from_state(&self.state);
        tracing::info!(
            session = %report.id,
            domain = report.domain.as_str(),
            answers = report.stats.answers,
            avg_overall = report.stats.averages.overall,
            "interview finished"
        );
        observer.on_session_complete(&report);
        report
    }
}
