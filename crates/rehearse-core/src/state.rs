//! Per-session interview state.
//!
//! One `InterviewState` belongs to one interview. It is created by
//! `FlowController::start`, mutated only by the controller, and can be
//! serialized by hosts that need to persist a session between answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Topic;
use crate::controller::Action;
use crate::model::{Domain, QuestionType};
use crate::score::ScoreResult;

/// Where the session is in its answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// A question is open.
    AwaitingAnswer,
    /// An answer was recorded and the controller is choosing the next step.
    Deciding,
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Prompt exactly as it was shown.
    pub question: String,
    /// Raw answer text.
    pub answer: String,
    pub score: ScoreResult,
    /// Topic the question belonged to.
    pub topic: String,
    pub question_type: QuestionType,
    /// When the answer was scored.
    pub recorded_at: DateTime<Utc>,
}

/// Count of decisions taken so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTally {
    pub transitions: u32,
    pub follow_ups: u32,
    pub guidance: u32,
}

impl DecisionTally {
    /// Count one decision.
    pub fn record(&mut self, action: Action) {
        match action {
            Action::Transition => self.transitions += 1,
            Action::FollowUp => self.follow_ups += 1,
            Action::Guidance => self.guidance += 1,
        }
    }

    /// All decisions, including manual skips.
    pub fn total(&self) -> u32 {
        self.transitions + self.follow_ups + self.guidance
    }
}

/// Mutable state of a single interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    id: Uuid,
    domain: Domain,
    started_at: DateTime<Utc>,
    follow_up_count: u32,
    topic_depth: u8,
    current_topic: String,
    current_question: String,
    question_type: QuestionType,
    phase: SessionPhase,
    history: Vec<HistoryEntry>,
    tally: DecisionTally,
}

impl InterviewState {
    pub(crate) fn new(domain: Domain, topic: &Topic, question: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain,
            started_at: Utc::now(),
            follow_up_count: 0,
            topic_depth: topic.depth,
            current_topic: topic.id.clone(),
            current_question: question,
            question_type: topic.question_type,
            phase: SessionPhase::AwaitingAnswer,
            history: Vec::new(),
            tally: DecisionTally::default(),
        }
    }

    /// Unique session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolved domain. Unknown tags are replaced by the default domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Follow-ups asked on the current topic.
    pub fn follow_up_count(&self) -> u32 {
        self.follow_up_count
    }

    /// Depth rank of the current topic, from the catalog.
    pub fn topic_depth(&self) -> u8 {
        self.topic_depth
    }

    /// Catalog id of the current topic.
    pub fn current_topic(&self) -> &str {
        &self.current_topic
    }

    /// The prompt the candidate is answering, as the host displayed it.
    pub fn current_question(&self) -> &str {
        &self.current_question
    }

    /// Question type of the current topic.
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Answered questions, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Decisions taken so far.
    pub fn tally(&self) -> DecisionTally {
        self.tally
    }

    pub(crate) fn begin_deciding(&mut self) {
        self.phase = SessionPhase::Deciding;
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Move to `topic`. Resets the follow-up counter.
    pub(crate) fn enter_topic(&mut self, topic: &Topic, question: String) {
        self.follow_up_count = 0;
        self.topic_depth = topic.depth;
        self.current_topic = topic.id.clone();
        self.question_type = topic.question_type;
        self.current_question = question;
    }

    /// Stay on the current topic with a follow-up question.
    pub(crate) fn enter_follow_up(&mut self, question: String) {
        self.follow_up_count += 1;
        self.current_question = question;
    }

    /// Stay on the current topic with a guidance prompt.
    pub(crate) fn enter_guidance(&mut self, prompt: String) {
        self.current_question = prompt;
    }

    pub(crate) fn finish_decision(&mut self, action: Action) {
        self.tally.record(action);
        self.phase = SessionPhase::AwaitingAnswer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, depth: u8) -> Topic {
        Topic {
            id: id.into(),
            title: id.into(),
            depth,
            question_type: QuestionType::Project,
            questions: vec!["q".into()],
        }
    }

    #[test]
    fn follow_up_and_topic_change() {
        let mut state = InterviewState::new(Domain::new("ai"), &topic("a", 1), "first?".into());
        assert_eq!(state.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(state.question_type(), QuestionType::Project);

        state.enter_follow_up("deeper?".into());
        state.enter_follow_up("deeper still?".into());
        assert_eq!(state.follow_up_count(), 2);
        assert_eq!(state.current_question(), "deeper still?");

        state.enter_topic(&topic("b", 3), "new?".into());
        assert_eq!(state.follow_up_count(), 0);
        assert_eq!(state.topic_depth(), 3);
        assert_eq!(state.current_topic(), "b");
    }

    #[test]
    fn tally_counts_actions() {
        let mut tally = DecisionTally::default();
        tally.record(Action::FollowUp);
        tally.record(Action::FollowUp);
        tally.record(Action::Guidance);
        assert_eq!(tally.follow_ups, 2);
        assert_eq!(tally.guidance, 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn state_serde_roundtrip() {
        let mut state = InterviewState::new(Domain::new("iot"), &topic("a", 2), "q?".into());
        state.record(HistoryEntry {
            question: "q?".into(),
            answer: "a".into(),
            score: ScoreResult::from_axes(50, 60, 70),
            topic: "a".into(),
            question_type: QuestionType::Technical,
            recorded_at: Utc::now(),
        });
        let json = serde_json::to_string(&state).unwrap();
        let restored: InterviewState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
