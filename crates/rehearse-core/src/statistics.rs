//! Session statistics.
//!
//! Summaries over the answers of one interview: per-axis averages, best and
//! worst answers, the decision tally, topic coverage and a score trend.

use serde::{Deserialize, Serialize};

use crate::state::{DecisionTally, HistoryEntry, InterviewState};

/// Difference in average overall score (first half vs second half) below
/// which the trend counts as steady.
pub const TREND_BAND: f64 = 5.0;

/// Direction of the overall score across a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Steady,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Steady => "steady",
            Trend::Declining => "declining",
        }
    }
}

/// Averages of each score axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisAverages {
    pub technical_depth: f64,
    pub completeness: f64,
    pub example_richness: f64,
    pub problem_solving: f64,
    pub overall: f64,
}

/// Statistics for one interview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of answers scored.
    pub answers: usize,
    /// Answers that fell below the minimum length.
    pub too_brief: usize,
    pub averages: AxisAverages,
    /// Highest overall score, if any answer was given.
    pub best_overall: Option<u32>,
    /// Lowest overall score, if any answer was given.
    pub worst_overall: Option<u32>,
    pub decisions: DecisionTally,
    /// Topic ids in the order they were first answered.
    pub topics_covered: Vec<String>,
    pub trend: Trend,
}

/// Compute statistics for the answers recorded in `state`.
pub fn compute_session_stats(state: &InterviewState) -> SessionStats {
    stats_from_history(state.history(), state.tally())
}

pub(crate) fn stats_from_history(history: &[HistoryEntry], tally: DecisionTally) -> SessionStats {
    let answers = history.len();
    let mut topics_covered: Vec<String> = Vec::new();
    for entry in history {
        if !topics_covered.contains(&entry.topic) {
            topics_covered.push(entry.topic.clone());
        }
    }

    let overall: Vec<u32> = history.iter().map(|e| e.score.overall_score()).collect();

    SessionStats {
        answers,
        too_brief: history.iter().filter(|e| e.score.is_too_brief()).count(),
        averages: averages(history),
        best_overall: overall.iter().copied().max(),
        worst_overall: overall.iter().copied().min(),
        decisions: tally,
        topics_covered,
        trend: trend(&overall),
    }
}

fn averages(history: &[HistoryEntry]) -> AxisAverages {
    if history.is_empty() {
        return AxisAverages::default();
    }
    let n = history.len() as f64;
    let mean =
        |f: &dyn Fn(&HistoryEntry) -> u32| history.iter().map(|e| f(e) as f64).sum::<f64>() / n;

    AxisAverages {
        technical_depth: mean(&|e| e.score.technical_depth()),
        completeness: mean(&|e| e.score.completeness()),
        example_richness: mean(&|e| e.score.example_richness()),
        problem_solving: mean(&|e| e.score.problem_solving()),
        overall: mean(&|e| e.score.overall_score()),
    }
}

/// Compare the mean of the first half of `scores` with the second half.
///
/// With an odd count the middle score belongs to neither half.
pub fn trend(scores: &[u32]) -> Trend {
    if scores.len() < 2 {
        return Trend::Steady;
    }
    let half = scores.len() / 2;
    let mean = |s: &[u32]| s.iter().map(|&v| v as f64).sum::<f64>() / s.len() as f64;
    let first = mean(&scores[..half]);
    let second = mean(&scores[scores.len() - half..]);
    let delta = second - first;

    if delta > TREND_BAND {
        Trend::Improving
    } else if delta < -TREND_BAND {
        Trend::Declining
    } else {
        Trend::Steady
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionType;
    use crate::score::ScoreResult;
    use chrono::Utc;

    fn entry(topic: &str, score: ScoreResult) -> HistoryEntry {
        HistoryEntry {
            question: "q".into(),
            answer: "a".into(),
            score,
            topic: topic.into(),
            question_type: QuestionType::Technical,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn trend_needs_two_scores() {
        assert_eq!(trend(&[]), Trend::Steady);
        assert_eq!(trend(&[90]), Trend::Steady);
    }

    #[test]
    fn trend_direction() {
        assert_eq!(trend(&[40, 50, 70, 80]), Trend::Improving);
        assert_eq!(trend(&[80, 70, 50]), Trend::Declining);
        assert_eq!(trend(&[60, 62, 64, 63]), Trend::Steady);
    }

    #[test]
    fn trend_band_is_exclusive() {
        assert_eq!(trend(&[60, 65]), Trend::Steady);
        assert_eq!(trend(&[60, 66]), Trend::Improving);
    }

    #[test]
    fn empty_history() {
        let stats = stats_from_history(&[], DecisionTally::default());
        assert_eq!(stats.answers, 0);
        assert_eq!(stats.best_overall, None);
        assert_eq!(stats.averages, AxisAverages::default());
        assert_eq!(stats.trend, Trend::Steady);
    }

    #[test]
    fn stats_over_history() {
        let history = vec![
            entry("a", ScoreResult::from_axes(50, 50, 50)),
            entry("a", ScoreResult::too_brief_answer()),
            entry("b", ScoreResult::from_axes(90, 90, 90)),
            entry("a", ScoreResult::from_axes(70, 70, 70)),
        ];
        let tally = DecisionTally {
            transitions: 2,
            follow_ups: 1,
            guidance: 1,
        };
        let stats = stats_from_history(&history, tally);

        assert_eq!(stats.answers, 4);
        assert_eq!(stats.too_brief, 1);
        assert_eq!(stats.best_overall, Some(90));
        assert_eq!(stats.worst_overall, Some(0));
        assert_eq!(stats.topics_covered, vec!["a", "b"]);
        assert_eq!(stats.decisions.transitions, 2);
        assert!((stats.averages.overall - 52.5).abs() < 1e-9);
        assert_eq!(stats.trend, Trend::Improving);
    }
}
