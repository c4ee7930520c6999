//! Session report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Domain;
use crate::state::{HistoryEntry, InterviewState};
use crate::statistics::{compute_session_stats, SessionStats};

/// Transcript and statistics of a finished interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier.
    pub id: Uuid,
    pub domain: Domain,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every answered question, oldest first.
    pub history: Vec<HistoryEntry>,
    pub stats: SessionStats,
}

impl SessionReport {
    /// Snapshot `state` as a report finished now.
    pub fn from_state(state: &InterviewState) -> Self {
        Self {
            id: state.id(),
            domain: state.domain().clone(),
            started_at: state.started_at(),
            finished_at: Utc::now(),
            history: state.history().to_vec(),
            stats: compute_session_stats(state),
        }
    }

    /// Default file name, `session-<id>.json`.
    pub fn file_name(&self) -> String {
        format!("session-{}.json", self.id)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRegistry;
    use crate::controller::FlowController;
    use crate::model::{Answer, QuestionType};
    use crate::score::ScoreResult;
    use crate::traits::FixedRandom;
    use std::sync::Arc;

    fn played_state() -> InterviewState {
        let registry = Arc::new(CatalogRegistry::builtin().unwrap());
        let mut controller = FlowController::with_random(registry, FixedRandom(1));
        let mut state = controller.start(&Domain::new("bigdata"));
        for (td, c, ex) in [(60, 60, 60), (90, 80, 85), (30, 20, 10)] {
            let answer = Answer::new("an answer", "bigdata", QuestionType::Technical);
            controller.decide(&answer, &ScoreResult::from_axes(td, c, ex), &mut state);
        }
        state
    }

    #[test]
    fn report_reflects_state() {
        let state = played_state();
        let report = SessionReport::from_state(&state);
        assert_eq!(report.id, state.id());
        assert_eq!(report.domain.as_str(), "bigdata");
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.stats.answers, 3);
        assert_eq!(report.stats.decisions.total(), 3);
        assert!(report.finished_at >= report.started_at);
        assert!(report.file_name().starts_with("session-"));
    }

    #[test]
    fn json_roundtrip() {
        let report = SessionReport::from_state(&played_state());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(report.file_name());

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = SessionReport::load_json(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
