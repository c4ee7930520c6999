//! The `rehearse session` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use rehearse_core::controller::Decision;
use rehearse_core::report::SessionReport;
use rehearse_core::session::{NoopObserver, SessionObserver, TurnOutcome};
use rehearse_core::{InterviewSession, ScoreResult};

use super::{indent, load_registry, pick_domain, stats_table};

/// Answer that skips the current topic instead of being scored.
pub const SKIP: &str = ":skip";

/// A scripted session.
#[derive(Debug, Deserialize)]
struct SessionScript {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    answers: Vec<String>,
}

fn load_script(path: &Path) -> Result<SessionScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session script: {}", path.display()))?;
    let script: SessionScript = toml::from_str(&content)
        .with_context(|| format!("failed to parse session script: {}", path.display()))?;
    anyhow::ensure!(!script.answers.is_empty(), "session script has no answers");
    Ok(script)
}

/// Console progress observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_answer_scored(&self, _question: &str, score: &ScoreResult) {
        eprintln!(
            "  Scored: overall {} (technical depth {}, example richness {}, completeness {})",
            score.overall_score(),
            score.technical_depth(),
            score.example_richness(),
            score.completeness()
        );
    }

    fn on_decision(&self, decision: &Decision, _rationale: &str) {
        eprintln!("  Decision: {} ({:?})", decision.action, decision.reason);
    }

    fn on_session_complete(&self, report: &SessionReport) {
        eprintln!(
            "\nComplete: {} answers, average overall {:.1}",
            report.stats.answers, report.stats.averages.overall
        );
    }
}

pub fn execute(
    script_path: PathBuf,
    seed: Option<u64>,
    output: Option<PathBuf>,
    no_save: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let script = load_script(&script_path)?;
    let (config, registry) = load_registry(config_path.as_deref())?;
    let domain = pick_domain(&registry, &config, script.domain.as_deref());

    let mut session_config = config.session_config();
    session_config.seed = seed.or(script.seed).or(config.seed);

    let json = format == "json";
    let observer: &dyn SessionObserver = if json { &NoopObserver } else { &ConsoleObserver };

    let mut session = InterviewSession::new(registry, &domain, &session_config);
    for (i, answer) in script.answers.iter().enumerate() {
        let question = session.current_question().to_string();
        if answer.trim() == SKIP {
            let decision = session.skip_topic();
            if !json {
                println!("[{}] Q: {question}", i + 1);
                println!("    (skipped)");
                println!("    Next: {}\n", decision.next_question);
            }
            continue;
        }
        let outcome = session.submit(answer, observer);
        if !json {
            print_turn(i + 1, &question, answer, &outcome);
        }
    }

    let report = session.finish(observer);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", stats_table(&report.stats));
        if !report.stats.topics_covered.is_empty() {
            println!("Topics covered: {}", report.stats.topics_covered.join(", "));
        }
    }

    if !no_save {
        let dir = output.unwrap_or(config.output_dir);
        let path = dir.join(report.file_name());
        report.save_json(&path)?;
        eprintln!("Session saved to: {}", path.display());
    }

    Ok(())
}

/// Print one question, answer and outcome.
pub fn print_turn(number: usize, question: &str, answer: &str, outcome: &TurnOutcome) {
    println!("[{number}] Q: {question}");
    println!("    A: {}", answer.trim());
    println!(
        "    Decision: {} (overall {})",
        outcome.decision.action,
        outcome.score.overall_score()
    );
    println!("{}", indent(&outcome.rationale, "    "));
    println!("    Next: {}\n", outcome.decision.next_question);
}
