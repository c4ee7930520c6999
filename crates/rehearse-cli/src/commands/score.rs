//! The `rehearse score` command.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use rehearse_core::{Answer, LexicalScorer, QuestionType};

use super::{load_registry, pick_domain, score_table};

pub fn execute(
    text: Option<String>,
    file: Option<PathBuf>,
    domain: Option<String>,
    question_type: String,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answer from {}", path.display()))?,
        (None, None) => anyhow::bail!("either --text or --file is required"),
    };

    let question_type = QuestionType::from_str(&question_type).unwrap_or_else(|e| {
        tracing::warn!("{e}, scoring as technical");
        QuestionType::Technical
    });

    let (config, registry) = load_registry(config_path.as_deref())?;
    let domain = pick_domain(&registry, &config, domain.as_deref());
    let catalog_id = registry.resolve(&domain).id().to_string();

    let scorer = LexicalScorer::new(registry).with_min_answer_chars(config.min_answer_chars);
    let score = scorer.score(&Answer::new(text, domain, question_type));

    match format.as_str() {
        "json" => {
            let value = serde_json::json!({
                "domain": catalog_id,
                "question_type": question_type,
                "score": score,
                "problem_solving": score.problem_solving(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        _ => {
            println!("Domain: {catalog_id} ({question_type})");
            if score.is_too_brief() {
                println!(
                    "Answer too brief to evaluate (minimum {} characters).",
                    scorer.min_answer_chars()
                );
                return Ok(());
            }
            println!("{}", score_table(&score));

            let signals = score.signals();
            if signals.is_empty() {
                println!("No content signals detected.");
            } else {
                println!("Signals:");
                for (label, found) in [
                    ("technical terms", &signals.technical_terms),
                    ("technology stack", &signals.stack_terms),
                    ("project experience", &signals.project_markers),
                    ("problem solving", &signals.problem_solving_markers),
                ] {
                    if !found.is_empty() {
                        println!("  {label}: {}", found.join(", "));
                    }
                }
            }
        }
    }

    Ok(())
}
