//! The `rehearse practice` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use rehearse_core::session::NoopObserver;
use rehearse_core::InterviewSession;

use super::session::{print_turn, SKIP};
use super::{load_registry, pick_domain, stats_table};

const QUIT: &str = ":quit";

pub fn execute(
    domain: Option<String>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, registry) = load_registry(config_path.as_deref())?;
    let domain = pick_domain(&registry, &config, domain.as_deref());

    let mut session_config = config.session_config();
    session_config.seed = seed.or(config.seed);

    let mut session = InterviewSession::new(registry, &domain, &session_config);
    eprintln!("Answer each question on one line. {SKIP} skips the topic, {QUIT} or EOF ends.\n");
    println!("Q: {}", session.current_question());

    let stdin = std::io::stdin();
    let mut turn = 0;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read answer from stdin")?;
        match line.trim() {
            QUIT => break,
            SKIP => {
                let decision = session.skip_topic();
                println!("Q: {}", decision.next_question);
            }
            _ => {
                turn += 1;
                let question = session.current_question().to_string();
                let outcome = session.submit(&line, &NoopObserver);
                print_turn(turn, &question, &line, &outcome);
            }
        }
    }

    let report = session.finish(&NoopObserver);
    println!("{}", stats_table(&report.stats));
    Ok(())
}
