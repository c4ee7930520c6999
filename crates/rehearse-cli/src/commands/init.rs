//! The `rehearse init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("rehearse.toml").exists() {
        println!("rehearse.toml already exists, skipping.");
    } else {
        std::fs::write("rehearse.toml", SAMPLE_CONFIG)?;
        println!("Created rehearse.toml");
    }

    for (dir, file, content) in [
        ("catalogs", "catalogs/example.toml", EXAMPLE_CATALOG),
        ("sessions", "sessions/example.toml", EXAMPLE_SCRIPT),
    ] {
        std::fs::create_dir_all(dir)?;
        if Path::new(file).exists() {
            println!("{file} already exists, skipping.");
        } else {
            std::fs::write(file, content)?;
            println!("Created {file}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Edit catalogs/example.toml with your own topics");
    println!("  2. Run: rehearse validate --catalog catalogs");
    println!("  3. Run: rehearse session --script sessions/example.toml");
    println!("  4. Run: rehearse practice --domain backend");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# rehearse configuration

# Domain used when none is given, and for unknown domain tags.
default_domain = "ai"

# Extra catalogs loaded on top of the builtin ai, bigdata and iot catalogs.
catalog_dir = "catalogs"

# Answers shorter than this many characters are not scored.
min_answer_chars = 10

# Where session reports are written.
output_dir = "./rehearse-sessions"

# Uncomment for reproducible topic and phrase selection.
# seed = 42
"#;

const EXAMPLE_CATALOG: &str = r#"keywords = [
    "http", "rest", "api", "database", "index", "transaction", "cache",
    "load balancer", "message queue", "idempotent", "rate limit", "schema",
]
stack_terms = ["postgres", "rabbitmq", "kafka", "django", "spring", "express"]

[domain]
id = "backend"
name = "Backend Engineering"
description = "Services, storage and APIs"

[[topics]]
id = "api-design"
title = "API design"
depth = 1
question_type = "technical"
questions = [
    "How do you design a REST API that stays backward compatible?",
    "How would you make a payment endpoint idempotent?",
]

[[topics]]
id = "data-layer"
title = "the data layer"
depth = 2
question_type = "project"
questions = [
    "Describe a slow query you fixed. How did you find it?",
]
"#;

const EXAMPLE_SCRIPT: &str = r#"domain = "backend"
seed = 7
answers = [
    "We used an idempotency key stored in Postgres with a unique index, so retries of the same request return the first result.",
    "In my project the API latency dropped from 300 ms to 40 ms after we added a Redis cache and a composite index.",
    ":skip",
    "",
]
"#;
