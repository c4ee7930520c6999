//! rehearse CLI: practice interviews and score answers from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rehearse", version, about = "Interview answer scoring and practice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single answer
    Score {
        /// Answer text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the answer from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Domain tag (ai, bigdata, iot, ...)
        #[arg(long)]
        domain: Option<String>,

        /// Question type: technical, project, system_design, behavioral
        #[arg(long, default_value = "technical")]
        question_type: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Replay a scripted interview session
    Session {
        /// Path to a .toml session script
        #[arg(long)]
        script: PathBuf,

        /// Seed for topic and phrase selection
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for the session report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Do not write a session report
        #[arg(long)]
        no_save: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Interactive practice, one answer per line on stdin
    Practice {
        /// Domain tag (ai, bigdata, iot, ...)
        #[arg(long)]
        domain: Option<String>,

        /// Seed for topic and phrase selection
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List catalog topics
    Topics {
        /// Only list this domain
        #[arg(long)]
        domain: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate catalog TOML files
    Validate {
        /// Path to a catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create starter config and example catalog
    Init,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "rehearse_core=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            text,
            file,
            domain,
            question_type,
            format,
            config,
        } => commands::score::execute(text, file, domain, question_type, format, config),
        Commands::Session {
            script,
            seed,
            output,
            no_save,
            format,
            config,
        } => commands::session::execute(script, seed, output, no_save, format, config),
        Commands::Practice {
            domain,
            seed,
            config,
        } => commands::practice::execute(domain, seed, config),
        Commands::Topics { domain, config } => commands::topics::execute(domain, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
