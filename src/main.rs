// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use study_buddy::utils::logging::{
    format_error, format_info, format_phase, format_success, format_warning,
};
use study_buddy::{Config, PipelineError, PipelineOrchestrator};
use tracing::info;

#[derive(Parser)]
#[command(name = "study_buddy")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Generate study questions from a PDF and answer them with retrieval", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: questions, index and answers
    Run {
        /// Answer only the first N generated questions
        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        /// LLM provider (openai or gemini)
        #[arg(long)]
        provider: Option<String>,

        /// Report file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load and split the input PDF, then print chunk counts
    Split,

    /// Generate questions only and print or save them
    Questions {
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let label = match err.downcast_ref::<PipelineError>() {
            Some(pipeline_err) => match pipeline_err.phase() {
                Some(phase) => format!("Error {}: {}", phase, pipeline_err),
                None => format!("Error: {:#}", err),
            },
            None => format!("Error: {:#}", err),
        };
        eprintln!("{}", format_error(&label));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    colored::control::set_override(cli.color);

    let config = load_config(&cli.config)?;
    study_buddy::utils::logging::init_logger(
        cli.color,
        cli.verbose,
        config.splitter.suppress_warnings,
    );

    info!("Study Buddy RAG Pipeline");
    info!("Loaded configuration from: {}", cli.config.display());

    match cli.command.unwrap_or(Commands::Run {
        limit: None,
        provider: None,
        output: None,
    }) {
        Commands::Run {
            limit,
            provider,
            output,
        } => {
            let mut config = config;
            if limit.is_some() {
                config.input.question_limit = limit;
            }
            if let Some(provider) = provider {
                config.provider.kind = provider;
            }
            if let Some(output) = output {
                config.answers.output_path = output;
            }
            config.validate()?;
            cmd_run(config).await?;
        }
        Commands::Split => {
            cmd_split(config).await?;
        }
        Commands::Questions { output, provider } => {
            let mut config = config;
            if let Some(provider) = provider {
                config.provider.kind = provider;
            }
            config.validate()?;
            cmd_questions(config, output.as_deref()).await?;
        }
    }

    Ok(())
}

// Runs before the logger exists, so the notice goes straight to stderr.
fn load_config(path: &Path) -> Result<Config> {
    if let Some(notice) = missing_config_notice(path) {
        eprintln!("{}", format_warning(&notice));
    }
    Config::load(Some(path)).context("Failed to load configuration")
}

fn missing_config_notice(path: &Path) -> Option<String> {
    (!path.exists()).then(|| {
        format!(
            "Config file {} not found, using defaults and environment",
            path.display()
        )
    })
}

async fn cmd_run(config: Config) -> Result<()> {
    let orchestrator = PipelineOrchestrator::new(config);
    let stats = orchestrator.run().await?;

    info!(
        "Answered {} questions ({} failed) in {}s ({:.2} questions/sec)",
        stats.questions_answered,
        stats.questions_failed,
        stats.duration_secs,
        stats.questions_per_second()
    );

    if stats.questions_failed > 0 {
        println!(
            "{}",
            format_info(&format!(
                "{} questions skipped after errors ({:.0}% answered)",
                stats.questions_failed,
                stats.success_rate()
            ))
        );
    }

    Ok(())
}

async fn cmd_split(config: Config) -> Result<()> {
    let orchestrator = PipelineOrchestrator::new(config);
    let path = orchestrator.input_path()?.to_path_buf();

    println!("{}", format_phase(1, &format!("Processing file: {}", path.display())));
    let document = orchestrator.load_documents(&path).await?;

    println!(
        "{}",
        format_phase(
            2,
            &format!(
                "Loaded {} question chunks and {} answer chunks from {} pages",
                document.question_chunks.len(),
                document.answer_chunks.len(),
                document.page_count
            )
        )
    );

    for chunk in &document.question_chunks {
        let children = document
            .answer_chunks
            .iter()
            .filter(|a| a.metadata.parent == Some(chunk.metadata.ordinal))
            .count();
        println!(
            "\tquestion chunk {}: {} tokens, {} answer chunks",
            chunk.metadata.ordinal, chunk.metadata.token_count, children
        );
    }

    Ok(())
}

async fn cmd_questions(config: Config, output: Option<&Path>) -> Result<()> {
    let orchestrator = PipelineOrchestrator::new(config);
    let (_, questions) = orchestrator.generate_only().await?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &questions)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format_success(&format!("Questions saved to {}", path.display()))
            );
        }
        None => println!("{}", questions.trim_end()),
    }

    Ok(())
}
