//! avaliador CLI - scores a restaurant from its reviews
//!
//! Usage: `avaliador "Qual é a avaliação do Estação Barão?"`
//!
//! Prints exactly one line on stdout. Logs go to stderr.

use anyhow::Context;
use avaliador::config::{ConfigLoader, ConfigOverrides};
use avaliador::pipeline::processing_error_message;
use avaliador::provider::build_chat_model;
use avaliador::{Pipeline, PipelineOutcome};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "avaliador")]
#[command(about = "Composite restaurant score from free-text reviews", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Natural-language question naming the restaurant
    query: String,

    /// Extra config file, applied after ~/.avaliador/avaliador.toml and ./avaliador.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Review corpus file
    #[arg(short, long)]
    reviews: Option<PathBuf>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// Provider: openai, ollama
    #[arg(short, long)]
    provider: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider.clone(),
            model: self.model.clone(),
            reviews: self.reviews.clone(),
            ..Default::default()
        }
    }
}

async fn evaluate(cli: &Cli) -> anyhow::Result<PipelineOutcome> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_explicit_path(path);
    }

    let config = loader.load(&cli.overrides()).await.context("loading configuration")?;
    config.validate()?;

    let model = build_chat_model(&config)?;
    let pipeline = Pipeline::new(&config, model).await?;
    Ok(pipeline.run(&cli.query).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loaded before the config so OPENAI_API_KEY can come from .env
    let dotenv = dotenvy::dotenv();

    if let Err(e) = tooling::logging::init_tracing(cli.verbose) {
        eprintln!("warning: {}", e);
    }
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }

    match evaluate(&cli).await {
        Ok(outcome) => println!("{}", outcome),
        Err(e) => {
            let detail = format!("{:#}", e);
            error!(error = %detail, "Pipeline aborted");
            println!("{}", processing_error_message(&detail));
        }
    }

    Ok(())
}
