use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use ares::config::{LoggingConfig, ResearchConfig};
use ares::models::PipelineState;
use ares::utils::init_logger;
use ares::{ExtractionMode, ResearchPipeline};

/// Run one research iteration: theorize, analyze, experiment, critique.
#[derive(Debug, Parser)]
#[command(name = "ares", version, about)]
struct Cli {
    /// YAML configuration file (defaults to configs/config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Research problem to investigate
    #[arg(short, long)]
    problem: Option<String>,

    /// Gemini model to use for every agent
    #[arg(short, long)]
    model: Option<String>,

    /// Keep unnumbered lines when extracting hypotheses
    #[arg(long)]
    lenient: bool,

    /// Print the final pipeline state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match ResearchConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _log_guard = init_logger(&LoggingConfig::default());
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    if let Some(model) = cli.model {
        config.model_name = model;
    }
    if let Some(problem) = cli.problem {
        config.research_problem = problem;
    }
    if cli.lenient {
        config.extraction = ExtractionMode::Lenient;
    }

    let _log_guard = init_logger(&config.logging);
    info!(config = ?config, "Configuration loaded");

    let pipeline = match ResearchPipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!(error = %e, "Failed to initialize agents");
            return Err(e.into());
        }
    };

    let state = pipeline.run(&config.research_problem).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_summary(&state);
    }

    Ok(())
}

fn print_summary(state: &PipelineState) {
    println!("Research Problem: {}", state.research_problem);

    println!("\nGenerated Hypotheses:");
    for hypothesis in &state.hypotheses {
        println!("- {}", hypothesis);
    }

    println!("\nData Analysis Results:\n{}", state.analysis);
    println!("\nExperiment Results:\n{}", state.experiment_narrative);

    println!("\nRefined Hypotheses:");
    for hypothesis in &state.refined_hypotheses {
        println!("- {}", hypothesis);
    }
}
