//! vitalrisk command line interface
//!
//! Shows the health dashboard, the assembled model inputs and the
//! diabetes-risk prediction for the configured provider, survey and model.

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vitalrisk_core::{
    assemble_features, run_prediction, FeatureVector, HealthSnapshot, ModelArtifact,
    PredictionState, Scorer,
};
use vitalrisk_health::{HealthDashboard, InMemoryHealthProvider};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "vitalrisk")]
#[command(about = "Diabetes-risk prediction from health readings", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/vitalrisk.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the health dashboard
    Metrics(SourceArgs),
    /// Show the 21 model inputs
    Features {
        #[command(flatten)]
        sources: SourceArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the diabetes-risk prediction
    Predict {
        #[command(flatten)]
        sources: SourceArgs,
        /// Model artifact path
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,
    },
    /// Print the canonical hash of a model artifact
    ModelHash {
        /// Model artifact path
        #[arg(long, value_name = "PATH")]
        model: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Health fixture seeding the provider
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,
    /// Survey answers (TOML or JSON)
    #[arg(long, value_name = "PATH")]
    survey: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config);

    match cli.command {
        Commands::Metrics(sources) => {
            let dashboard = connect_dashboard(&config, &sources).await?;
            for section in dashboard.render() {
                println!("{}", section);
            }
            dashboard.shutdown();
        }
        Commands::Features { sources, json } => {
            let snapshot = build_snapshot(&config, &sources).await?;
            let features = assemble_features(&snapshot);
            if json {
                println!("{}", serde_json::to_string_pretty(&features_json(&features))?);
            } else {
                for (name, value) in features.named() {
                    println!("{:<22}{}", name, value);
                }
            }
        }
        Commands::Predict { sources, model } => {
            let artifact = load_model(&config, model.as_deref())?;
            let snapshot = build_snapshot(&config, &sources).await?;
            let state = run_prediction(&snapshot, &artifact);
            println!("{}", state);
            if let PredictionState::Ready(prediction) = &state {
                if let Some(class) = prediction.class {
                    println!("{}", class.description());
                }
            }
        }
        Commands::ModelHash { model } => {
            let path = model.unwrap_or_else(|| config.model.path.clone());
            let artifact = ModelArtifact::load_json(&path)
                .with_context(|| format!("failed to load model {}", path.display()))?;
            println!("{}", artifact.hash_hex()?);
        }
    }

    Ok(())
}

/// `[{"name": .., "value": ..}, ...]` in vector order
fn features_json(features: &FeatureVector) -> Value {
    Value::Array(
        features
            .named()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect(),
    )
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // logs go to stderr so command output stays pipeable
    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

async fn connect_dashboard(config: &AppConfig, sources: &SourceArgs) -> Result<HealthDashboard> {
    let fixture = sources.fixture.as_ref().or(config.health.fixture.as_ref());
    let provider = match fixture {
        Some(path) => InMemoryHealthProvider::load_fixture(path)
            .with_context(|| format!("failed to load health fixture {}", path.display()))?,
        None => {
            info!("no health fixture configured; live values unavailable");
            InMemoryHealthProvider::new()
        }
    };

    let today = chrono::Local::now().date_naive();
    Ok(HealthDashboard::connect(Arc::new(provider), today).await)
}

/// Survey answers with live BMI, age and sex filling the gaps
async fn build_snapshot(config: &AppConfig, sources: &SourceArgs) -> Result<HealthSnapshot> {
    let survey = match sources.survey.as_ref().or(config.survey.path.as_ref()) {
        Some(path) => HealthSnapshot::load(path)
            .with_context(|| format!("failed to load survey {}", path.display()))?,
        None => HealthSnapshot::default(),
    };

    let dashboard = connect_dashboard(config, sources).await?;
    let snapshot = dashboard.state().feature_snapshot(&survey);
    dashboard.shutdown();
    debug!(?snapshot, "prediction inputs");
    Ok(snapshot)
}

fn load_model(config: &AppConfig, path: Option<&Path>) -> Result<ModelArtifact> {
    let path = path.unwrap_or(config.model.path.as_path());
    let artifact = ModelArtifact::load_json(path)
        .with_context(|| format!("failed to load model {}", path.display()))?;
    if let Some(expected) = &config.model.expected_hash {
        artifact.verify_hash(expected)?;
    }
    info!(
        kind = artifact.kind(),
        output = artifact.output_name(),
        path = %path.display(),
        "model loaded"
    );
    Ok(artifact)
}
