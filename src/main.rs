//! progressive-profile - consolidate a batch of assessments from a JSON file.
//!
//! ```text
//! progressive-profile assessments.json
//! PROGRESSIVE_PROFILE__STORAGE__BACKEND=filesystem progressive-profile in.json
//! ```

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use progressive_profile::adapters::{
    FsProfileStore, InMemoryProfileStore, PgProfileStore, TracingEventPublisher,
};
use progressive_profile::application::{
    ConsolidateAssessmentCommand, ConsolidateAssessmentHandler, GetProfileHandler,
    GetProfileQuery, ProfileView,
};
use progressive_profile::config::{AppConfig, ConfigError, LoggingConfig, StorageBackend};
use progressive_profile::domain::assessment::Assessment;
use progressive_profile::domain::consolidation::ProfileConsolidator;
use progressive_profile::domain::foundation::DomainError;
use progressive_profile::ports::ProfileStore;

/// Progressive profile consolidation
#[derive(Parser)]
#[command(name = "progressive-profile")]
#[command(about = "Consolidate learning assessments into learning profiles", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file holding an array of assessments, applied in order
    input: PathBuf,

    /// YAML configuration file
    #[arg(short, long, env = "PROGRESSIVE_PROFILE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed assessments file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{rejected} of {total} assessments were rejected")]
    Rejected { rejected: usize, total: usize },
}

fn init_tracing(logging: &LoggingConfig, json: bool) {
    // stdout carries the profile output
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    if json || logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn ProfileStore>, CliError> {
    let store: Arc<dyn ProfileStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryProfileStore::new()),
        StorageBackend::Filesystem => Arc::new(FsProfileStore::new(&config.storage.data_dir)),
        StorageBackend::Postgres => {
            let database = config.database.clone().unwrap_or_default();
            let store = PgProfileStore::new(database.connect().await?);
            if database.run_migrations {
                store.migrate().await?;
            }
            Arc::new(store)
        }
    };
    tracing::info!(backend = %config.storage.backend, "Profile store ready");
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.json_logs);
    config
        .validate()
        .map_err(|e| CliError::Config(ConfigError::ValidationFailed(e)))?;

    let policy = config.consolidation.build_policy()?;
    let store = build_store(&config).await?;
    let handler = ConsolidateAssessmentHandler::new(
        store.clone(),
        Arc::new(TracingEventPublisher::new()),
        ProfileConsolidator::new(policy),
    )
    .with_max_save_retries(config.storage.max_save_retries);
    let reader = GetProfileHandler::new(store);

    let raw = tokio::fs::read_to_string(&cli.input)
        .await
        .map_err(|source| CliError::Input {
            path: cli.input.display().to_string(),
            source,
        })?;
    let assessments: Vec<Assessment> = serde_json::from_str(&raw)?;
    let total = assessments.len();

    let mut touched = BTreeSet::new();
    let mut rejected = 0;
    for assessment in assessments {
        let assessment_id = assessment.id;
        match handler
            .handle(ConsolidateAssessmentCommand { assessment })
            .await
        {
            Ok(result) => {
                touched.insert(result.profile.id());
            }
            Err(err) => {
                rejected += 1;
                tracing::error!(
                    assessment_id = %assessment_id,
                    code = %err.code,
                    error = %err,
                    "Assessment rejected"
                );
            }
        }
    }

    let mut views: Vec<ProfileView> = Vec::with_capacity(touched.len());
    for id in touched {
        views.push(reader.handle(GetProfileQuery::ById(id)).await?);
    }
    println!("{}", serde_json::to_string_pretty(&views)?);

    if rejected > 0 {
        return Err(CliError::Rejected { rejected, total });
    }
    Ok(())
}
