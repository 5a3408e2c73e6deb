use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use imdb_api::config::AppConfig;
use imdb_api::database::{DatabaseManager, PgIdentityStore};
use imdb_api::search::ElasticIndex;
use imdb_api::state::AppState;

#[derive(Parser)]
#[command(name = "imdb-api")]
#[command(about = "Movie catalogue API with Basic-auth accounts")]
#[command(version)]
struct Args {
    /// Environment files to load before reading configuration (default: .env)
    env_files: Vec<PathBuf>,

    /// Address to listen on, overrides IMDB_API_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::env::var("IMDB_ENV").as_deref() != Ok("PRODUCTION") {
        load_env_files(&args.env_files);
    }

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(bind) = args.bind {
        config.api.bind_addr = bind;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        "Starting imdb-api in {:?} mode with {} super-admin(s)",
        config.environment,
        config.security.super_admins.len()
    );

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to identity store")?;
    DatabaseManager::bootstrap(&pool, &config.security)
        .await
        .context("failed to bootstrap identity store")?;

    let index = ElasticIndex::new(&config.search).context("invalid search index configuration")?;

    let bind_addr = config.api.bind_addr.clone();
    let state = AppState::new(config, Arc::new(PgIdentityStore::new(pool)), Arc::new(index));
    let app = imdb_api::app::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("imdb-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn load_env_files(files: &[PathBuf]) {
    if files.is_empty() {
        if let Err(e) = dotenvy::dotenv() {
            eprintln!("No .env loaded: {}", e);
        }
        return;
    }
    for file in files {
        if let Err(e) = dotenvy::from_path(file) {
            eprintln!("Failed to load {}: {}", file.display(), e);
        }
    }
}
