mod config;
mod db;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod rate_limit;
mod render;
mod routes;
mod state;
mod storage;
mod transform;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::export::ChromiumRenderer;
use crate::generation::batch::BatchConfig;
use crate::generation::enrichment::{EnrichmentOrchestrator, LlmEnrichmentProvider};
use crate::generation::pipeline::DocumentPipeline;
use crate::llm_client::LlmClient;
use crate::rate_limit::RedisRateLimiter;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::PgDocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Competence API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    info!("Database migrations applied");

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    let rate_limiter = Arc::new(RedisRateLimiter::new(redis, config.rate_limit_per_minute));
    info!(
        "Rate limiter initialized ({} requests/minute per candidate)",
        config.rate_limit_per_minute
    );

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let store = Arc::new(PgDocumentStore::new(
        db,
        s3,
        config.s3_bucket.clone(),
        config.artifact_base_url.clone(),
    ));
    info!("Document store initialized (bucket: {})", config.s3_bucket);

    // Initialize enrichment; absent credential only disables the enrichment path
    let enrichment = match config.anthropic_api_key.clone() {
        Some(api_key) => {
            let llm = LlmClient::new(api_key)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(EnrichmentOrchestrator::new(
                Arc::new(LlmEnrichmentProvider::new(llm)),
                BatchConfig {
                    max_in_flight: config.enrichment_max_in_flight,
                    timeout: config.enrichment_timeout,
                },
            ))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; requests that need AI enrichment will be rejected");
            None
        }
    };

    let renderer = Arc::new(ChromiumRenderer::new(
        config.chrome_bin.clone(),
        config.render_timeout,
    ));
    info!(
        "Renderer: {} (timeout {:?})",
        config.chrome_bin, config.render_timeout
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(DocumentPipeline::new(store, renderer, enrichment)),
        rate_limiter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "competence-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
