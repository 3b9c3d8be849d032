use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use face_gateway::cli::{self, Cli, Commands};
use face_gateway::comparison::ComparisonClient;
use face_gateway::config::{Config, LogFormat};
use face_gateway::storage::AzureBlobClient;
use face_gateway::use_cases::CompareFaces;
use face_gateway::{adapters, create_app, middleware, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Config => {
            if !cli::handle_config_validate(&config) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    // One pool for all outbound HTTP; no timeout beyond reqwest's defaults.
    let http = reqwest::Client::new();

    let comparator = ComparisonClient::with_client(http.clone(), config.comparison_url.clone());
    tracing::info!("Comparison client initialized with URL: {}", comparator.url());

    let blob_store = AzureBlobClient::from_config(http, &config)?;
    tracing::info!(
        "Blob storage client initialized for container: {}",
        blob_store.container()
    );

    let transaction_store = adapters::transaction_store(&config).await?;

    let compare_faces = CompareFaces::new(
        Arc::new(comparator),
        Arc::new(blob_store),
        transaction_store,
    );
    let app_state = AppState::new(compare_faces, config.max_upload_bytes);

    let app = create_app(app_state).layer(middleware::cors_layer(
        config.cors_allowed_origins.as_deref(),
    )?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
