/// Melos Server - streaming proxy for the Melos player
use clap::{Parser, Subcommand};
use melos_catalog::ClientVariant;
use melos_server::{config::ServerConfig, create_router, state::AppState};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melos-server")]
#[command(about = "Melos streaming proxy server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Resolve a track to its stream candidates and print them
    Resolve {
        /// Track identifier
        video_id: String,

        /// Client identity to resolve as (android, web_remix, ios, tv, web);
        /// tries them all in fallback order when omitted
        #[arg(short, long)]
        client: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melos_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Resolve {
            video_id,
            client,
            config,
        } => resolve(&video_id, client.as_deref(), config.as_deref()).await,
    }
}

async fn serve(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    tracing::info!("Starting Melos Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Upstream: {}", config.upstream.base_url);

    let addr = SocketAddr::from((config.server.host.parse::<IpAddr>()?, config.server.port));
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn resolve(
    video_id: &str,
    client: Option<&str>,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;
    let state = AppState::from_config(config)?;

    let candidates = match client {
        Some(name) => {
            let variant: ClientVariant = name.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            state.catalog.resolve_streams(video_id, variant).await?
        }
        None => state.catalog.resolve_any(video_id).await?,
    };

    if candidates.is_empty() {
        println!("No playable streams for {}", video_id);
        return Ok(());
    }

    println!("Streams for {}:", video_id);
    for candidate in &candidates {
        println!("  {}  {}", candidate.mime_type, candidate.url);
    }
    if let Some(best) = melos_catalog::select_preferred(&candidates) {
        println!("Preferred: {}", best.mime_type);
    }

    Ok(())
}
