use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use screen_delivery::auth::hash_password;
use screen_delivery::config;
use screen_delivery::database::DatabaseManager;
use screen_delivery::{app, AppState};

#[derive(Parser)]
#[command(name = "screen-delivery")]
#[command(about = "Server-driven UI schemas and content for mobile clients")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print a bcrypt hash for seeding a user row")]
    HashPassword {
        #[arg(help = "Plain-text password")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    info!("Starting screen-delivery in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to run migrations")?;

    let state = AppState::from_config(config, pool).context("invalid security configuration")?;
    state
        .images
        .ensure_directories()
        .await
        .with_context(|| format!("failed to create {}", state.images.root().display()))?;

    let sweeper = state.schemas.spawn_sweeper(config.schema.sweep_interval());
    let session_purge = spawn_session_purge(state.clone(), Duration::from_secs(3600));

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!(
        "Listening on http://{} (schemas from {})",
        bind_addr,
        config.schema.base_path.display()
    );

    axum::serve(listener, app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.abort();
    session_purge.abort();
    info!("Server stopped");
    Ok(())
}

/// Expired sessions are never honoured; this only reclaims the rows
fn spawn_session_purge(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match state.auth.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(n) => info!("Purged {} expired sessions", n),
                Err(e) => warn!("Session purge failed: {}", e),
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
