mod app;
mod config;
mod error;
mod extract;
mod handlers;
mod models;
mod state;
mod storage;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_core::auth::hash_password;
use bookshelf_core::models::User;
use bookshelf_core::storage::UserRepository;

use crate::{
    app::create_app,
    config::Config,
    state::{AppState, AuthConfig},
};

/// Bookshelf - CRUD API for users and books on DynamoDB
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let state = init_state(&config).await?;

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build application state over the DynamoDB backend.
///
/// Provisioning and the superuser bootstrap run eagerly when the store
/// is reachable. A failed connection is logged and tolerated: the
/// service stays up and repositories re-acquire the handle lazily
/// rather than crash-looping against a store that is still coming up.
#[cfg(feature = "dynamodb")]
async fn init_state(config: &Config) -> Result<AppState> {
    use std::sync::Arc;

    use crate::storage::dynamodb::{
        required_tables, ConnectionManager, ConnectionSettings, DynamoRepository,
        SchemaProvisioner,
    };

    let conn = Arc::new(ConnectionManager::new(ConnectionSettings::from_config(
        config,
    )));
    let repo = Arc::new(DynamoRepository::new(
        conn.clone(),
        &config.users_table,
        &config.books_table,
    ));

    match conn.acquire().await {
        Ok(_) => {
            let provisioner = SchemaProvisioner::new(
                conn.clone(),
                required_tables(&config.users_table, &config.books_table),
            );
            provisioner.ensure_schema().await?;
            bootstrap_first_superuser(config, repo.as_ref()).await?;
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                "store unreachable at startup; continuing without provisioning"
            );
        }
    }

    let auth = AuthConfig::new(config.secret_key.as_bytes(), config.access_token_ttl());
    Ok(AppState::new(repo.clone(), repo, auth))
}

/// Build application state over the in-memory backend.
#[cfg(all(feature = "inmemory", not(feature = "dynamodb")))]
async fn init_state(config: &Config) -> Result<AppState> {
    use std::sync::Arc;

    use crate::storage::inmemory::InMemoryRepository;

    let repo = Arc::new(InMemoryRepository::new());
    bootstrap_first_superuser(config, repo.as_ref()).await?;

    let auth = AuthConfig::new(config.secret_key.as_bytes(), config.access_token_ttl());
    Ok(AppState::new(repo.clone(), repo, auth))
}

/// Create the first superuser if configured and not already present.
///
/// Idempotent: the email index is checked before writing, so repeated
/// starts never produce a second account.
async fn bootstrap_first_superuser(config: &Config, users: &dyn UserRepository) -> Result<()> {
    let (Some(email), Some(password)) =
        (&config.first_superuser, &config.first_superuser_password)
    else {
        return Ok(());
    };

    if users.get_user_by_email(email).await?.is_none() {
        let user = User::new(email.clone(), hash_password(password)?)
            .with_full_name("Initial Superuser")
            .superuser();
        users.create_user(&user).await?;
        tracing::info!(user_id = %user.id, %email, "created initial superuser");
    }

    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
