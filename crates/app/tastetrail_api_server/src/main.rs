//! TasteTrail API server binary.
//!
//! Picks a storage mode once at startup (PostgreSQL when reachable, memory
//! otherwise), optionally ensures a bootstrap administrator, and serves the
//! HTTP API until interrupted.

use std::time::Duration;

use clap::Parser;
use tastetrail_api::config::{AdminBootstrap, ApiConfig};
use tastetrail_core::mode::select_store;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "info,tastetrail_api=debug,tastetrail_core=debug";

/// CLI arguments for the API server.
///
/// Each flag overrides the matching environment variable read by
/// [`ApiConfig::from_env`].
#[derive(Parser, Debug)]
#[command(name = "tastetrail_api_server", about = "TasteTrail recipe API server")]
struct Args {
    /// Address to listen on [env: BIND_ADDR] [default: 127.0.0.1:5000].
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL [env: DATABASE_URL]. Without one the server
    /// runs in ephemeral mode.
    #[arg(long)]
    database_url: Option<String>,

    /// Seconds to wait for the initial database connection [env: DB_CONNECT_TIMEOUT_SECS].
    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    /// Maximum number of database connections in the pool [env: DB_MAX_CONNECTIONS].
    #[arg(long)]
    max_connections: Option<u32>,

    /// Email of the administrator to ensure at startup [env: ADMIN_EMAIL].
    #[arg(long)]
    admin_email: Option<String>,

    /// Password used if the administrator has to be created [env: ADMIN_PASSWORD].
    #[arg(long)]
    admin_password: Option<String>,

    /// Display name of the administrator [env: ADMIN_NAME].
    #[arg(long)]
    admin_name: Option<String>,
}

impl Args {
    /// Apply command-line overrides on top of an environment-derived config.
    fn apply(self, config: &mut ApiConfig) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(url) = self.database_url {
            config.database_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        let (email, password, name) = match config.admin.take() {
            Some(a) => (Some(a.email), Some(a.password), Some(a.name)),
            None => (None, None, None),
        };
        config.admin = AdminBootstrap::from_parts(
            self.admin_email.or(email),
            self.admin_password.or(password),
            self.admin_name.or(name),
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    args.apply(&mut config);

    info!(
        bind_addr = %config.bind_addr,
        database_configured = config.database_url.is_some(),
        "starting tastetrail_api_server"
    );

    let store = select_store(config.database_url.as_deref(), &config.mode_options()).await;
    info!(mode = ?store.mode(), "storage mode selected");

    if let Some(admin) = &config.admin {
        // Bootstrap failures are logged, not fatal.
        if let Err(e) = tastetrail_api::services::auth::bootstrap_admin(store.as_ref(), admin).await
        {
            warn!(error = %e, email = %admin.email, "failed to bootstrap administrator");
        }
    }

    let state = tastetrail_api::AppState {
        store,
        config: config.clone(),
    };
    let app = tastetrail_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
