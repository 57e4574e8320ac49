//! Axum server setup: arguments, router assembly, graceful shutdown.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use registry_core::{Registry, StudentStore};

use crate::routes;

/// Server command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "registry-server", version, about = "Student registry HTTP server")]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Database file path (default: ~/.student-registry/registry.db)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Directory of static pages served at the root
    #[arg(long, default_value = "public")]
    pub public_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
}

/// Run the server with the given arguments.
pub async fn run_server(args: ServerArgs) -> anyhow::Result<()> {
    let db_path = args.db_path.unwrap_or_else(default_db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("opening database at {}", db_path.display());
    let store = StudentStore::connect(&db_path).await?;
    let registry = Registry::new(store);

    let app = create_router(registry, &args.public_dir);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("student registry listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".student-registry")
        .join("registry.db")
}

/// Build the router: API under `/api`, static pages as the fallback,
/// request tracing and permissive CORS over everything.
pub fn create_router(registry: Registry, public_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .nest("/api", routes::router())
        .fallback_service(ServeDir::new(public_dir))
        .with_state(AppState { registry })
        .layer(middleware)
}

/// Graceful shutdown on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            warn!("received SIGTERM, shutting down");
        }
    }
}
