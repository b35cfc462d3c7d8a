//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{ApiError, ApiResult};
use crate::infra::{Database, RedisRateLimiter};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> ApiResult<()> {
    tracing::info!("Starting server...");

    // Initialize database
    let db = Arc::new(Database::connect(&config).await);

    // Initialize Redis-backed rate limiter
    let limiter = Arc::new(RedisRateLimiter::connect(&config).await);

    // Create application state
    let app_state = AppState::from_config(db, limiter, &config);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // ConnectInfo feeds the rate limiter's client identification
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
