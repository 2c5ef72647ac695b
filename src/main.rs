//! Focus Timer - A focus countdown service with a session summary hand-off
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use focus_timer::{
    api::create_router,
    config::Config,
    services::{HttpSessionStore, StaticToken},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, minutes={}, api={}",
          config.host, config.port, config.minutes, config.api_url);

    let tokens = StaticToken::new(config.api_token.clone());
    if !tokens.is_configured() {
        warn!("No FOCUS_API_TOKEN configured, session summaries cannot be saved");
    }
    let store = HttpSessionStore::new(config.api_url.clone(), Arc::new(tokens));

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.minutes,
        Arc::new(store),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /status            - Current timer status");
    info!("  POST   /timer/start-pause - Start or pause the countdown");
    info!("  POST   /timer/reset       - Reset, ending any session in progress");
    info!("  POST   /timer/duration    - Set the duration in minutes");
    info!("  POST   /summary           - Save the finished session");
    info!("  DELETE /summary           - Discard the finished session");
    info!("  GET    /sessions          - Stored session history");
    info!("  GET    /health            - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.shutdown() {
        warn!("Failed to stop focus timer cleanly: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
