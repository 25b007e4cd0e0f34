//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::api::session::SessionManager;
use crate::config::AppConfig;
use crate::rag::ConversationalRetrievalChain;
use crate::Result;

/// Assemble the router with tracing, compression and optional CORS
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = routes::api_routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("Starting DocBot API server...");

    let chain = Arc::new(ConversationalRetrievalChain::from_config(config).await?);
    let sessions = Arc::new(SessionManager::new(
        config.server.session_timeout_secs,
        config.chat.max_history_turns,
    ));
    let _cleanup = sessions.start_cleanup_task();

    let app = build_app(AppState { chain, sessions }, enable_cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  POST /ask/    - Ask a question ({{\"content\": \"...\"}})");
    info!("  GET  /health  - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
