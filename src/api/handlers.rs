/// API request handlers
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::session::SessionManager;
use crate::api::types::round_secs;
use crate::api::types::ApiResponse;
use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::HealthResponse;
use crate::rag::ChainResponse;
use crate::rag::ConversationalRetrievalChain;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ConversationalRetrievalChain>,
    pub sessions: Arc<SessionManager>,
}

type ErrorResponse = (StatusCode, Json<ApiResponse<()>>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(ApiResponse::error(message)))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: state.sessions.session_count(),
    }))
}

/// Answer a question (POST /ask/)
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    })?;

    let question = match request.content.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => {
            return Err(error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "field `content` is required and must not be empty",
            ))
        }
    };

    info!("Received question: {}", question);
    let start = Instant::now();

    let response = match &request.session_id {
        Some(session_id) => {
            let session = state.sessions.get_or_create(session_id);
            let mut session = session.lock().await;
            let result = state.chain.call(&mut session.memory, &question).await;
            session.touch();
            result
        }
        None => {
            let mut memory = state.sessions.new_memory();
            state.chain.call(&mut memory, &question).await
        }
    };

    let ChainResponse {
        answer,
        chat_history,
        ..
    } = response.map_err(|e| {
        error!("Failed to answer question: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let time_taken = round_secs(start.elapsed().as_secs_f64());
    info!("Received answer: {} ({:.2}s)", answer, time_taken);

    Ok(Json(AskResponse {
        answer,
        chat_history,
        time_taken,
        session_id: request.session_id,
    }))
}
