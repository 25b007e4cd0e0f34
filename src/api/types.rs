//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::rag::HistoryMessage;

/// Standard API response wrapper, used for health checks and error bodies
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub active_sessions: usize,
}

/// Body of `POST /ask/`
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub content: Option<String>,
    /// Continue an earlier conversation; without it every request starts fresh
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Answer to `POST /ask/`
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub chat_history: Vec<HistoryMessage>,
    /// Seconds, rounded to two decimals
    pub time_taken: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Round seconds to two decimals
pub fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_secs() {
        assert!((round_secs(1.23456) - 1.23).abs() < f64::EPSILON);
        assert!((round_secs(2.499) - 2.5).abs() < f64::EPSILON);
        assert!(round_secs(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ask_request_optional_fields() {
        let request: AskRequest = serde_json::from_str("{}").unwrap();
        assert!(request.content.is_none());
        assert!(request.session_id.is_none());

        let request: AskRequest =
            serde_json::from_str(r#"{"content": "hi", "session_id": "abc"}"#).unwrap();
        assert_eq!(request.content.as_deref(), Some("hi"));
        assert_eq!(request.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_ask_response_omits_missing_session() {
        let response = AskResponse {
            answer: "a".to_string(),
            chat_history: vec![HistoryMessage::human("q"), HistoryMessage::ai("a")],
            time_taken: 0.42,
            session_id: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("session_id").is_none());
        assert_eq!(json["chat_history"][0]["type"], "human");
        assert_eq!(json["time_taken"], 0.42);
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "data": null, "error": "boom"})
        );
    }
}
