//! # REST API for the Chat
//!
//! Endpoints for reading the conversation and sending messages.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::SendMessageRequest;
use tracing::{info, warn};

use crate::domain::ChatServiceError;
use crate::AppState;

/// Current transcript, financial state and flags
pub async fn get_chat_state(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/chat");

    (StatusCode::OK, Json(state.chat_service.snapshot().await))
}

/// Send a user message and wait for the assistant's reply
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> impl IntoResponse {
    info!("POST /api/chat/messages - {} chars", request.message.chars().count());

    match state.chat_service.send_message(&request.message).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e @ ChatServiceError::EmptyMessage) => {
            warn!("Rejected chat message: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e @ ChatServiceError::ReplyPending) => {
            warn!("Rejected chat message: {}", e);
            (StatusCode::CONFLICT, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatService, ChatTransport, ConversationError, ExpenseService};
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use shared::{ChatRole, ChatStateResponse};
    use std::sync::Arc;

    struct EchoTransport;

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn send(&self, message: &str) -> Result<String, ConversationError> {
            Ok(format!("קיבלתי: {}\n```json\n{{\"cash\": 75}}\n```", message))
        }
    }

    fn state_with(session: Option<Arc<dyn ChatTransport>>) -> AppState {
        AppState {
            chat_service: ChatService::new(session),
            expense_service: ExpenseService::in_memory(),
        }
    }

    async fn body_of(response: axum::response::Response) -> ChatStateResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_chat_state_starts_with_greeting() {
        let state = state_with(Some(Arc::new(EchoTransport)));

        let response = get_chat_state(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body.transcript.len(), 1);
        assert_eq!(body.transcript[0].role, ChatRole::Model);
        assert!(!body.configuration_missing);
    }

    #[tokio::test]
    async fn test_send_message_handler() {
        let state = state_with(Some(Arc::new(EchoTransport)));
        let request = SendMessageRequest {
            message: "יש לי 75 במזומן".to_string(),
        };

        let response = send_message(State(state), Json(request)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body.transcript.last().unwrap().text, "קיבלתי: יש לי 75 במזומן");
        assert_eq!(body.financial_state.unwrap().cash, Some(75.0));
        assert!(!body.awaiting_reply);
    }

    #[tokio::test]
    async fn test_send_empty_message_is_bad_request() {
        let state = state_with(Some(Arc::new(EchoTransport)));
        let request = SendMessageRequest {
            message: "   ".to_string(),
        };

        let response = send_message(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_without_configuration_returns_fallback() {
        let state = state_with(None);
        let request = SendMessageRequest {
            message: "שלום".to_string(),
        };

        let response = send_message(State(state), Json(request)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert!(body.configuration_missing);
        assert!(body.financial_state.is_none());
    }
}
