use shared::{ChatMessage, ChatStateResponse, FinancialState};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{ApiClient, Logger};

/// Shown when the backend cannot be reached at all
pub const NETWORK_FALLBACK_MESSAGE: &str = "מצטער, נתקלתי בבעיה. אנא נסה שוב מאוחר יותר.";

#[derive(Clone, PartialEq)]
pub struct ChatState {
    pub transcript: Vec<ChatMessage>,
    pub financial_state: Option<FinancialState>,
    pub awaiting_reply: bool,
    pub configuration_missing: bool,
    pub loading: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: Vec::new(),
            financial_state: None,
            awaiting_reply: false,
            configuration_missing: false,
            loading: true,
        }
    }
}

impl ChatState {
    fn from_response(response: ChatStateResponse) -> Self {
        Self {
            transcript: response.transcript,
            financial_state: response.financial_state,
            awaiting_reply: response.awaiting_reply,
            configuration_missing: response.configuration_missing,
            loading: false,
        }
    }

    /// The user's message is shown right away, before the server answers
    fn with_pending_message(&self, message: &str) -> Self {
        let mut next = self.clone();
        next.transcript.push(ChatMessage::user(message));
        next.awaiting_reply = true;
        next
    }

    fn with_fallback(&self) -> Self {
        let mut next = self.clone();
        next.transcript.push(ChatMessage::model(NETWORK_FALLBACK_MESSAGE));
        next.awaiting_reply = false;
        next
    }
}

pub struct UseChatResult {
    pub state: ChatState,
    pub actions: UseChatActions,
}

#[derive(Clone, PartialEq)]
pub struct UseChatActions {
    pub send_message: Callback<String>,
}

#[hook]
pub fn use_chat(api_client: &ApiClient) -> UseChatResult {
    let state = use_state(ChatState::default);

    {
        let api_client = api_client.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_chat_state().await {
                    Ok(response) => state.set(ChatState::from_response(response)),
                    Err(e) => {
                        Logger::error_with_component("use_chat", &format!("Failed to load chat: {}", e));
                        state.set(ChatState {
                            loading: false,
                            ..(*state).clone()
                        });
                    }
                }
            });
            || ()
        });
    }

    let send_message = {
        let api_client = api_client.clone();
        let state = state.clone();

        Callback::from(move |message: String| {
            if message.trim().is_empty() || state.awaiting_reply {
                return;
            }

            let pending = state.with_pending_message(&message);
            state.set(pending.clone());

            let api_client = api_client.clone();
            let state = state.clone();
            spawn_local(async move {
                match api_client.send_message(message).await {
                    Ok(response) => state.set(ChatState::from_response(response)),
                    Err(e) => {
                        Logger::error_with_component("use_chat", &format!("Failed to send message: {}", e));
                        state.set(pending.with_fallback());
                    }
                }
            });
        })
    };

    UseChatResult {
        state: (*state).clone(),
        actions: UseChatActions { send_message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ChatRole;

    #[test]
    fn test_pending_message_is_appended_optimistically() {
        let state = ChatState {
            transcript: vec![ChatMessage::model("שלום!")],
            loading: false,
            ..Default::default()
        };

        let pending = state.with_pending_message("יש לי 100 במזומן");

        assert_eq!(pending.transcript.len(), 2);
        assert_eq!(pending.transcript[1].role, ChatRole::User);
        assert!(pending.awaiting_reply);
    }

    #[test]
    fn test_fallback_clears_awaiting_flag() {
        let pending = ChatState::default().with_pending_message("היי");

        let failed = pending.with_fallback();

        assert!(!failed.awaiting_reply);
        assert_eq!(failed.transcript.last().unwrap().text, NETWORK_FALLBACK_MESSAGE);
        assert!(failed.financial_state.is_none());
    }
}
