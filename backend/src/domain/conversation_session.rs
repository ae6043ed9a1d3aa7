//! Conversation session with the hosted language model.
//!
//! A session is created once at start-up, and only when an API credential is
//! available. It keeps the turns of every successful exchange and replays them
//! on each request so the model sees the whole conversation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Instructions that make the model answer in Hebrew and append a JSON state footer.
pub const SYSTEM_INSTRUCTION: &str = r#"You are 'Savvy', a conversational personal financial assistant. Your goal is to help the user manage their finances through conversation. The user will tell you about their income, expenses, debts, and available funds. You must track these numbers throughout the conversation.

IMPORTANT:
1. After every conversational response, you MUST append a special JSON block that summarizes the user's complete financial state. This JSON block must be enclosed in triple backticks and marked as json.
Format:
```json
{
  "cash": NUMBER,
  "bank": NUMBER,
  "debtsToUser": { "person_name": AMOUNT, ... },
  "userDebts": { "person_name": AMOUNT, ... }
}
```

2. Only include keys in the JSON if you have data for them from the user. If a value becomes zero or is paid off, remove the corresponding key (e.g., from a debt object).

3. If the user asks to delete everything, clear data, reset, or start over, your conversational response must confirm the action (e.g., "Alright, I've cleared all your data. Let's start fresh!"). The JSON block you provide MUST be exactly:
```json
{
  "reset": true
}
```

4. Your conversational response must be friendly, encouraging, and ALWAYS in Hebrew. The JSON block should be separate from your conversational text."#;

/// Failures of a chat exchange
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversationError {
    /// No session could be created (missing credential); no call was attempted
    #[error("chat is not configured: {0}")]
    Configuration(String),
    /// The call failed or produced no usable text
    #[error("chat request failed: {0}")]
    Transport(String),
}

/// One conversation with an external chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a user message and wait for the complete reply text.
    async fn send(&self, message: &str) -> Result<String, ConversationError>;
}

/// Settings needed to open a Gemini session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

// ============================================================================
// Gemini API types
// ============================================================================

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [GeminiContent],
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction<'a>,
}

#[derive(Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: [GeminiTextPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiPart {
    text: String,
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self {
            role: "user",
            parts: vec![GeminiPart { text: text.to_string() }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model",
            parts: vec![GeminiPart { text: text.to_string() }],
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Session
// ============================================================================

/// Chat session backed by Gemini's `generateContent` endpoint
pub struct GeminiSession {
    client: Client,
    config: SessionConfig,
    history: Mutex<Vec<GeminiContent>>,
}

impl GeminiSession {
    pub fn new(config: SessionConfig) -> Self {
        info!("Opening chat session with model {}", config.model);
        Self {
            client: Client::new(),
            config,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Open a session if a non-empty credential is available.
    pub fn start(api_key: Option<String>, model: &str, base_url: &str) -> Option<Self> {
        let api_key = api_key.filter(|key| !key.trim().is_empty())?;
        Some(Self::new(SessionConfig {
            api_key,
            model: model.to_string(),
            base_url: base_url.to_string(),
        }))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, contents: &[GeminiContent]) -> Result<String, ConversationError> {
        let request = GenerateContentRequest {
            contents,
            system_instruction: GeminiSystemInstruction {
                parts: [GeminiTextPart {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ConversationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConversationError::Transport(format!(
                "Gemini API error: {} - {}",
                status, body
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ConversationError::Transport(format!("Invalid Gemini response: {}", e)))?;

        if let Some(error) = response.error {
            return Err(ConversationError::Transport(format!("Gemini error: {}", error.message)));
        }

        let text: String = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ConversationError::Transport("Gemini returned no text".to_string()));
        }

        Ok(text)
    }
}

#[async_trait]
impl ChatTransport for GeminiSession {
    async fn send(&self, message: &str) -> Result<String, ConversationError> {
        // Held for the whole exchange so turns are recorded in order.
        let mut history = self.history.lock().await;

        let mut contents = history.clone();
        contents.push(GeminiContent::user(message));
        debug!("Sending message with {} prior turns", history.len());

        let reply = self.generate(&contents).await?;

        history.push(GeminiContent::user(message));
        history.push(GeminiContent::model(&reply));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn session_for(server: &MockServer) -> GeminiSession {
        GeminiSession::start(Some("test-key".to_string()), DEFAULT_MODEL, &server.uri()).unwrap()
    }

    fn reply_body(text: &str) -> Value {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": text } ] } }
            ]
        })
    }

    async fn sent_bodies(server: &MockServer) -> Vec<Value> {
        server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| request.body_json::<Value>().unwrap())
            .collect()
    }

    #[test]
    fn test_start_requires_credential() {
        assert!(GeminiSession::start(None, DEFAULT_MODEL, DEFAULT_GEMINI_BASE_URL).is_none());
        assert!(GeminiSession::start(Some("  ".to_string()), DEFAULT_MODEL, DEFAULT_GEMINI_BASE_URL).is_none());
        assert!(GeminiSession::start(Some("key".to_string()), DEFAULT_MODEL, DEFAULT_GEMINI_BASE_URL).is_some());
    }

    #[tokio::test]
    async fn test_send_returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("שלום!")))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let reply = session.send("היי").await.unwrap();

        assert_eq!(reply, "שלום!");
        let bodies = sent_bodies(&server).await;
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["contents"][0]["role"], "user");
        assert_eq!(bodies[0]["contents"][0]["parts"][0]["text"], "היי");
        assert_eq!(
            bodies[0]["systemInstruction"]["parts"][0]["text"],
            SYSTEM_INSTRUCTION
        );
    }

    #[tokio::test]
    async fn test_send_replays_previous_turns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("קיבלתי")))
            .mount(&server)
            .await;

        let session = session_for(&server);
        session.send("יש לי 1000 במזומן").await.unwrap();
        session.send("ו-200 בבנק").await.unwrap();

        let bodies = sent_bodies(&server).await;
        assert_eq!(bodies.len(), 2);
        let contents = bodies[1]["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["parts"][0]["text"], "יש לי 1000 במזומן");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "קיבלתי");
        assert_eq!(contents[2]["parts"][0]["text"], "ו-200 בבנק");
    }

    #[tokio::test]
    async fn test_http_error_is_transport_error_and_not_recorded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let first = session.send("היי").await;
        let second = session.send("שוב").await;

        assert!(matches!(first, Err(ConversationError::Transport(message)) if message.contains("403")));
        assert!(second.is_err());
        let bodies = sent_bodies(&server).await;
        assert_eq!(bodies[1]["contents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let session = session_for(&server);
        let result = session.send("היי").await;

        assert!(matches!(result, Err(ConversationError::Transport(_))));
    }

    #[tokio::test]
    async fn test_thought_parts_are_skipped() {
        let server = MockServer::start().await;
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "תשובה " },
                    { "text": "סופית" }
                ] }
            }]
        });
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let session = session_for(&server);

        assert_eq!(session.send("?").await.unwrap(), "תשובה סופית");
    }
}
