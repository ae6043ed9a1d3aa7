//! Chat controller.
//!
//! Owns the transcript and the financial state derived from model replies.
//! One message cycle: append the user's message, ask the conversation session
//! for a reply, split the reply into display text and patch, then either merge
//! the patch or reset everything.
//!
//! At most one exchange is in flight at a time. The "awaiting reply" flag is
//! taken with a compare-and-swap and released by a guard on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::{ChatMessage, ChatStateResponse, FinancialState};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::conversation_session::{ChatTransport, ConversationError};
use crate::domain::{state_extractor, state_merger};

pub const GREETING_MESSAGE: &str = "שלום! אני Savvy, העוזר הפיננסי האישי שלך. ספר לי על המצב הפיננסי שלך. למשל: \"יש לי 1000 ש\"ח במזומן, ואבא חייב לי 500 ש\"ח\". אני אעזור לך לעקוב אחרי הכל.";
pub const FALLBACK_MESSAGE: &str = "מצטער, נתקלתי בבעיה. אנא נסה שוב מאוחר יותר.";

/// Reasons a message is refused before anything is sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatServiceError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("A reply is still pending")]
    ReplyPending,
}

#[derive(Debug, Default)]
struct ChatViewState {
    transcript: Vec<ChatMessage>,
    financial_state: Option<FinancialState>,
}

#[derive(Clone)]
pub struct ChatService {
    session: Option<Arc<dyn ChatTransport>>,
    state: Arc<Mutex<ChatViewState>>,
    awaiting_reply: Arc<AtomicBool>,
}

/// Clears the awaiting-reply flag when the exchange ends, however it ends.
struct AwaitingReply(Arc<AtomicBool>);

impl AwaitingReply {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for AwaitingReply {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatService {
    /// Create the controller. `session` is `None` when no credential was configured.
    pub fn new(session: Option<Arc<dyn ChatTransport>>) -> Self {
        let transcript = if session.is_some() {
            vec![ChatMessage::model(GREETING_MESSAGE)]
        } else {
            warn!("Chat session unavailable: API key is not configured");
            Vec::new()
        };

        Self {
            session,
            state: Arc::new(Mutex::new(ChatViewState {
                transcript,
                financial_state: None,
            })),
            awaiting_reply: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    /// Current transcript, financial state and flags
    pub async fn snapshot(&self) -> ChatStateResponse {
        let state = self.state.lock().await;
        ChatStateResponse {
            transcript: state.transcript.clone(),
            financial_state: state.financial_state.clone(),
            awaiting_reply: self.awaiting_reply.load(Ordering::Acquire),
            configuration_missing: !self.is_configured(),
        }
    }

    /// Run one full message cycle and return the resulting view state.
    ///
    /// Transport and configuration failures are not errors for the caller:
    /// they surface as a fallback message in the transcript. The cycle runs on
    /// its own task, so it completes even if the caller stops waiting.
    pub async fn send_message(&self, message: &str) -> Result<ChatStateResponse, ChatServiceError> {
        if message.trim().is_empty() {
            return Err(ChatServiceError::EmptyMessage);
        }

        let awaiting = AwaitingReply::acquire(&self.awaiting_reply).ok_or(ChatServiceError::ReplyPending)?;

        let service = self.clone();
        let message = message.to_string();
        let cycle = tokio::spawn(async move {
            let _awaiting = awaiting;
            service.run_cycle(&message).await;
        });

        if let Err(e) = cycle.await {
            error!("Chat message cycle failed: {}", e);
        }

        let state = self.state.lock().await;
        Ok(ChatStateResponse {
            transcript: state.transcript.clone(),
            financial_state: state.financial_state.clone(),
            awaiting_reply: false,
            configuration_missing: !self.is_configured(),
        })
    }

    async fn run_cycle(&self, message: &str) {
        self.state
            .lock()
            .await
            .transcript
            .push(ChatMessage::user(message));

        match self.request_reply(message).await {
            Ok(raw_reply) => self.apply_reply(&raw_reply).await,
            Err(e) => {
                error!("Error sending message to chat service: {}", e);
                self.state
                    .lock()
                    .await
                    .transcript
                    .push(ChatMessage::model(FALLBACK_MESSAGE));
            }
        }
    }

    async fn request_reply(&self, message: &str) -> Result<String, ConversationError> {
        let session = self.session.as_ref().ok_or_else(|| {
            ConversationError::Configuration("API key is not set".to_string())
        })?;
        session.send(message).await
    }

    async fn apply_reply(&self, raw_reply: &str) {
        let extracted = state_extractor::extract(raw_reply);
        let mut state = self.state.lock().await;

        match extracted.patch {
            Some(patch) if patch.reset => {
                info!("Resetting financial state and transcript");
                state.financial_state = state_merger::reset();
                state.transcript = vec![ChatMessage::model(extracted.display_text)];
            }
            Some(patch) => {
                let merged = state_merger::merge(state.financial_state.take(), &patch);
                state.transcript.push(ChatMessage::model(extracted.display_text));
                state.financial_state = merged;
            }
            None => {
                state.transcript.push(ChatMessage::model(extracted.display_text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::ChatRole;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Replays scripted replies in order
    struct ScriptedTransport {
        replies: std::sync::Mutex<VecDeque<Result<String, ConversationError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String, ConversationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: std::sync::Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, _message: &str) -> Result<String, ConversationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ConversationError::Transport("no scripted reply".to_string())))
        }
    }

    /// Blocks until released, to observe the in-flight state
    struct GatedTransport {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ChatTransport for GatedTransport {
        async fn send(&self, _message: &str) -> Result<String, ConversationError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("סיימתי".to_string())
        }
    }

    fn service_with(replies: Vec<Result<String, ConversationError>>) -> (ChatService, Arc<ScriptedTransport>) {
        let transport = ScriptedTransport::new(replies);
        let service = ChatService::new(Some(transport.clone() as Arc<dyn ChatTransport>));
        (service, transport)
    }

    fn ok(text: &str) -> Result<String, ConversationError> {
        Ok(text.to_string())
    }

    #[tokio::test]
    async fn test_new_service_starts_with_greeting() {
        let (service, _) = service_with(vec![]);

        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.transcript, vec![ChatMessage::model(GREETING_MESSAGE)]);
        assert_eq!(snapshot.financial_state, None);
        assert!(!snapshot.awaiting_reply);
        assert!(!snapshot.configuration_missing);
    }

    #[tokio::test]
    async fn test_send_message_extracts_and_merges_state() {
        let (service, _) = service_with(vec![ok("מעולה! \n```json\n{\"cash\":1000}\n```")]);

        let snapshot = service.send_message("יש לי 1000 ש״ח במזומן").await.unwrap();

        assert_eq!(snapshot.transcript.len(), 3);
        assert_eq!(snapshot.transcript[1], ChatMessage::user("יש לי 1000 ש״ח במזומן"));
        assert_eq!(snapshot.transcript[2], ChatMessage::model("מעולה!"));
        assert_eq!(
            snapshot.financial_state,
            Some(FinancialState {
                cash: Some(1000.0),
                ..Default::default()
            })
        );
        assert!(!snapshot.awaiting_reply);
    }

    #[tokio::test]
    async fn test_sequential_patches_accumulate() {
        let (service, _) = service_with(vec![
            ok("רשמתי.\n```json\n{\"cash\":1000}\n```"),
            ok("גם זה.\n```json\n{\"bank\":200}\n```"),
        ]);

        service.send_message("מזומן").await.unwrap();
        let snapshot = service.send_message("בנק").await.unwrap();

        assert_eq!(
            snapshot.financial_state,
            Some(FinancialState {
                cash: Some(1000.0),
                bank: Some(200.0),
                ..Default::default()
            })
        );
        assert_eq!(snapshot.transcript.len(), 5);
    }

    #[tokio::test]
    async fn test_reset_patch_clears_state_and_transcript() {
        let (service, _) = service_with(vec![
            ok("רשמתי.\n```json\n{\"cash\":1000}\n```"),
            ok("בסדר, מחקתי הכל. נתחיל מחדש!\n```json\n{\n  \"reset\": true\n}\n```"),
        ]);

        service.send_message("יש לי 1000").await.unwrap();
        let snapshot = service.send_message("תמחק הכל").await.unwrap();

        assert_eq!(snapshot.financial_state, None);
        assert_eq!(
            snapshot.transcript,
            vec![ChatMessage::model("בסדר, מחקתי הכל. נתחיל מחדש!")]
        );
    }

    #[tokio::test]
    async fn test_reply_without_patch_keeps_state() {
        let (service, _) = service_with(vec![
            ok("רשמתי.\n```json\n{\"cash\":1000}\n```"),
            ok("איך עוד אפשר לעזור?"),
        ]);

        service.send_message("יש לי 1000").await.unwrap();
        let snapshot = service.send_message("תודה").await.unwrap();

        assert_eq!(snapshot.financial_state.unwrap().cash, Some(1000.0));
        assert_eq!(snapshot.transcript.last().unwrap().text, "איך עוד אפשר לעזור?");
    }

    #[tokio::test]
    async fn test_malformed_patch_shows_full_reply() {
        let reply = "הנה\n```json\n{cash: 1000}\n```";
        let (service, _) = service_with(vec![ok(reply)]);

        let snapshot = service.send_message("מה המצב?").await.unwrap();

        assert_eq!(snapshot.transcript.last().unwrap().text, reply);
        assert_eq!(snapshot.financial_state, None);
    }

    #[tokio::test]
    async fn test_transport_error_appends_fallback() {
        let (service, _) = service_with(vec![
            ok("רשמתי.\n```json\n{\"cash\":1000}\n```"),
            Err(ConversationError::Transport("quota exceeded".to_string())),
        ]);
        service.send_message("יש לי 1000").await.unwrap();
        let before = service.snapshot().await;

        let snapshot = service.send_message("ועוד משהו").await.unwrap();

        assert_eq!(snapshot.transcript.len(), before.transcript.len() + 2);
        assert_eq!(snapshot.transcript.last().unwrap(), &ChatMessage::model(FALLBACK_MESSAGE));
        assert_eq!(snapshot.financial_state, before.financial_state);
        assert!(!snapshot.awaiting_reply);
        assert!(!service.snapshot().await.awaiting_reply);
    }

    #[tokio::test]
    async fn test_missing_configuration_fails_fast_with_fallback() {
        let service = ChatService::new(None);

        let initial = service.snapshot().await;
        let snapshot = service.send_message("שלום").await.unwrap();

        assert!(initial.transcript.is_empty());
        assert!(snapshot.configuration_missing);
        assert_eq!(
            snapshot.transcript,
            vec![ChatMessage::user("שלום"), ChatMessage::model(FALLBACK_MESSAGE)]
        );
        assert!(!snapshot.awaiting_reply);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected_without_calling_transport() {
        let (service, transport) = service_with(vec![ok("לא אמור להגיע")]);

        let result = service.send_message("   ").await;

        assert_eq!(result, Err(ChatServiceError::EmptyMessage));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.snapshot().await.transcript.len(), 1);
    }

    /// Answers after a delay
    struct SlowTransport {
        delay: Duration,
    }

    #[async_trait]
    impl ChatTransport for SlowTransport {
        async fn send(&self, _message: &str) -> Result<String, ConversationError> {
            tokio::time::sleep(self.delay).await;
            Ok("הנה התשובה\n```json\n{\"cash\": 50}\n```".to_string())
        }
    }

    #[tokio::test]
    async fn test_cycle_completes_when_caller_stops_waiting() {
        let transport = Arc::new(SlowTransport {
            delay: Duration::from_millis(200),
        });
        let service = ChatService::new(Some(transport as Arc<dyn ChatTransport>));

        let abandoned = tokio::time::timeout(Duration::from_millis(20), service.send_message("שלום")).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.transcript.len(), 3);
        assert_eq!(snapshot.transcript[1], ChatMessage::user("שלום"));
        assert_eq!(snapshot.transcript[2], ChatMessage::model("הנה התשובה"));
        assert_eq!(snapshot.financial_state.unwrap().cash, Some(50.0));
        assert!(!snapshot.awaiting_reply);
    }

    #[tokio::test]
    async fn test_second_send_while_awaiting_is_rejected() {
        let transport = Arc::new(GatedTransport {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let service = ChatService::new(Some(transport.clone() as Arc<dyn ChatTransport>));

        let in_flight = {
            let service = service.clone();
            tokio::spawn(async move { service.send_message("ראשונה").await })
        };
        transport.entered.notified().await;

        let during = service.snapshot().await;
        assert!(during.awaiting_reply);
        assert_eq!(during.transcript.last().unwrap().role, ChatRole::User);
        assert_eq!(
            service.send_message("שנייה").await,
            Err(ChatServiceError::ReplyPending)
        );

        transport.release.notify_one();
        let finished = in_flight.await.unwrap().unwrap();

        assert!(!finished.awaiting_reply);
        assert_eq!(finished.transcript.len(), 3);
        assert_eq!(finished.transcript[2], ChatMessage::model("סיימתי"));
        assert!(!service.snapshot().await.awaiting_reply);
    }
}
