use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use compass_gateway::{Gateway, GatewayResult};
use compass_timeline::{ChatEffect, ChatEvent, ChatState, EntryId, Snippet, Timeline};

use crate::advice::read_advice;

/// Drives the chat reducer against a gateway.
///
/// Operations take `&self` so a send and an advice request may overlap; the reducer
/// flags reject a second operation of the same class while one is outstanding. The
/// state lock is only held while applying an event, never across a gateway call.
pub struct ChatSession {
    state: Mutex<ChatState>,
    gateway: Arc<dyn Gateway>,
}

impl ChatSession {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            state: Mutex::new(ChatState::new()),
            gateway,
        }
    }

    /// Snapshot of the current timeline for rendering.
    pub fn timeline(&self) -> Timeline {
        self.lock().timeline().clone()
    }

    pub fn is_sending(&self) -> bool {
        self.lock().is_sending()
    }

    pub fn is_advice_loading(&self) -> bool {
        self.lock().is_advice_loading()
    }

    pub fn reset(&self) {
        self.dispatch(ChatEvent::Reset);
    }

    pub async fn send(&self, text: &str) {
        let effect = self.dispatch(ChatEvent::SendRequested {
            text: text.to_string(),
        });
        let Some(ChatEffect::SendMessage { typing_id, text }) = effect else {
            return;
        };

        let guard = SettleGuard::new(self, ChatEvent::SendFailed { typing_id });
        let event = match self.gateway.send_message(&text).await {
            Ok(reply) => ChatEvent::SendSucceeded { typing_id, reply },
            Err(error) => {
                tracing::error!(error = %error, "failed to send message");
                ChatEvent::SendFailed { typing_id }
            }
        };
        guard.settle(event);
    }

    pub async fn request_advice(&self, entry_id: EntryId, snippets: Vec<Snippet>) {
        let effect = self.dispatch(ChatEvent::AdviceRequested { entry_id, snippets });
        let Some(ChatEffect::FetchAdvice {
            entry_id,
            typing_id,
            context,
            snippets,
        }) = effect
        else {
            return;
        };

        let guard = SettleGuard::new(
            self,
            ChatEvent::AdviceFailed {
                entry_id,
                typing_id,
            },
        );
        let event = match self.fetch_advice(&context, &snippets).await {
            Ok(content) => ChatEvent::AdviceSucceeded {
                entry_id,
                typing_id,
                content,
            },
            Err(error) => {
                tracing::error!(
                    entry_id = %entry_id.short(),
                    error = %error,
                    "failed to get advice"
                );
                ChatEvent::AdviceFailed {
                    entry_id,
                    typing_id,
                }
            }
        };
        guard.settle(event);
    }

    async fn fetch_advice(&self, context: &str, snippets: &[Snippet]) -> GatewayResult<String> {
        let stream = self.gateway.get_advice(context, snippets).await?;
        read_advice(stream).await
    }

    fn dispatch(&self, event: ChatEvent) -> Option<ChatEffect> {
        self.lock().apply(event)
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        // The reducer never panics mid-transition, so a poisoned state is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Applies an operation's failure event if its future is dropped before settling.
///
/// Keeps the in-flight flags and typing placeholders from outliving the operation.
struct SettleGuard<'a> {
    session: &'a ChatSession,
    fallback: Option<ChatEvent>,
}

impl<'a> SettleGuard<'a> {
    fn new(session: &'a ChatSession, fallback: ChatEvent) -> Self {
        Self {
            session,
            fallback: Some(fallback),
        }
    }

    fn settle(mut self, event: ChatEvent) {
        self.fallback = None;
        self.session.dispatch(event);
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            tracing::warn!("chat operation dropped before settling");
            self.session.dispatch(event);
        }
    }
}
