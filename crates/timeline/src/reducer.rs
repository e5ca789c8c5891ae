use crate::entry::{Entry, MessageReply, Snippet};
use crate::ids::EntryId;
use crate::timeline::{ADVICE_FAILURE_MESSAGE, SEND_FAILURE_MESSAGE, Timeline};

/// Input to the chat reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Reset,
    SendRequested {
        text: String,
    },
    SendSucceeded {
        typing_id: EntryId,
        reply: MessageReply,
    },
    SendFailed {
        typing_id: EntryId,
    },
    AdviceRequested {
        entry_id: EntryId,
        snippets: Vec<Snippet>,
    },
    AdviceSucceeded {
        entry_id: EntryId,
        typing_id: EntryId,
        content: String,
    },
    AdviceFailed {
        entry_id: EntryId,
        typing_id: EntryId,
    },
}

/// Gateway call the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEffect {
    SendMessage {
        typing_id: EntryId,
        text: String,
    },
    FetchAdvice {
        entry_id: EntryId,
        typing_id: EntryId,
        context: String,
        snippets: Vec<Snippet>,
    },
}

/// Timeline plus the two independent re-entrancy flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    timeline: Timeline,
    send_in_flight: bool,
    advice_in_flight: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn is_sending(&self) -> bool {
        self.send_in_flight
    }

    pub fn is_advice_loading(&self) -> bool {
        self.advice_in_flight
    }

    /// Applies one event and returns the gateway call it requires, if any.
    ///
    /// Mutations happen in a fixed order per event. Events rejected by a guard leave
    /// the state untouched and return `None`.
    pub fn apply(&mut self, event: ChatEvent) -> Option<ChatEffect> {
        match event {
            ChatEvent::Reset => {
                self.timeline.reset();
                None
            }
            ChatEvent::SendRequested { text } => self.apply_send_requested(text),
            ChatEvent::SendSucceeded { typing_id, reply } => {
                self.apply_send_succeeded(typing_id, reply);
                None
            }
            ChatEvent::SendFailed { typing_id } => {
                self.apply_send_failed(typing_id);
                None
            }
            ChatEvent::AdviceRequested { entry_id, snippets } => {
                self.apply_advice_requested(entry_id, snippets)
            }
            ChatEvent::AdviceSucceeded {
                entry_id,
                typing_id,
                content,
            } => {
                self.apply_advice_succeeded(entry_id, typing_id, content);
                None
            }
            ChatEvent::AdviceFailed {
                entry_id,
                typing_id,
            } => {
                self.apply_advice_failed(entry_id, typing_id);
                None
            }
        }
    }

    fn apply_send_requested(&mut self, text: String) -> Option<ChatEffect> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("ignoring send of blank input");
            return None;
        }

        if self.send_in_flight {
            tracing::debug!("ignoring send while another send is outstanding");
            return None;
        }

        // Every turn starts from the greeting alone.
        self.timeline.truncate_to_welcome();
        self.timeline.push(Entry::user(text));
        let typing_id = self.timeline.push(Entry::typing());
        self.send_in_flight = true;

        Some(ChatEffect::SendMessage {
            typing_id,
            text: text.to_string(),
        })
    }

    fn apply_send_succeeded(&mut self, typing_id: EntryId, reply: MessageReply) {
        self.timeline.remove(typing_id);

        if let Some(hotline) = reply.crisis_hotline() {
            tracing::info!("gateway flagged a crisis turn; showing hotline only");
            self.timeline.push(Entry::crisis(hotline));
        } else {
            self.timeline.push(Entry::snippets(reply.snippets));
        }

        self.send_in_flight = false;
    }

    fn apply_send_failed(&mut self, typing_id: EntryId) {
        self.timeline.remove(typing_id);
        self.timeline.push(Entry::assistant(SEND_FAILURE_MESSAGE));
        self.send_in_flight = false;
    }

    fn apply_advice_requested(
        &mut self,
        entry_id: EntryId,
        snippets: Vec<Snippet>,
    ) -> Option<ChatEffect> {
        let Some(first) = snippets.first() else {
            tracing::debug!(
                entry_id = %entry_id.short(),
                "ignoring advice request without snippets"
            );
            return None;
        };

        if self.advice_in_flight {
            tracing::debug!(
                entry_id = %entry_id.short(),
                "ignoring advice request while one is outstanding"
            );
            return None;
        }

        if !self.targets_snippet_entry(entry_id) {
            tracing::debug!(
                entry_id = %entry_id.short(),
                "ignoring advice request for an unknown entry"
            );
            return None;
        }

        let context = first.context.clone();
        let typing_id = self.timeline.push(Entry::typing());
        self.advice_in_flight = true;

        Some(ChatEffect::FetchAdvice {
            entry_id,
            typing_id,
            context,
            snippets,
        })
    }

    fn apply_advice_succeeded(&mut self, entry_id: EntryId, typing_id: EntryId, content: String) {
        self.advice_in_flight = false;

        if !self.targets_snippet_entry(entry_id) {
            tracing::warn!(
                entry_id = %entry_id.short(),
                "dropping advice for an entry that is no longer shown"
            );
            self.timeline.remove(typing_id);
            return;
        }

        self.timeline.hide_snippets(entry_id);
        self.timeline.remove(typing_id);
        self.timeline.push(Entry::advice(content));
    }

    fn apply_advice_failed(&mut self, entry_id: EntryId, typing_id: EntryId) {
        self.advice_in_flight = false;

        if !self.targets_snippet_entry(entry_id) {
            tracing::warn!(
                entry_id = %entry_id.short(),
                "dropping advice failure for an entry that is no longer shown"
            );
            self.timeline.remove(typing_id);
            return;
        }

        self.timeline.remove_typing();
        self.timeline.push(Entry::assistant(ADVICE_FAILURE_MESSAGE));
    }

    fn targets_snippet_entry(&self, entry_id: EntryId) -> bool {
        self.timeline
            .get(entry_id)
            .is_some_and(|entry| entry.has_snippets())
    }
}
