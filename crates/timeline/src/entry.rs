use serde::{Deserialize, Serialize};

use crate::ids::EntryId;

/// Maximum number of reference snippets kept on one assistant entry.
pub const MAX_SNIPPETS: usize = 5;

/// A retrieved reference passage with its relevance score.
///
/// Field names on the wire follow the backend's Q&A dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(rename = "Context")]
    pub context: String,
    #[serde(rename = "Response")]
    pub response: String,
    pub score: f64,
}

impl Snippet {
    pub fn new(context: impl Into<String>, response: impl Into<String>, score: f64) -> Self {
        Self {
            context: context.into(),
            response: response.into(),
            score,
        }
    }

    /// Score rounded for display. The backend reports a 0..100 hybrid score.
    pub fn relevance_percent(&self) -> i64 {
        self.score.round() as i64
    }
}

/// Gateway answer to one user message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReply {
    #[serde(default)]
    pub crisis: bool,
    #[serde(default)]
    pub hotline: Option<String>,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

impl MessageReply {
    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            crisis: false,
            hotline: None,
            snippets,
        }
    }

    pub fn crisis(hotline: impl Into<String>) -> Self {
        Self {
            crisis: true,
            hotline: Some(hotline.into()),
            snippets: Vec::new(),
        }
    }

    /// Hotline text when this reply is a crisis turn.
    ///
    /// A crisis flag without hotline text falls back to a normal turn. Any
    /// non-empty text, even whitespace, keeps the turn a crisis turn.
    pub fn crisis_hotline(&self) -> Option<&str> {
        if !self.crisis {
            return None;
        }

        self.hotline.as_deref().filter(|hotline| !hotline.is_empty())
    }
}

/// Kind tag of a timeline entry. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    User,
    Assistant,
    Crisis,
    Typing,
    Advice,
}

/// One item of the displayed conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub content: Option<String>,
    pub snippets: Option<Vec<Snippet>>,
    pub snippets_visible: bool,
}

impl Entry {
    fn with_content(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            id: EntryId::new_v7(),
            kind,
            content: Some(content.into()),
            snippets: None,
            snippets_visible: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_content(EntryKind::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_content(EntryKind::Assistant, content)
    }

    pub fn crisis(hotline: impl Into<String>) -> Self {
        Self::with_content(EntryKind::Crisis, hotline)
    }

    pub fn advice(content: impl Into<String>) -> Self {
        Self::with_content(EntryKind::Advice, content)
    }

    /// Transient placeholder shown while a gateway call is outstanding.
    pub fn typing() -> Self {
        Self::with_content(EntryKind::Typing, String::new())
    }

    /// Assistant entry carrying reference snippets instead of text.
    ///
    /// Only the first [`MAX_SNIPPETS`] snippets are kept, in the order given.
    pub fn snippets(mut snippets: Vec<Snippet>) -> Self {
        snippets.truncate(MAX_SNIPPETS);
        Self {
            id: EntryId::new_v7(),
            kind: EntryKind::Assistant,
            content: None,
            snippets: Some(snippets),
            snippets_visible: true,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.kind == EntryKind::Typing
    }

    pub fn has_snippets(&self) -> bool {
        self.snippets.is_some()
    }

    /// Snippets to render, if any are attached and still visible.
    pub fn visible_snippets(&self) -> Option<&[Snippet]> {
        match &self.snippets {
            Some(snippets) if self.snippets_visible => Some(snippets),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_uses_backend_field_names() {
        let snippet: Snippet = serde_json::from_str(
            r#"{"Context": "I can't sleep", "Response": "Try a wind-down routine", "score": 81.4}"#,
        )
        .expect("snippet should deserialize");

        assert_eq!(snippet.context, "I can't sleep");
        assert_eq!(snippet.response, "Try a wind-down routine");
        assert_eq!(snippet.relevance_percent(), 81);

        let encoded = serde_json::to_value(&snippet).expect("snippet should serialize");
        assert_eq!(encoded["Context"], "I can't sleep");
        assert_eq!(encoded["Response"], "Try a wind-down routine");
    }

    #[test]
    fn reply_defaults_missing_fields() {
        let reply: MessageReply = serde_json::from_str("{}").expect("empty reply is valid");
        assert!(!reply.crisis);
        assert!(reply.hotline.is_none());
        assert!(reply.snippets.is_empty());
    }

    #[test]
    fn crisis_without_hotline_text_is_not_a_crisis_turn() {
        let mut reply = MessageReply::crisis("");
        assert_eq!(reply.crisis_hotline(), None);

        reply.hotline = None;
        assert_eq!(reply.crisis_hotline(), None);

        reply.crisis = false;
        reply.hotline = Some("Call or text 988".to_string());
        assert_eq!(reply.crisis_hotline(), None);
    }

    #[test]
    fn whitespace_hotline_still_marks_a_crisis_turn() {
        let reply = MessageReply::crisis("   ");
        assert_eq!(reply.crisis_hotline(), Some("   "));

        let reply = MessageReply::crisis("988 Suicide & Crisis Lifeline - Call or text 988");
        assert_eq!(
            reply.crisis_hotline(),
            Some("988 Suicide & Crisis Lifeline - Call or text 988")
        );
    }

    #[test]
    fn snippet_entry_keeps_first_five_in_order() {
        let snippets = (0..8)
            .map(|index| {
                Snippet::new(format!("q{index}"), format!("a{index}"), 90.0 - index as f64)
            })
            .collect::<Vec<_>>();

        let entry = Entry::snippets(snippets);
        let kept = entry.snippets.as_deref().unwrap_or_default();

        assert_eq!(kept.len(), MAX_SNIPPETS);
        let contexts = kept.iter().map(|s| s.context.as_str()).collect::<Vec<_>>();
        assert_eq!(contexts, ["q0", "q1", "q2", "q3", "q4"]);
        assert!(entry.content.is_none());
        assert!(entry.snippets_visible);
    }

    #[test]
    fn hidden_snippets_are_not_visible() {
        let mut entry = Entry::snippets(vec![Snippet::new("q", "a", 50.0)]);
        assert!(entry.visible_snippets().is_some());

        entry.snippets_visible = false;
        assert!(entry.visible_snippets().is_none());
        assert!(entry.has_snippets());
    }
}
