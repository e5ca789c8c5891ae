use std::fmt::Write;

use compass_timeline::{Entry, EntryKind, Timeline};

pub const TYPING_LINE: &str = "compass is typing...";
pub const ADVICE_HINT: &str = "Type /advice for personalized advice based on these responses.";
pub const NO_SNIPPETS_LINE: &str = "No reference responses found for this message.";

/// Renders the whole timeline as plain terminal text.
pub fn render_timeline(timeline: &Timeline) -> String {
    let mut out = String::new();
    for entry in timeline.entries() {
        render_entry(entry, &mut out);
    }
    out
}

pub fn render_entry(entry: &Entry, out: &mut String) {
    let content = entry.content.as_deref().unwrap_or_default();

    match entry.kind {
        EntryKind::User => {
            let _ = writeln!(out, "you> {content}");
        }
        EntryKind::Assistant => {
            // Snippet-only entries have no text bubble.
            if entry.content.is_some() {
                let _ = writeln!(out, "compass> {content}");
            }
        }
        EntryKind::Crisis => {
            let _ = writeln!(out, "!! {content}");
        }
        EntryKind::Typing => {
            let _ = writeln!(out, "{TYPING_LINE}");
        }
        EntryKind::Advice => {
            let _ = writeln!(out, "compass (advice)> {content}");
        }
    }

    if let Some(snippets) = entry.visible_snippets() {
        if snippets.is_empty() {
            let _ = writeln!(out, "  {NO_SNIPPETS_LINE}");
            return;
        }

        for (index, snippet) in snippets.iter().enumerate() {
            let _ = writeln!(out, "  [{}] Q: {}", index + 1, snippet.context);
            let _ = writeln!(out, "      A: {}", snippet.response);
            let _ = writeln!(
                out,
                "      Relevance score: {}%",
                snippet.relevance_percent()
            );
        }
        let _ = writeln!(out, "  {ADVICE_HINT}");
    }
}
