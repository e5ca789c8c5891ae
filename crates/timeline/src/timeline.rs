use crate::entry::{Entry, EntryKind};
use crate::ids::EntryId;

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm Compass, your mental health companion. How are you feeling today?";
pub const SEND_FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";
pub const ADVICE_FAILURE_MESSAGE: &str =
    "Sorry, I was unable to generate advice. Please try again.";

/// Ordered conversation entries. Insertion order is display order.
///
/// Index 0 always holds the welcome entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: vec![Entry::assistant(WELCOME_MESSAGE)],
        }
    }

    /// Replaces everything with a fresh welcome entry.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Drops every entry after the welcome entry, keeping its identity.
    pub fn truncate_to_welcome(&mut self) {
        self.entries.truncate(1);
    }

    pub fn push(&mut self, entry: Entry) -> EntryId {
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Removes the entry with `id`. Returns false when it was already gone.
    ///
    /// The welcome entry is never removed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        match self.entries.iter().skip(1).position(|entry| entry.id == id) {
            Some(offset) => {
                self.entries.remove(offset + 1);
                true
            }
            None => false,
        }
    }

    /// Removes every typing placeholder and returns how many were dropped.
    pub fn remove_typing(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_typing());
        before - self.entries.len()
    }

    /// Hides the snippet grid of one entry without discarding the snippets.
    pub fn hide_snippets(&mut self, id: EntryId) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.snippets_visible = false;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn welcome(&self) -> &Entry {
        &self.entries[0]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn typing_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_typing()).count()
    }

    pub fn count_kind(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Most recent entry whose snippet grid is still shown.
    pub fn latest_snippet_entry(&self) -> Option<&Entry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.visible_snippets().is_some())
    }
}
