use std::fmt;

use uuid::Uuid;

/// Stable identifier for one timeline entry.
///
/// Every constructor mints a fresh v7 UUID, so identifiers are never reused even
/// after the timeline is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// First eight hex digits, enough to tell entries apart in terminal output.
    pub fn short(&self) -> String {
        let mut raw = self.0.simple().to_string();
        raw.truncate(8);
        raw
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
