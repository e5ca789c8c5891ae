#![deny(unsafe_code)]

//! Conversation timeline for the Compass companion.
//!
//! The timeline is driven by a pure reducer: every user action or gateway result is a
//! [`ChatEvent`], and applying it yields the new state plus at most one
//! [`ChatEffect`] describing the gateway call to perform next.

pub mod entry;
pub mod ids;
pub mod reducer;
pub mod timeline;

pub use entry::{Entry, EntryKind, MAX_SNIPPETS, MessageReply, Snippet};
pub use ids::EntryId;
pub use reducer::{ChatEffect, ChatEvent, ChatState};
pub use timeline::{ADVICE_FAILURE_MESSAGE, SEND_FAILURE_MESSAGE, Timeline, WELCOME_MESSAGE};
