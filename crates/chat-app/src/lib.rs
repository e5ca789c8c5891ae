#![deny(unsafe_code)]

//! Terminal client for the Compass mental health companion.
//!
//! The session drives the timeline reducer against the gateway; everything else in
//! this crate is configuration and presentation.

pub mod advice;
pub mod command;
pub mod error;
/// Plain-text rendering of the timeline.
pub mod render;
pub mod session;
/// Layered settings loading.
pub mod settings;

pub use advice::{TextAccumulator, read_advice};
pub use command::{Command, HELP_TEXT};
pub use error::AppError;
pub use session::ChatSession;
