pub mod state;

pub use state::{AppSettings, SettingsStore};
