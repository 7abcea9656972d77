pub mod config;
pub mod dispatch;
pub mod intent;
pub mod models;

pub use config::{ConfigError, Credentials, LlmSettings, Settings};
pub use dispatch::{dispatch, dispatch_label};
pub use intent::{classify_fallback, normalize_label, normalize_text};
pub use models::*;
