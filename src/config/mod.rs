//! Application configuration.
//!
//! Settings are persisted as `settings.toml` under the platform config dir
//! (see [`AppPaths`]); a missing file means defaults, so first runs need no
//! setup step.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, CorrectionMode, HotkeyConfig, LlmConfig, TimingConfig};
