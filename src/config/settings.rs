//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// CorrectionMode
// ---------------------------------------------------------------------------

/// What the language model is asked to do.
///
/// Changing the mode only affects the *next* request; a request already in
/// flight keeps the mode captured at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionMode {
    /// Fix typos, spelling and grammar only.
    Basic,
    /// Additionally correct clearly wrong factual statements.
    FactChecking,
}

impl Default for CorrectionMode {
    fn default() -> Self {
        Self::Basic
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the correction transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key — `None` for local providers.  The `TYPEFIX_API_KEY`
    /// environment variable is consulted as a fallback.
    pub api_key: Option<String>,
    /// Whether this endpoint refuses unauthenticated requests.  When `true`
    /// and no key resolves, the orchestrator surfaces a configuration error
    /// instead of dispatching.
    pub requires_api_key: bool,
    /// Model identifier sent to the API (e.g. `"qwen2.5:3b"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            requires_api_key: false,
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// TimingConfig
// ---------------------------------------------------------------------------

/// All the debounce / polling intervals in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Quiet interval after which a typing pause is reported.
    pub pause_threshold_ms: u64,
    /// Selection poll interval.
    pub selection_poll_ms: u64,
    /// How long to keep the event source paused after a programmatic edit,
    /// so the system does not observe its own correction as new input.
    pub resume_settle_ms: u64,
    /// Debounce before the correction affordance is hidden after Enter.
    pub hide_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: crate::pause::DEFAULT_PAUSE_THRESHOLD_MS,
            selection_poll_ms: 100,
            resume_settle_ms: 300,
            hide_delay_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn pause_threshold(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.pause_threshold_ms)
    }

    pub fn selection_poll(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.selection_poll_ms)
    }

    pub fn resume_settle(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resume_settle_ms)
    }

    pub fn hide_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.hide_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key that explicitly triggers a correction (e.g. `"F8"`).
    pub trigger_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            trigger_key: "F8".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use typefix::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Correction mode used for the next dispatched request.
    pub mode: CorrectionMode,
    /// Correction transport settings.
    pub llm: LlmConfig,
    /// Debounce / polling intervals.
    pub timing: TimingConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.mode, loaded.mode);
        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);
        assert_eq!(original.timing.pause_threshold_ms, loaded.timing.pause_threshold_ms);
        assert_eq!(original.timing.selection_poll_ms, loaded.timing.selection_poll_ms);
        assert_eq!(original.hotkey.trigger_key, loaded.hotkey.trigger_key);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.mode, default.mode);
        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.hotkey.trigger_key, default.hotkey.trigger_key);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.mode, CorrectionMode::Basic);
        assert_eq!(cfg.llm.base_url, "http://localhost:11434");
        assert!(!cfg.llm.requires_api_key);
        assert_eq!(cfg.timing.pause_threshold_ms, 400);
        assert_eq!(cfg.timing.selection_poll_ms, 100);
        assert_eq!(cfg.timing.hide_delay_ms, 500);
        assert_eq!(cfg.hotkey.trigger_key, "F8");
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.mode = CorrectionMode::FactChecking;
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.requires_api_key = true;
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.timing.pause_threshold_ms = 250;
        cfg.hotkey.trigger_key = "F10".into();

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.mode, CorrectionMode::FactChecking);
        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert!(loaded.llm.requires_api_key);
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
        assert_eq!(loaded.timing.pause_threshold_ms, 250);
        assert_eq!(loaded.hotkey.trigger_key, "F10");
    }
}
