//! Credential lookup seam.
//!
//! The secret itself lives with an external provider (config file, keychain,
//! environment); the core only asks whether a key exists.  A missing key is
//! a user-facing configuration failure, never a crash — the orchestrator
//! checks before dispatching and surfaces the problem instead of sending a
//! doomed request.

use crate::config::LlmConfig;

/// Environment variable consulted when the config carries no key.
pub const API_KEY_ENV_VAR: &str = "TYPEFIX_API_KEY";

// ---------------------------------------------------------------------------
// CredentialProvider
// ---------------------------------------------------------------------------

/// Source of the transport API key.
pub trait CredentialProvider: Send + Sync {
    /// The key, or `None` when not configured.  Empty strings count as
    /// missing.
    fn api_key(&self) -> Option<String>;
}

// ---------------------------------------------------------------------------
// ConfigCredentials
// ---------------------------------------------------------------------------

/// Resolves the key from config first, then from `TYPEFIX_API_KEY`.
///
/// Resolution happens once at construction; a key edited mid-run takes
/// effect on restart.
pub struct ConfigCredentials {
    key: Option<String>,
}

impl ConfigCredentials {
    pub fn from_config(config: &LlmConfig) -> Self {
        let key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.is_empty()));
        Self { key }
    }

    /// Build from an explicit key (useful for tests).
    pub fn with_key(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
        }
    }
}

impl CredentialProvider for ConfigCredentials {
    fn api_key(&self) -> Option<String> {
        self.key.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_returned() {
        let creds = ConfigCredentials::with_key(Some("sk-abc".into()));
        assert_eq!(creds.api_key().as_deref(), Some("sk-abc"));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let creds = ConfigCredentials::with_key(Some(String::new()));
        assert!(creds.api_key().is_none());
    }

    #[test]
    fn absent_key_is_none() {
        let creds = ConfigCredentials::with_key(None);
        assert!(creds.api_key().is_none());
    }

    #[test]
    fn config_key_wins_over_environment() {
        let mut config = LlmConfig::default();
        config.api_key = Some("from-config".into());
        let creds = ConfigCredentials::from_config(&config);
        assert_eq!(creds.api_key().as_deref(), Some("from-config"));
    }
}
