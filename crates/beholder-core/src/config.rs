//! Configuration management for Beholder.
//!
//! Configuration comes from the environment: two named credential groups for
//! the VLM backend (primary inference endpoint, then Azure OpenAI as
//! fallback), plus knobs for the describe pipeline. Loaded once at startup
//! and read-only afterwards.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default instructional prompt sent alongside every image.
pub const DEFAULT_PROMPT: &str = "Describe this screenshot for a blind user, focusing on the most \
     important and functionally relevant parts.\n\n\
     Start with the type of screen and the application or website (if \
     visible). Then describe the main purpose of the screen and the key \
     elements a user needs to work with it: headings, buttons, forms, \
     error messages, or status information.\n\n\
     Avoid irrelevant or decorative details. Mention only elements that \
     contribute to understanding or interacting with the screen. Keep the \
     description compact and neutral.";

/// One endpoint/key/deployment triple describing a reachable VLM deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialGroup {
    /// Base endpoint URL
    pub endpoint: Option<String>,

    /// API key
    pub api_key: Option<String>,

    /// Deployment (model) name
    pub deployment: Option<String>,

    /// API version query parameter
    pub api_version: String,
}

impl CredentialGroup {
    /// A group is usable only when all three required fields are set.
    pub fn is_complete(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some() && self.deployment.is_some()
    }
}

/// Credentials selected from the first complete group.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    /// Group label for logging ("inference" or "openai")
    pub label: &'static str,
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

/// Describe pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VlmConfig {
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,

    /// Total call attempts (first try included)
    pub attempts: u32,

    /// Fixed delay between attempts in milliseconds
    pub retry_delay_ms: u64,

    /// Remote image fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for VlmConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            attempts: 3,
            retry_delay_ms: 2_000,
            fetch_timeout_ms: 15_000,
            max_tokens: 500,
            temperature: 0.3,
        }
    }
}

/// Root configuration for the Beholder service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Primary credential group (AZURE_INFERENCE_*)
    pub inference: CredentialGroup,

    /// Fallback credential group (AZURE_OPENAI_*)
    pub openai: CredentialGroup,

    /// Instructional prompt sent with every image
    pub prompt: String,

    /// Describe pipeline settings
    pub vlm: VlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inference: CredentialGroup {
                api_version: "2024-05-01-preview".to_string(),
                ..CredentialGroup::default()
            },
            openai: CredentialGroup {
                api_version: "2024-06-01".to_string(),
                ..CredentialGroup::default()
            },
            prompt: DEFAULT_PROMPT.to_string(),
            vlm: VlmConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Unset variables fall back to defaults; credential completeness is
    /// checked later by [`Config::resolve_credentials`], not here, so a
    /// process without credentials can still serve health routes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        config.inference.endpoint = env_nonempty("AZURE_INFERENCE_ENDPOINT");
        config.inference.api_key = env_nonempty("AZURE_INFERENCE_API_KEY");
        config.inference.deployment = env_nonempty("AZURE_INFERENCE_DEPLOYMENT");
        if let Some(version) = env_nonempty("AZURE_INFERENCE_API_VERSION") {
            config.inference.api_version = version;
        }

        config.openai.endpoint = env_nonempty("AZURE_OPENAI_ENDPOINT");
        config.openai.api_key = env_nonempty("AZURE_OPENAI_API_KEY");
        config.openai.deployment = env_nonempty("AZURE_OPENAI_DEPLOYMENT");
        if let Some(version) = env_nonempty("AZURE_OPENAI_API_VERSION") {
            config.openai.api_version = version;
        }

        if let Some(prompt) = env_nonempty("BEHOLDER_PROMPT") {
            config.prompt = prompt;
        }

        config.validate()?;
        Ok(config)
    }

    /// Select the first complete credential group: inference, then openai.
    ///
    /// Evaluated once at startup; the result is cached in app state for the
    /// process lifetime.
    pub fn resolve_credentials(&self) -> Result<ResolvedCredentials, ConfigError> {
        for (label, group) in [("inference", &self.inference), ("openai", &self.openai)] {
            if group.is_complete() {
                return Ok(ResolvedCredentials {
                    label,
                    // is_complete() checked all three fields above
                    endpoint: group.endpoint.clone().unwrap_or_default(),
                    api_key: group.api_key.clone().unwrap_or_default(),
                    deployment: group.deployment.clone().unwrap_or_default(),
                    api_version: group.api_version.clone(),
                });
            }
        }
        Err(ConfigError::MissingCredentials)
    }

    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.vlm.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.timeout_ms must be > 0".into(),
            ));
        }
        if self.vlm.attempts == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.attempts must be > 0".into(),
            ));
        }
        if self.vlm.fetch_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.fetch_timeout_ms must be > 0".into(),
            ));
        }
        if self.vlm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "vlm.max_tokens must be > 0".into(),
            ));
        }
        if self.prompt.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "prompt must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Read an environment variable, treating empty strings as unset.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
