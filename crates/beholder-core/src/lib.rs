//! Beholder Core - VLM image description library.
//!
//! Beholder forwards an image (inline base64 or a fetched URL) to a hosted
//! vision-language model and returns a natural-language description.
//!
//! # Architecture
//!
//! ```text
//! DescribeInput → validate → normalize (fetch URL / wrap data URL)
//!               → VLM call (bounded retries on 5xx) → DescribeOutcome
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use beholder_core::{AzureProvider, Config, DescribeInput, Generator};
//!
//! let config = Config::from_env()?;
//! let credentials = config.resolve_credentials()?;
//! let provider = AzureProvider::new(&credentials, config.vlm.timeout_ms);
//! let generator = Generator::new(Box::new(provider), config.prompt.clone(), config.vlm.clone());
//!
//! let outcome = generator.describe(DescribeInput {
//!     image_url: Some("https://example.com/screen.png".into()),
//!     ..Default::default()
//! }).await?;
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod vlm;

// Re-exports for convenient access
pub use config::{Config, CredentialGroup, ResolvedCredentials, VlmConfig, DEFAULT_PROMPT};
pub use error::{BeholderError, ConfigError, DescribeError, DescribeResult, Result};
pub use vlm::{
    AzureProvider, DescribeInput, DescribeOutcome, Generator, ImageInput, VlmProvider, VlmRequest,
    VlmResponse,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
