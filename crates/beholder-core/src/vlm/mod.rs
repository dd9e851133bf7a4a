//! VLM integration for image description generation.
//!
//! Provides a provider abstraction over the Azure chat-completions backend
//! and the describe pipeline that validates, normalizes, and invokes it
//! with bounded retries.

pub(crate) mod azure;
pub(crate) mod fetch;
pub(crate) mod generator;
pub(crate) mod provider;
pub(crate) mod retry;

pub use azure::AzureProvider;
pub use generator::{DescribeInput, DescribeOutcome, Generator};
pub use provider::{ImageInput, VlmProvider, VlmRequest, VlmResponse};
