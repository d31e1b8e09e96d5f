//! HTTP client for an OpenAI-compatible embeddings endpoint.
//!
//! This crate provides:
//! - [`EmbedModelConfig`] — model id, endpoint, auth and limits
//! - [`OpenAiEmbedService`] — a thin `reqwest` client for `/v1/embeddings`
//! - [`EmbedError`] — unified error type for config, transport and decode
//!   failures
//!
//! The client performs exactly one network call per invocation and never
//! retries; memoization and retry policy belong to the caller.

mod config;
mod errors;
mod service;

pub use config::EmbedModelConfig;
pub use errors::{EmbedError, Result, make_snippet};
pub use service::OpenAiEmbedService;
