//! Embedding synchronization and retrieval core.
//!
//! This crate provides a clean API to:
//! - List content from sources (a blog post directory, a paginated
//!   playlist API) and deduplicate against what is already embedded
//! - Generate embeddings through a cached, rate/cost-sensitive provider
//! - Persist vectors with display metadata in Qdrant or in memory
//! - Answer top-K similarity queries with deterministic ranking
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules.

mod config;
mod errors;
mod record;

pub mod embed;
pub mod recommend;
pub mod sources;
pub mod store;
pub mod sync;

pub use config::{RecommendConfig, StoreBackend, StoreConfig};
pub use errors::RecError;
pub use record::{ContentCategory, ContentItem, QueryResult, SourceItem, StoredItem, SyncReport};
