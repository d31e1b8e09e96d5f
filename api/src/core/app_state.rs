use std::sync::Arc;
use std::time::Duration;

use embed_client::{EmbedModelConfig, OpenAiEmbedService};
use rec_store::embed::{CachedEmbedder, EmbeddingsProvider, OpenAiEmbedder};
use rec_store::sources::{BlogDirSource, YoutubePlaylistSource};
use rec_store::store::{MemoryStore, QdrantStore, VectorStore};
use rec_store::sync::SyncOptions;
use rec_store::{RecommendConfig, StoreBackend, StoreConfig};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Vector store backend, selected by `STORE_BACKEND`.
    pub store: Arc<dyn VectorStore>,
    /// Cached embedding provider shared by sync and query paths.
    pub embedder: Arc<dyn EmbeddingsProvider>,
    /// Blog post directory adapter.
    pub blog: BlogDirSource,
    /// Paginated playlist adapter.
    pub youtube: YoutubePlaylistSource,
    pub recommend_cfg: RecommendConfig,
    pub sync_opts: SyncOptions,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// Everything is constructed exactly once here and injected into
    /// handlers; failures are startup failures.
    pub async fn from_env() -> Result<Self, AppError> {
        let embedding_dim = env_parse("EMBEDDING_DIM", 1536)?;

        let embed_cfg = EmbedModelConfig {
            model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".into()),
            endpoint: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".into()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            timeout_secs: Some(env_parse("EMBED_TIMEOUT_SECS", 60)?),
            max_input_chars: env_parse("EMBED_MAX_INPUT_CHARS", 32_000)?,
        };
        let svc = OpenAiEmbedService::new(embed_cfg)
            .map_err(|e| AppError::Config(format!("embedding client: {e}")))?;
        let cache_capacity = env_parse("EMBED_CACHE_CAPACITY", 200)?;
        let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(CachedEmbedder::new(
            Box::new(OpenAiEmbedder::new(Arc::new(svc), embedding_dim)),
            cache_capacity,
        ));

        let backend = StoreBackend::parse(
            &std::env::var("STORE_BACKEND").unwrap_or_else(|_| "qdrant".into()),
        )?;
        let store_cfg = StoreConfig {
            backend,
            qdrant_url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6334".into()),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: std::env::var("QDRANT_COLLECTION").unwrap_or_else(|_| "content".into()),
            embedding_dim,
        };
        let store: Arc<dyn VectorStore> = match backend {
            StoreBackend::Qdrant => Arc::new(QdrantStore::connect(&store_cfg).await?),
            StoreBackend::Memory => Arc::new(MemoryStore::new(embedding_dim)),
        };

        let blog = BlogDirSource::new(must_env("BLOG_POSTS_DIR")?, must_env("SITE_BASE_URL")?);
        let youtube = YoutubePlaylistSource::new(
            std::env::var("YOUTUBE_API_BASE")
                .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".into()),
            must_env("YOUTUBE_API_KEY")?,
            must_env("YOUTUBE_PLAYLIST_ID")?,
            Duration::from_secs(env_parse("SOURCE_TIMEOUT_SECS", 30)?),
        )?;

        let recommend_cfg = RecommendConfig {
            max_query_chars: env_parse("MAX_QUERY_CHARS", 100)?,
            default_k: env_parse("RECOMMEND_DEFAULT_K", 5)?,
        };
        let sync_opts = SyncOptions {
            force_refresh: false,
            embed_concurrency: env_parse("EMBED_CONCURRENCY", 4)?,
        };

        Ok(Self {
            store,
            embedder,
            blog,
            youtube,
            recommend_cfg,
            sync_opts,
        })
    }
}

/// Fetches a required, non-empty environment variable.
fn must_env(name: &'static str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingEnv(name)),
    }
}

/// Parses an optional numeric environment variable, with default.
fn env_parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, AppError> {
    match std::env::var(name) {
        Ok(v) => v
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("invalid number in {name}: {v}"))),
        Err(_) => Ok(default),
    }
}
