use anyhow::Context;
use serde::Deserialize;

use crate::domain::splitter::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATOR};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about \
the user's uploaded documents. Answer only from the provided context; say so when the context \
does not contain the answer.";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    pub separator: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                max_upload_bytes: 32 * 1024 * 1024,
                session_ttl_seconds: 3600,
            },
            llm: LlmConfig {
                model: "gpt-4o-mini".to_string(),
                system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
            },
            chunking: ChunkingConfig {
                separator: DEFAULT_SEPARATOR.to_string(),
                chunk_size: DEFAULT_CHUNK_SIZE,
                chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            },
            retrieval: RetrievalConfig { top_k: 4 },
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults. `OPENAI_API_KEY` is consumed by the rig provider clients
    /// directly and is not part of this struct.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.server.port = port.parse().context("invalid SERVER_PORT")?;
        }
        if let Ok(bytes) = std::env::var("MAX_UPLOAD_BYTES") {
            config.server.max_upload_bytes = bytes.parse().context("invalid MAX_UPLOAD_BYTES")?;
        }
        if let Ok(ttl) = std::env::var("SESSION_TTL_SECONDS") {
            config.server.session_ttl_seconds =
                ttl.parse().context("invalid SESSION_TTL_SECONDS")?;
        }
        if let Ok(model) = std::env::var("CHAT_MODEL") {
            config.llm.model = model;
        }
        if let Ok(prompt) = std::env::var("SYSTEM_PROMPT") {
            config.llm.system_prompt = prompt;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(dim) = std::env::var("EMBEDDING_DIMENSION") {
            config.embedding.dimension = dim.parse().context("invalid EMBEDDING_DIMENSION")?;
        }
        if let Ok(size) = std::env::var("CHUNK_SIZE") {
            config.chunking.chunk_size = size.parse().context("invalid CHUNK_SIZE")?;
        }
        if let Ok(overlap) = std::env::var("CHUNK_OVERLAP") {
            config.chunking.chunk_overlap = overlap.parse().context("invalid CHUNK_OVERLAP")?;
        }
        if let Ok(top_k) = std::env::var("RETRIEVAL_TOP_K") {
            config.retrieval.top_k = top_k.parse().context("invalid RETRIEVAL_TOP_K")?;
        }

        Ok(config)
    }
}
