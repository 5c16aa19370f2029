use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

/// Environment-sourced service configuration.
///
/// Every field has a default so the service starts against a local Redis
/// and local OpenAI-compatible model endpoints with no environment at all.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: u32,
    /// Lifetime of every stored vector/text record pair.
    pub ttl_seconds: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Default number of chunks returned by a retrieval.
    pub top_k: usize,
    /// Upper bound for caller-supplied k.
    pub max_top_k: usize,
    /// Expected embedding dimension; 0 accepts whatever the model returns.
    pub embedding_dimension: usize,
    pub embedding_url: String,
    pub embedding_model: String,
    pub generation_url: String,
    pub generation_model: String,
    pub generation_api_key: Option<String>,
    pub max_new_tokens: u32,
    /// Deadline applied to every store and collaborator call.
    pub request_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_db: 0,
            ttl_seconds: 3200,
            chunk_size: 500,
            chunk_overlap: 100,
            top_k: 3,
            max_top_k: 20,
            embedding_dimension: 0,
            embedding_url: "http://localhost:8080".to_string(),
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            generation_url: "http://localhost:8081".to_string(),
            generation_model: "granite-3b-instruct".to_string(),
            generation_api_key: None,
            max_new_tokens: 100,
            request_timeout_secs: 30,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Settings::default();

        let settings = Settings {
            host: env_string("AURORA_HOST", defaults.host),
            port: env_parse("AURORA_PORT", defaults.port)?,
            redis_host: env_string("REDIS_HOST", defaults.redis_host),
            redis_port: env_parse("REDIS_PORT", defaults.redis_port)?,
            redis_db: env_parse("REDIS_DB", defaults.redis_db)?,
            ttl_seconds: env_parse("AURORA_TTL_SECONDS", defaults.ttl_seconds)?,
            chunk_size: env_parse("AURORA_CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: env_parse("AURORA_CHUNK_OVERLAP", defaults.chunk_overlap)?,
            top_k: env_parse("AURORA_TOP_K", defaults.top_k)?,
            max_top_k: env_parse("AURORA_MAX_TOP_K", defaults.max_top_k)?,
            embedding_dimension: env_parse("AURORA_EMBEDDING_DIMENSION", defaults.embedding_dimension)?,
            embedding_url: env_string("AURORA_EMBEDDING_URL", defaults.embedding_url),
            embedding_model: env_string("AURORA_EMBEDDING_MODEL", defaults.embedding_model),
            generation_url: env_string("AURORA_GENERATION_URL", defaults.generation_url),
            generation_model: env_string("AURORA_GENERATION_MODEL", defaults.generation_model),
            generation_api_key: env::var("AURORA_GENERATION_API_KEY").ok().filter(|v| !v.is_empty()),
            max_new_tokens: env_parse("AURORA_MAX_NEW_TOKENS", defaults.max_new_tokens)?,
            request_timeout_secs: env_parse("AURORA_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            cors_origins: env::var("AURORA_CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            log_dir: env::var("AURORA_LOG_DIR").ok().map(PathBuf::from),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size == 0 {
            bail!("chunk_size must be greater than zero");
        }
        if self.chunk_overlap >= self.chunk_size {
            bail!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.ttl_seconds == 0 {
            bail!("ttl_seconds must be greater than zero");
        }
        if self.top_k == 0 || self.top_k > self.max_top_k {
            bail!(
                "top_k ({}) must be between 1 and max_top_k ({})",
                self.top_k,
                self.max_top_k
            );
        }
        Ok(())
    }

    pub fn redis_url(&self) -> String {
        format!(
            "redis://{}:{}/{}",
            self.redis_host, self.redis_port, self.redis_db
        )
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_string(name: &str, default: String) -> String {
    env::var(name).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {}", name, raw)),
        _ => Ok(default),
    }
}
