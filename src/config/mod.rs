//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `LECTIO_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CORPUS_PATH, DEFAULT_EMBEDDING_CACHE_CAPACITY, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_LIMIT,
};
use crate::corpus::CorpusSource;
use crate::embedding::HttpEmbedderConfig;
use crate::engine::Backend;

/// Retrieval configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `LECTIO_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Corpus file path or `http(s)://` URL. Default: `biblia.txt`.
    pub corpus_location: String,

    /// Pre-built vector index (binary or JSON).
    pub index_path: Option<PathBuf>,

    /// Retrieval backend. Default: lexical.
    pub backend: Backend,

    /// Passages per query. Default: `7`.
    pub limit: usize,

    /// Character budget for the assembled context.
    pub max_context_chars: Option<usize>,

    /// Ollama-compatible embedder base URL. Without it the stub embedder is used.
    pub embedder_url: Option<String>,

    /// Model requested from the embedder. Default: `nomic-embed-text`.
    pub embedding_model: String,

    /// Max cached query embeddings. Default: `1024`.
    pub embedding_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_location: DEFAULT_CORPUS_PATH.to_string(),
            index_path: None,
            backend: Backend::default(),
            limit: DEFAULT_LIMIT,
            max_context_chars: None,
            embedder_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_cache_capacity: DEFAULT_EMBEDDING_CACHE_CAPACITY,
        }
    }
}

impl Config {
    const ENV_CORPUS_PATH: &'static str = "LECTIO_CORPUS_PATH";
    const ENV_INDEX_PATH: &'static str = "LECTIO_INDEX_PATH";
    const ENV_BACKEND: &'static str = "LECTIO_BACKEND";
    const ENV_LIMIT: &'static str = "LECTIO_LIMIT";
    const ENV_MAX_CONTEXT_CHARS: &'static str = "LECTIO_MAX_CONTEXT_CHARS";
    const ENV_EMBEDDER_URL: &'static str = "LECTIO_EMBEDDER_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "LECTIO_EMBEDDING_MODEL";
    const ENV_EMBEDDING_CACHE: &'static str = "LECTIO_EMBEDDING_CACHE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let corpus_location =
            Self::parse_string_from_env(Self::ENV_CORPUS_PATH, defaults.corpus_location);
        let index_path = Self::parse_optional_string_from_env(Self::ENV_INDEX_PATH)
            .map(PathBuf::from);
        let backend = Self::parse_backend_from_env(defaults.backend)?;
        let limit = Self::parse_limit_from_env(defaults.limit)?;
        let max_context_chars = Self::parse_context_budget_from_env()?;
        let embedder_url = Self::parse_optional_string_from_env(Self::ENV_EMBEDDER_URL);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_EMBEDDING_CACHE,
            defaults.embedding_cache_capacity,
        );

        Ok(Self {
            corpus_location,
            index_path,
            backend,
            limit,
            max_context_chars,
            embedder_url,
            embedding_model,
            embedding_cache_capacity,
        })
    }

    /// Validates paths and option combinations.
    ///
    /// Missing corpus or index files are not errors here: they surface as unavailable
    /// backends at query time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sources()?;

        if let Some(ref path) = self.index_path
            && path.is_dir()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        if self.backend == Backend::Semantic && self.index_path.is_none() {
            return Err(ConfigError::MissingIndexPath {
                backend: self.backend.to_string(),
            });
        }

        Ok(())
    }

    /// Validates the corpus location and embedder URL only.
    ///
    /// This is what building an index reads; the index path and backend are ignored.
    pub fn validate_sources(&self) -> Result<(), ConfigError> {
        if let CorpusSource::File(path) = self.corpus_source()
            && path.is_dir()
        {
            return Err(ConfigError::NotAFile { path });
        }

        if let Some(ref url) = self.embedder_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEmbedderUrl { value: url.clone() });
        }

        Ok(())
    }

    /// Where the corpus text is read from.
    pub fn corpus_source(&self) -> CorpusSource {
        CorpusSource::parse(&self.corpus_location)
    }

    /// HTTP embedder settings, when an embedder URL is configured.
    pub fn http_embedder_config(&self) -> Option<HttpEmbedderConfig> {
        self.embedder_url.as_ref().map(|url| HttpEmbedderConfig {
            base_url: url.clone(),
            model: self.embedding_model.clone(),
            ..HttpEmbedderConfig::default()
        })
    }

    fn parse_backend_from_env(default: Backend) -> Result<Backend, ConfigError> {
        match env::var(Self::ENV_BACKEND) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::UnknownBackend { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_limit_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_LIMIT) {
            Ok(value) => {
                let limit = Self::parse_usize(Self::ENV_LIMIT, &value)?;
                if limit == 0 {
                    return Err(ConfigError::InvalidLimit { value });
                }
                Ok(limit)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_context_budget_from_env() -> Result<Option<usize>, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_MAX_CONTEXT_CHARS) {
            Some(value) => {
                let budget = Self::parse_usize(Self::ENV_MAX_CONTEXT_CHARS, &value)?;
                if budget == 0 {
                    return Err(ConfigError::InvalidContextBudget { value });
                }
                Ok(Some(budget))
            }
            None => Ok(None),
        }
    }

    fn parse_usize(name: &'static str, value: &str) -> Result<usize, ConfigError> {
        value.trim().parse().map_err(|e| ConfigError::ParseInt {
            name,
            value: value.to_string(),
            source: e,
        })
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
