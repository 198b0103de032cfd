use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use super::{Corpus, CorpusError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the raw corpus text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// Local UTF-8 text file.
    File(PathBuf),
    /// `http://` or `https://` URL fetched once at startup.
    Url(String),
}

impl CorpusSource {
    /// Interprets a configured location: URLs by scheme, anything else as a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Reads the raw text. Any failure is reported as [`CorpusError::Unavailable`].
    pub async fn fetch(&self) -> Result<String, CorpusError> {
        match self {
            Self::File(path) => {
                debug!(path = %path.display(), "reading corpus file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| self.unavailable(e))
            }
            Self::Url(url) => {
                debug!(%url, "fetching corpus");
                let client = reqwest::Client::builder()
                    .timeout(FETCH_TIMEOUT)
                    .build()
                    .map_err(|e| self.unavailable(e))?;

                client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| self.unavailable(e))?
                    .text()
                    .await
                    .map_err(|e| self.unavailable(e))
            }
        }
    }

    /// Fetches and parses the corpus.
    pub async fn load(&self) -> Result<Corpus, CorpusError> {
        let raw = self.fetch().await?;
        let corpus = Corpus::parse(&raw);

        info!(
            source = %self,
            records = corpus.len(),
            mode = ?corpus.mode(),
            fingerprint = %corpus.fingerprint(),
            "corpus loaded"
        );

        Ok(corpus)
    }

    fn unavailable(&self, err: impl fmt::Display) -> CorpusError {
        CorpusError::Unavailable {
            location: self.to_string(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}
