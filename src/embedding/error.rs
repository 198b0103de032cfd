use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed empty text")]
    EmptyInput,

    #[error("embedding request to {endpoint} failed: {reason}")]
    RequestFailed { endpoint: String, reason: String },

    #[error("embedding endpoint {endpoint} returned {status}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EmbeddingError {
    /// Returns `true` when the embedding service could not be reached or refused the call.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::UnexpectedStatus { .. }
        )
    }
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        EmbeddingError::RequestFailed {
            endpoint,
            reason: err.to_string(),
        }
    }
}
