use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubgraphError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("graphql error: {0}")]
    GraphQl(String),
    #[error("response carried neither data nor errors")]
    EmptyResponse,
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SubgraphError {
    /// Transport failures are worth another attempt; a well-formed error
    /// response from the subgraph is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_))
    }
}
