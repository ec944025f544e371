use std::time::Duration;

use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::SubgraphError;

/// Maximum attempts per query
const MAX_RETRIES: u32 = 3;

/// Delay between retries (exponential backoff base)
const RETRY_DELAY_MS: u64 = 100;

/// GraphQL-over-HTTP client for one subgraph endpoint.
///
/// Partial responses are accepted: when the subgraph returns both `data` and
/// `errors`, the errors are logged and the data is used.
#[derive(Clone)]
pub struct SubgraphClient {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

impl SubgraphClient {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            timeout,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Runs `query` with `variables`, retrying transport failures with
    /// exponential backoff.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, SubgraphError> {
        let mut attempt = 0;
        loop {
            match self.query_once(query, &variables).await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES - 1 => {
                    let delay = Duration::from_millis(RETRY_DELAY_MS * 2_u64.pow(attempt));
                    debug!(
                        "Subgraph query to {} failed (attempt {}/{}), retrying in {:?}: {}",
                        self.url,
                        attempt + 1,
                        MAX_RETRIES,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn query_once<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
    ) -> Result<T, SubgraphError> {
        let request = self
            .http
            .post(self.url.clone())
            .json(&GraphQlRequest { query, variables })
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| SubgraphError::Timeout(self.timeout))??
            .error_for_status()?;

        let body: GraphQlResponse<T> = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| SubgraphError::Timeout(self.timeout))??;

        into_data(body, &self.url)
    }
}

fn into_data<T>(response: GraphQlResponse<T>, url: &Url) -> Result<T, SubgraphError> {
    let messages = || {
        response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!("Subgraph {} returned partial data: {}", url, messages());
            }
            Ok(data)
        },
        None if !response.errors.is_empty() => Err(SubgraphError::GraphQl(messages())),
        None => Err(SubgraphError::EmptyResponse),
    }
}
