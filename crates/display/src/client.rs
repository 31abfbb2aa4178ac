use std::future::Future;

use reqwest::Client;
use signage_core::Dataset;
use thiserror::Error;

/// A failed `GET /api/data`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid dataset: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where datasets come from.
pub trait DatasetSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Dataset, FetchError>> + Send;
}

/// Content store client talking to the data service over HTTP.
pub struct HttpDatasetSource {
    client: Client,
    url: String,
}

impl HttpDatasetSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
