use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::error::FinderError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; RecipeFinder/0.3)";

/// HTTP GET client that decodes JSON bodies
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FinderError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` with the given query parameters and parse the body as JSON
    ///
    /// Non-2xx statuses and undecodable bodies are transport failures.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FinderError> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinderError::TransportError(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            FinderError::TransportError(format!("invalid JSON from {}: {}", url, e))
        })
    }
}
