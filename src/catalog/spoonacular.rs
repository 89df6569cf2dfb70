use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Url;

use super::{unwrap_envelope, JsonFetcher, RecipeCatalog};
use crate::adapters::AdapterRegistry;
use crate::config::CatalogConfig;
use crate::error::FinderError;
use crate::model::Recipe;

pub const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// Spoonacular catalog: rich records, `apiKey` on every request
pub struct SpoonacularCatalog {
    fetcher: JsonFetcher,
    base_url: String,
    api_key: String,
    search_limit: u32,
    adapters: AdapterRegistry,
}

impl SpoonacularCatalog {
    /// Create a new Spoonacular catalog from configuration
    pub fn new(
        config: &CatalogConfig,
        search_limit: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, FinderError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                FinderError::BuilderError(
                    "SPOONACULAR_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| SPOONACULAR_BASE_URL.to_string());

        Ok(SpoonacularCatalog {
            fetcher: JsonFetcher::new(timeout)?,
            base_url,
            api_key,
            search_limit,
            adapters: AdapterRegistry::default(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, FinderError> {
        let config = CatalogConfig {
            api_key: Some(api_key.into()),
            base_url: Some(base_url.into()),
            ..Default::default()
        };
        Self::new(&config, 12, None)
    }

    /// `{base}/recipes/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<String, FinderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FinderError::TransportError(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| FinderError::TransportError("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .push("recipes")
            .extend(segments);
        Ok(url.to_string())
    }
}

#[async_trait]
impl RecipeCatalog for SpoonacularCatalog {
    fn catalog_name(&self) -> &str {
        "spoonacular"
    }

    async fn random(&self) -> Result<Recipe, FinderError> {
        let url = self.endpoint(&["random"])?;
        let body = self
            .fetcher
            .get_json(&url, &[("apiKey", self.api_key.as_str()), ("number", "1")])
            .await?;
        let record = unwrap_envelope(&body, "recipes")?.first().ok_or_else(|| {
            FinderError::MalformedRecordError("random lookup returned no recipe".to_string())
        })?;

        self.adapters.normalize(record)
    }

    async fn search(&self, term: &str) -> Result<Vec<Recipe>, FinderError> {
        let url = self.endpoint(&["complexSearch"])?;
        let limit = self.search_limit.to_string();
        let body = self
            .fetcher
            .get_json(
                &url,
                &[
                    ("apiKey", self.api_key.as_str()),
                    ("query", term),
                    ("number", limit.as_str()),
                    ("addRecipeInformation", "true"),
                ],
            )
            .await?;
        let records = unwrap_envelope(&body, "results")?;
        debug!("spoonacular search '{}' matched {} records", term, records.len());

        self.adapters.normalize_all(records)
    }

    async fn lookup(&self, id: &str) -> Result<Recipe, FinderError> {
        let url = self.endpoint(&[id, "information"])?;
        let body = self
            .fetcher
            .get_json(&url, &[("apiKey", self.api_key.as_str())])
            .await?;

        if body.is_null() {
            return Err(FinderError::NotFound(id.to_string()));
        }
        self.adapters.normalize(&body)
    }
}
