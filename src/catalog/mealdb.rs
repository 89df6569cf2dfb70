use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::{unwrap_envelope, JsonFetcher, RecipeCatalog};
use crate::adapters::AdapterRegistry;
use crate::error::FinderError;
use crate::model::Recipe;

pub const MEALDB_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// TheMealDB catalog: `{"meals": [...]}` envelopes of flattened records
pub struct MealDbCatalog {
    fetcher: JsonFetcher,
    base_url: String,
    adapters: AdapterRegistry,
}

impl MealDbCatalog {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, FinderError> {
        let base_url = base_url.unwrap_or_else(|| MEALDB_BASE_URL.to_string());

        Ok(MealDbCatalog {
            fetcher: JsonFetcher::new(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            adapters: AdapterRegistry::default(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FinderError> {
        Self::new(Some(base_url.into()), None)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl RecipeCatalog for MealDbCatalog {
    fn catalog_name(&self) -> &str {
        "mealdb"
    }

    async fn random(&self) -> Result<Recipe, FinderError> {
        let body = self.fetcher.get_json(&self.endpoint("random.php"), &[]).await?;
        let record = unwrap_envelope(&body, "meals")?.first().ok_or_else(|| {
            FinderError::MalformedRecordError("random lookup returned no meal".to_string())
        })?;

        self.adapters.normalize(record)
    }

    async fn search(&self, term: &str) -> Result<Vec<Recipe>, FinderError> {
        let body = self
            .fetcher
            .get_json(&self.endpoint("search.php"), &[("s", term)])
            .await?;
        let records = unwrap_envelope(&body, "meals")?;
        debug!("mealdb search '{}' matched {} records", term, records.len());

        self.adapters.normalize_all(records)
    }

    async fn lookup(&self, id: &str) -> Result<Recipe, FinderError> {
        let body = self
            .fetcher
            .get_json(&self.endpoint("lookup.php"), &[("i", id)])
            .await?;
        let record = unwrap_envelope(&body, "meals")?
            .first()
            .ok_or_else(|| FinderError::NotFound(id.to_string()))?;

        self.adapters.normalize(record)
    }
}
