mod factory;
mod fetcher;
mod mealdb;
mod spoonacular;

pub use factory::CatalogFactory;
pub use fetcher::JsonFetcher;
pub use mealdb::{MealDbCatalog, MEALDB_BASE_URL};
pub use spoonacular::{SpoonacularCatalog, SPOONACULAR_BASE_URL};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FinderError;
use crate::model::Recipe;

/// Unified trait for all upstream recipe catalogs
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Get the catalog name (e.g., "mealdb", "spoonacular")
    fn catalog_name(&self) -> &str;

    /// Fetch one random recipe
    async fn random(&self) -> Result<Recipe, FinderError>;

    /// Keyword search. Zero matches is an empty list, not an error.
    async fn search(&self, term: &str) -> Result<Vec<Recipe>, FinderError>;

    /// Fetch one recipe by its catalog id
    async fn lookup(&self, id: &str) -> Result<Recipe, FinderError>;
}

/// Records listed under `key` of a response body.
///
/// A missing or `null` list means no matches.
fn unwrap_envelope<'a>(body: &'a Value, key: &str) -> Result<&'a [Value], FinderError> {
    let object = body.as_object().ok_or_else(|| {
        FinderError::MalformedRecordError("response body is not a JSON object".to_string())
    })?;

    match object.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(FinderError::MalformedRecordError(format!(
            "expected `{key}` to be a list of records"
        ))),
    }
}
