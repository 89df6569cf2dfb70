use crate::catalog::{MealDbCatalog, RecipeCatalog, SpoonacularCatalog};
use crate::config::{CatalogKind, FinderConfig};
use crate::error::FinderError;

pub struct CatalogFactory;

impl CatalogFactory {
    /// Create a catalog instance from configuration
    pub fn create(config: &FinderConfig) -> Result<Box<dyn RecipeCatalog>, FinderError> {
        let timeout = Some(config.http_timeout());

        match config.catalog.kind {
            CatalogKind::MealDb => Ok(Box::new(MealDbCatalog::new(
                config.catalog.base_url.clone(),
                timeout,
            )?)),
            CatalogKind::Spoonacular => Ok(Box::new(SpoonacularCatalog::new(
                &config.catalog,
                config.search_limit,
                timeout,
            )?)),
        }
    }

    /// List all available catalog names
    pub fn available_catalogs() -> Vec<&'static str> {
        vec!["mealdb", "spoonacular"]
    }
}
