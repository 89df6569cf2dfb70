pub mod adapters;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod finder;
pub mod model;
pub mod state;

// Re-export commonly used types
pub use adapters::{AdapterRegistry, SourceAdapter};
pub use catalog::{CatalogFactory, RecipeCatalog};
pub use config::{CatalogKind, FinderConfig};
pub use error::FinderError;
pub use favorites::FavoritesSet;
pub use finder::{RecipeFinder, RecipeFinderBuilder};
pub use model::{Ingredient, Recipe};
pub use state::{DetailState, ListState, OperationKind, OperationOutcome, Phase, Snapshot};

/// Search the configured catalog once, without any state tracking
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = recipe_finder::search_recipes("arrabiata").await?;
/// for recipe in recipes {
///     println!("{} ({})", recipe.title, recipe.id);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search_recipes(term: &str) -> Result<Vec<Recipe>, FinderError> {
    let config = FinderConfig::load()?;
    let catalog = CatalogFactory::create(&config)?;
    catalog.search(term).await
}

/// Fetch one recipe by id from the configured catalog
pub async fn lookup_recipe(id: &str) -> Result<Recipe, FinderError> {
    let config = FinderConfig::load()?;
    let catalog = CatalogFactory::create(&config)?;
    catalog.lookup(id).await
}
