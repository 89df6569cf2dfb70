use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main recipe finder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FinderConfig {
    /// Upstream catalog selection and credentials
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Number of recipes requested by a random batch
    #[serde(default = "default_random_batch_size")]
    pub random_batch_size: usize,
    /// Maximum results requested per search (catalogs that support a limit)
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// HTTP request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Optional limit for a whole operation, in milliseconds
    #[serde(default)]
    pub operation_timeout_ms: Option<u64>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            random_batch_size: default_random_batch_size(),
            search_limit: default_search_limit(),
            timeout_ms: default_timeout_ms(),
            operation_timeout_ms: None,
        }
    }
}

/// Configuration for the upstream recipe catalog
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Which catalog API layout to talk to
    #[serde(default)]
    pub kind: CatalogKind,
    /// Base URL override (for mirrors, proxies and tests)
    pub base_url: Option<String>,
    /// API key (can also be set via environment variable)
    pub api_key: Option<String>,
}

/// Supported catalog APIs
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogKind {
    /// TheMealDB: flattened records, no key required
    #[default]
    #[serde(rename = "mealdb")]
    MealDb,
    /// Spoonacular: rich records, API key required
    #[serde(rename = "spoonacular")]
    Spoonacular,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::MealDb => "mealdb",
            CatalogKind::Spoonacular => "spoonacular",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mealdb" | "themealdb" => Ok(CatalogKind::MealDb),
            "spoonacular" => Ok(CatalogKind::Spoonacular),
            other => Err(format!("Unknown catalog: {}", other)),
        }
    }
}

// Default value functions
fn default_random_batch_size() -> usize {
    6
}

fn default_search_limit() -> u32 {
    12
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. recipe-finder.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__CATALOG__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

/// Load configuration from file and environment variables
///
/// See [`FinderConfig::load`] for the source priority.
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-finder").required(false))
        // Use double underscore for nested: RECIPE_FINDER__CATALOG__KIND
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
