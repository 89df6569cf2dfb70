use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::try_join_all;
use log::{debug, info, warn};
use tokio::sync::watch;

use crate::catalog::{CatalogFactory, RecipeCatalog};
use crate::config::{CatalogKind, FinderConfig};
use crate::error::FinderError;
use crate::model::Recipe;
use crate::state::{FinderState, ListKind, OperationOutcome, Snapshot, Ticket};

/// Coordinates catalog lookups and owns the state a presentation layer reads.
///
/// All operations take `&self`, so several may be in flight at once (wrap the
/// finder in an `Arc` to drive it from spawned tasks). The state lock is only
/// held between suspension points; each issued operation carries a sequence
/// ticket and a resolution that has been superseded by a newer operation of
/// the same stream is dropped instead of published.
pub struct RecipeFinder {
    catalog: Box<dyn RecipeCatalog>,
    state: Mutex<FinderState>,
    updates: watch::Sender<Snapshot>,
    operation_timeout: Option<Duration>,
    random_batch_size: usize,
}

impl RecipeFinder {
    /// Creates a new builder for a recipe finder
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder();
    /// ```
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }

    fn new(
        catalog: Box<dyn RecipeCatalog>,
        operation_timeout: Option<Duration>,
        random_batch_size: usize,
    ) -> Self {
        let state = FinderState::new();
        let (updates, _) = watch::channel(state.snapshot());

        RecipeFinder {
            catalog,
            state: Mutex::new(state),
            updates,
            operation_timeout,
            random_batch_size,
        }
    }

    pub fn catalog_name(&self) -> &str {
        self.catalog.catalog_name()
    }

    /// Current state: list, selected recipe and favorites
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Receive a fresh snapshot after every applied transition
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    /// Fetch a random batch of the configured size
    pub async fn fetch_random(&self) -> OperationOutcome {
        self.fetch_random_batch(self.random_batch_size).await
    }

    /// Fetch `count` random recipes concurrently.
    ///
    /// The published list keeps issuance order. The first lookup to fail
    /// settles the whole batch as failed, the remaining lookups are dropped
    /// and the previous list stays on display.
    pub async fn fetch_random_batch(&self, count: usize) -> OperationOutcome {
        if count == 0 {
            debug!("Ignoring random batch of size 0");
            return OperationOutcome::Skipped;
        }

        let ticket = self.mutate(|state| state.begin_list(ListKind::RandomBatch));
        debug!("Random batch #{} issued with {} lookups", ticket.seq(), count);

        let result = self
            .bounded(async {
                let lookups = (0..count).map(|_| self.catalog.random());
                try_join_all(lookups).await
            })
            .await
            .map_err(|e| format!("Failed to load random recipes: {}", e));

        self.settle_list(ticket, result)
    }

    /// Replace the published list with the matches for `term`.
    ///
    /// A blank term does nothing. Zero matches is a successful empty list.
    pub async fn search(&self, term: &str) -> OperationOutcome {
        let term = term.trim();
        if term.is_empty() {
            debug!("Ignoring blank search term");
            return OperationOutcome::Skipped;
        }

        let ticket = self.mutate(|state| state.begin_list(ListKind::Search));
        debug!("Search #{} issued for '{}'", ticket.seq(), term);

        let result = self
            .bounded(self.catalog.search(term))
            .await
            .map(dedupe_by_id)
            .map_err(|e| format!("Search for '{}' failed: {}", term, e));

        self.settle_list(ticket, result)
    }

    /// Look up one recipe and make it the selected detail record.
    ///
    /// Only the detail stream changes; the list and its loading flag are
    /// untouched. On failure the previous selection is kept.
    pub async fn fetch_details(&self, recipe_id: &str) -> OperationOutcome {
        let recipe_id = recipe_id.trim();
        if recipe_id.is_empty() {
            debug!("Ignoring detail lookup without id");
            return OperationOutcome::Skipped;
        }

        let ticket = self.mutate(|state| state.begin_details(recipe_id));
        debug!("Detail lookup #{} issued for {}", ticket.seq(), recipe_id);

        let result = self
            .bounded(self.catalog.lookup(recipe_id))
            .await
            .map_err(|e| format!("Failed to load recipe details: {}", e));

        let failure = result.as_ref().err().cloned();
        let outcome = self.settle(|state| state.resolve_details(ticket, result));
        self.log_outcome(ticket, outcome, failure.as_deref());
        outcome
    }

    /// Close the detail view. Lookups still in flight will be discarded.
    pub fn clear_selection(&self) {
        self.mutate(|state| state.clear_selection());
    }

    /// Flip favorite membership; returns whether the recipe is now a favorite
    pub fn toggle_favorite(&self, recipe_id: &str) -> bool {
        let now_favorite = self.mutate(|state| state.toggle_favorite(recipe_id));
        debug!("Recipe {} favorite: {}", recipe_id, now_favorite);
        now_favorite
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.lock().favorites().is_favorite(recipe_id)
    }

    pub fn favorites_count(&self) -> usize {
        self.lock().favorites().count()
    }

    fn lock(&self) -> MutexGuard<'_, FinderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an unconditional transition and notify observers
    fn mutate<T>(&self, transition: impl FnOnce(&mut FinderState) -> T) -> T {
        let mut state = self.lock();
        let result = transition(&mut state);
        self.updates.send_replace(state.snapshot());
        result
    }

    /// Apply a resolution; observers are only notified when it was authoritative
    fn settle(
        &self,
        resolution: impl FnOnce(&mut FinderState) -> OperationOutcome,
    ) -> OperationOutcome {
        let mut state = self.lock();
        let outcome = resolution(&mut state);
        if outcome == OperationOutcome::Applied {
            self.updates.send_replace(state.snapshot());
        }
        outcome
    }

    fn settle_list(&self, ticket: Ticket, result: Result<Vec<Recipe>, String>) -> OperationOutcome {
        let failure = result.as_ref().err().cloned();
        let count = result.as_ref().map_or(0, Vec::len);
        let outcome = self.settle(|state| state.resolve_list(ticket, result));

        if outcome == OperationOutcome::Applied && failure.is_none() {
            info!("Published {} recipes from {:?} #{}", count, ticket.kind(), ticket.seq());
        }
        self.log_outcome(ticket, outcome, failure.as_deref());
        outcome
    }

    fn log_outcome(&self, ticket: Ticket, outcome: OperationOutcome, failure: Option<&str>) {
        match (outcome, failure) {
            (OperationOutcome::Superseded, _) => debug!(
                "Discarding stale result of {:?} #{}",
                ticket.kind(),
                ticket.seq()
            ),
            (OperationOutcome::Applied, Some(message)) => warn!("{}", message),
            _ => {}
        }
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, FinderError>
    where
        F: Future<Output = Result<T, FinderError>>,
    {
        match self.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .map_err(|_| FinderError::TimeoutError(limit))?,
            None => operation.await,
        }
    }
}

/// Keep the first record for every id
fn dedupe_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|recipe| seen.insert(recipe.id.clone()))
        .collect()
}

/// Milliseconds in `duration`, saturating at `u64::MAX`
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for configuring a [`RecipeFinder`]
#[derive(Default)]
pub struct RecipeFinderBuilder {
    config: FinderConfig,
    catalog: Option<Box<dyn RecipeCatalog>>,
}

impl RecipeFinderBuilder {
    /// Start from a loaded configuration
    ///
    /// # Example
    /// ```no_run
    /// use recipe_finder::{FinderConfig, RecipeFinder};
    ///
    /// let config = FinderConfig::load().unwrap();
    /// let builder = RecipeFinder::builder().config(config);
    /// ```
    pub fn config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose the catalog API
    ///
    /// # Example
    /// ```
    /// use recipe_finder::{CatalogKind, RecipeFinder};
    ///
    /// let builder = RecipeFinder::builder()
    ///     .catalog_kind(CatalogKind::Spoonacular)
    ///     .api_key("your-api-key");
    /// ```
    pub fn catalog_kind(mut self, kind: CatalogKind) -> Self {
        self.config.catalog.kind = kind;
        self
    }

    /// Override the catalog base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.catalog.base_url = Some(url.into());
        self
    }

    /// Set the catalog API key instead of relying on the environment
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.catalog.api_key = Some(key.into());
        self
    }

    /// Set a timeout for individual HTTP requests (millisecond precision)
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config.timeout_ms = whole_millis(duration);
        self
    }

    /// Fail any operation that has not settled within `duration`
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder()
    ///     .operation_timeout(Duration::from_secs(10));
    /// ```
    pub fn operation_timeout(mut self, duration: Duration) -> Self {
        self.config.operation_timeout_ms = Some(whole_millis(duration));
        self
    }

    /// Number of recipes fetched by [`RecipeFinder::fetch_random`]
    pub fn random_batch_size(mut self, size: usize) -> Self {
        self.config.random_batch_size = size;
        self
    }

    /// Maximum number of search results, for catalogs that accept a limit
    pub fn search_limit(mut self, limit: u32) -> Self {
        self.config.search_limit = limit;
        self
    }

    /// Use a ready-made catalog instead of building one from configuration
    pub fn catalog(mut self, catalog: Box<dyn RecipeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the finder
    ///
    /// # Errors
    /// Returns `FinderError` if the catalog cannot be created (for example a
    /// Spoonacular catalog without an API key).
    pub fn build(self) -> Result<RecipeFinder, FinderError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => CatalogFactory::create(&self.config)?,
        };

        Ok(RecipeFinder::new(
            catalog,
            self.config.operation_timeout(),
            self.config.random_batch_size,
        ))
    }
}
