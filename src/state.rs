//! Owned state container for the recipe finder.
//!
//! Every mutation goes through a transition method on [`FinderState`].
//! Operations are tagged with a [`Ticket`] when they are issued; on
//! resolution the ticket is compared with the latest one issued for the same
//! stream and stale results are discarded instead of applied.

use serde::Serialize;

use crate::favorites::FavoritesSet;
use crate::model::Recipe;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    RandomBatch,
    Search,
    Details,
}

/// Operations that publish into the shared recipe list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    RandomBatch,
    Search,
}

impl From<ListKind> for OperationKind {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::RandomBatch => OperationKind::RandomBatch,
            ListKind::Search => OperationKind::Search,
        }
    }
}

/// Identity of one issued operation: its kind and per-kind sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: OperationKind,
    seq: u64,
}

impl Ticket {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What happened to an operation once it settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The resolution was authoritative and has been published
    Applied,
    /// A newer operation was issued meanwhile; the result was dropped
    Superseded,
    /// Nothing was issued (empty search term, zero-sized batch)
    Skipped,
}

/// Monotonic per-kind counters
#[derive(Debug, Default)]
struct SequenceGuard {
    random_batch: u64,
    search: u64,
    details: u64,
}

impl SequenceGuard {
    fn counter_mut(&mut self, kind: OperationKind) -> &mut u64 {
        match kind {
            OperationKind::RandomBatch => &mut self.random_batch,
            OperationKind::Search => &mut self.search,
            OperationKind::Details => &mut self.details,
        }
    }

    fn latest(&self, kind: OperationKind) -> u64 {
        match kind {
            OperationKind::RandomBatch => self.random_batch,
            OperationKind::Search => self.search,
            OperationKind::Details => self.details,
        }
    }

    fn issue(&mut self, kind: OperationKind) -> Ticket {
        let counter = self.counter_mut(kind);
        *counter += 1;
        Ticket {
            kind,
            seq: *counter,
        }
    }

    fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest(ticket.kind) == ticket.seq
    }
}

/// The published recipe list and the status of the operation feeding it
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListState {
    pub phase: Phase,
    /// Last successfully published list; kept while loading and after errors
    pub recipes: Vec<Recipe>,
    pub error: Option<String>,
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

/// The recipe currently opened for inspection
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetailState {
    pub phase: Phase,
    pub selected: Option<Recipe>,
    /// Id of the most recent lookup, whether or not it has resolved
    pub requested_id: Option<String>,
    pub error: Option<String>,
}

impl DetailState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

/// Read-only copy of everything a presentation layer may display
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub list: ListState,
    pub detail: DetailState,
    #[serde(serialize_with = "serialize_favorites")]
    pub favorites: FavoritesSet,
}

fn serialize_favorites<S: serde::Serializer>(
    favorites: &FavoritesSet,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    favorites.ids().serialize(serializer)
}

#[derive(Debug, Default)]
pub struct FinderState {
    list: ListState,
    detail: DetailState,
    favorites: FavoritesSet,
    guard: SequenceGuard,
    /// Latest issued operation writing to the list, of either kind
    list_owner: Option<Ticket>,
}

impl FinderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            list: self.list.clone(),
            detail: self.detail.clone(),
            favorites: self.favorites.clone(),
        }
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Start a list operation: loading, error cleared, previous list kept
    pub fn begin_list(&mut self, kind: ListKind) -> Ticket {
        let ticket = self.guard.issue(kind.into());
        self.list_owner = Some(ticket);
        self.list.phase = Phase::Loading;
        self.list.error = None;
        ticket
    }

    /// Whether a list resolution carrying this ticket may still publish
    pub fn is_current_list(&self, ticket: Ticket) -> bool {
        self.guard.is_latest(ticket) && self.list_owner == Some(ticket)
    }

    pub fn resolve_list(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Recipe>, String>,
    ) -> OperationOutcome {
        if !self.is_current_list(ticket) {
            return OperationOutcome::Superseded;
        }

        match result {
            Ok(recipes) => {
                self.list.recipes = recipes;
                self.list.phase = Phase::Success;
                self.list.error = None;
            }
            Err(message) => {
                self.list.phase = Phase::Error;
                self.list.error = Some(message);
            }
        }
        OperationOutcome::Applied
    }

    /// Start a detail lookup; the list stream is not touched
    pub fn begin_details(&mut self, recipe_id: &str) -> Ticket {
        let ticket = self.guard.issue(OperationKind::Details);
        self.detail.phase = Phase::Loading;
        self.detail.error = None;
        self.detail.requested_id = Some(recipe_id.to_string());
        ticket
    }

    pub fn is_current_details(&self, ticket: Ticket) -> bool {
        ticket.kind == OperationKind::Details && self.guard.is_latest(ticket)
    }

    pub fn resolve_details(
        &mut self,
        ticket: Ticket,
        result: Result<Recipe, String>,
    ) -> OperationOutcome {
        if !self.is_current_details(ticket) {
            return OperationOutcome::Superseded;
        }

        match result {
            Ok(recipe) => {
                self.detail.selected = Some(recipe);
                self.detail.phase = Phase::Success;
                self.detail.error = None;
            }
            Err(message) => {
                self.detail.phase = Phase::Error;
                self.detail.error = Some(message);
            }
        }
        OperationOutcome::Applied
    }

    /// Close the detail view; any lookup still in flight is superseded
    pub fn clear_selection(&mut self) {
        self.guard.issue(OperationKind::Details);
        self.detail = DetailState::default();
    }

    pub fn toggle_favorite(&mut self, recipe_id: &str) -> bool {
        self.favorites.toggle(recipe_id)
    }
}
