#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recipe_finder::{FinderError, Recipe, RecipeCatalog, RecipeFinder};
use tokio::sync::oneshot;

/// A catalog request recorded by [`ScriptedCatalog`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Random,
    Search(String),
    Lookup(String),
}

pub type Reply = Result<Vec<Recipe>, FinderError>;

struct Pending {
    call: Call,
    reply: Option<oneshot::Sender<Reply>>,
}

/// In-memory catalog whose requests stay pending until the test answers them,
/// so tests decide the completion order.
#[derive(Clone, Default)]
pub struct ScriptedCatalog {
    pending: Arc<Mutex<Vec<Pending>>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.call.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Answer the `index`-th request (in issuance order)
    pub fn respond(&self, index: usize, reply: Reply) {
        let sender = self.pending.lock().unwrap()[index]
            .reply
            .take()
            .expect("request already answered");
        let _ = sender.send(reply);
    }

    /// Yield to the runtime until at least `n` requests have been issued
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..10_000 {
            if self.call_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {} catalog calls, saw {}", n, self.call_count());
    }

    async fn issue(&self, call: Call) -> Reply {
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().unwrap().push(Pending {
            call,
            reply: Some(sender),
        });

        receiver
            .await
            .unwrap_or_else(|_| Err(FinderError::TransportError("connection dropped".to_string())))
    }
}

#[async_trait]
impl RecipeCatalog for ScriptedCatalog {
    fn catalog_name(&self) -> &str {
        "scripted"
    }

    async fn random(&self) -> Result<Recipe, FinderError> {
        self.issue(Call::Random)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FinderError::MalformedRecordError("no recipe".to_string()))
    }

    async fn search(&self, term: &str) -> Result<Vec<Recipe>, FinderError> {
        self.issue(Call::Search(term.to_string())).await
    }

    async fn lookup(&self, id: &str) -> Result<Recipe, FinderError> {
        self.issue(Call::Lookup(id.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FinderError::NotFound(id.to_string()))
    }
}

pub fn recipe(id: &str, title: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

pub fn ok(recipes: &[(&str, &str)]) -> Reply {
    Ok(recipes.iter().map(|(id, title)| recipe(id, title)).collect())
}

pub fn transport_failure() -> Reply {
    Err(FinderError::TransportError("connection reset".to_string()))
}

pub fn finder_with(catalog: &ScriptedCatalog) -> Arc<RecipeFinder> {
    Arc::new(
        RecipeFinder::builder()
            .catalog(Box::new(catalog.clone()))
            .build()
            .unwrap(),
    )
}

pub fn list_ids(finder: &RecipeFinder) -> Vec<String> {
    finder
        .snapshot()
        .list
        .recipes
        .iter()
        .map(|r| r.id.clone())
        .collect()
}
