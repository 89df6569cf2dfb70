//! Translation of upstream catalog payloads into the canonical [`Recipe`].
//!
//! Each adapter declares which payload shape it understands. The
//! [`AdapterRegistry`] hands a payload to every adapter that claims it, in
//! registration order, and returns the first successful normalization.

use html_escape::decode_html_entities;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::FinderError;
use crate::model::Recipe;

mod flattened;
mod rich;

pub use self::flattened::{collapse_ingredient_slots, FlattenedAdapter, MAX_INGREDIENT_SLOTS};
pub use self::rich::{RichAdapter, MAX_RICH_TAGS};

pub trait SourceAdapter: Send + Sync {
    /// Short name of the payload shape (used in logs and errors)
    fn shape(&self) -> &str;

    /// Whether this adapter recognises the payload's field naming
    fn can_normalize(&self, payload: &Value) -> bool;

    fn normalize(&self, payload: &Value) -> Result<Recipe, FinderError>;
}

pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        AdapterRegistry {
            adapters: vec![Box::new(FlattenedAdapter), Box::new(RichAdapter)],
        }
    }
}

impl AdapterRegistry {
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        AdapterRegistry { adapters }
    }

    /// Normalize a single upstream record
    ///
    /// # Errors
    /// Returns `MalformedRecordError` when no adapter recognises the payload,
    /// or when every adapter that recognised it rejected it.
    pub fn normalize(&self, payload: &Value) -> Result<Recipe, FinderError> {
        let mut last_error = None;

        for adapter in &self.adapters {
            if !adapter.can_normalize(payload) {
                continue;
            }
            match adapter.normalize(payload) {
                Ok(recipe) => return Ok(recipe),
                Err(e) => {
                    debug!("{} adapter rejected payload: {}", adapter.shape(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            FinderError::MalformedRecordError(
                "payload does not match any known recipe shape".to_string(),
            )
        }))
    }

    /// Normalize every record of a response; one bad record fails the batch
    pub fn normalize_all(&self, payloads: &[Value]) -> Result<Vec<Recipe>, FinderError> {
        payloads.iter().map(|p| self.normalize(p)).collect()
    }
}

/// Catalog ids arrive either as JSON numbers or strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    fn into_id(self) -> Option<String> {
        match self {
            RecordId::Number(n) => Some(n.to_string()),
            RecordId::Text(s) => non_blank(Some(s)),
        }
    }
}

/// Trimmed value, or `None` when absent or blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Optional field that turns into `None` when the upstream value has an
/// unexpected type, so one odd field does not reject the whole record
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn decode_html_symbols(text: &str) -> String {
    decode_html_entities(text).into_owned()
}

fn required(value: Option<String>, field: &str) -> Result<String, FinderError> {
    non_blank(value)
        .ok_or_else(|| FinderError::MalformedRecordError(format!("missing required field `{field}`")))
}
