use std::fmt;
use std::hash::{Hash, Hasher};

use scraper::Html;
use serde::Serialize;

/// Image shown when a recipe carries no picture of its own
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/320";

/// A single ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    /// Amount and unit as written by the catalog (e.g. "1 1/2 cups")
    pub quantity: Option<String>,
    pub name: String,
}

impl Ingredient {
    pub fn new(quantity: Option<String>, name: impl Into<String>) -> Self {
        Ingredient {
            quantity: quantity.filter(|q| !q.trim().is_empty()),
            name: name.into(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.quantity {
            Some(quantity) => write!(f, "{} {}", quantity, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Canonical recipe record, independent of the catalog it came from.
///
/// Two records with the same `id` are the same recipe: equality and hashing
/// only look at the id, so field drift between fetches does not matter.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Option<String>,
    /// Raw catalog markup. Untrusted: render through [`Recipe::summary_text`]
    /// unless the presentation sanitizes it itself.
    pub summary_html: Option<String>,
    pub external_video_url: Option<String>,
    pub source_url: Option<String>,
    pub likes: Option<u32>,
}

impl Recipe {
    /// Image to display, falling back to the placeholder
    pub fn image_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Summary with all markup stripped and whitespace collapsed
    pub fn summary_text(&self) -> Option<String> {
        let html = self.summary_html.as_deref()?;
        let fragment = Html::parse_fragment(html);
        let text = fragment
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let parent = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name()));
                match parent {
                    Some("script") | Some("style") => None,
                    _ => Some(&**text),
                }
            })
            .collect::<Vec<_>>()
            .join("")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
