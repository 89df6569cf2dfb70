use serde::Deserialize;
use serde_json::Value;

use super::{decode_html_symbols, lenient, non_blank, required, RecordId, SourceAdapter};
use crate::error::FinderError;
use crate::model::{Ingredient, Recipe};

/// Only the first few dish types are kept as tags
pub const MAX_RICH_TAGS: usize = 2;

/// Adapter for records with directly named fields (`id`, `title`, `image`,
/// `readyInMinutes`, `dishTypes`, `summary`, ...).
pub struct RichAdapter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RichRecipe {
    id: Option<RecordId>,
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    ready_in_minutes: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    servings: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    dish_types: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    aggregate_likes: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    extended_ingredients: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ExtendedIngredient {
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    unit: Option<String>,
}

impl SourceAdapter for RichAdapter {
    fn shape(&self) -> &str {
        "rich"
    }

    fn can_normalize(&self, payload: &Value) -> bool {
        payload
            .as_object()
            .is_some_and(|obj| obj.contains_key("id") || obj.contains_key("title"))
    }

    fn normalize(&self, payload: &Value) -> Result<Recipe, FinderError> {
        let rich = RichRecipe::deserialize(payload)
            .map_err(|e| FinderError::MalformedRecordError(e.to_string()))?;

        let id = required(rich.id.and_then(RecordId::into_id), "id")?;
        let title = required(rich.title, "title")?;

        let tags = rich
            .dish_types
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| tag.as_str().and_then(|t| non_blank(Some(t.to_string()))))
            .take(MAX_RICH_TAGS)
            .collect();

        let ingredients = rich
            .extended_ingredients
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| ExtendedIngredient::deserialize(entry).ok())
            .filter_map(|ing| {
                let name = non_blank(ing.name)?;
                Some(Ingredient::new(
                    format_quantity(ing.amount, ing.unit),
                    decode_html_symbols(&name),
                ))
            })
            .collect();

        Ok(Recipe {
            id,
            title: decode_html_symbols(&title),
            image_url: non_blank(rich.image),
            ready_in_minutes: rich.ready_in_minutes,
            servings: rich.servings,
            tags,
            ingredients,
            instructions: non_blank(rich.instructions),
            summary_html: non_blank(rich.summary),
            external_video_url: None,
            source_url: non_blank(rich.source_url),
            likes: rich.aggregate_likes,
        })
    }
}

/// "2 cups", "0.5 tsp", "3" - whole amounts lose their trailing ".0"
fn format_quantity(amount: Option<f64>, unit: Option<String>) -> Option<String> {
    let amount = amount.filter(|a| a.is_finite() && *a > 0.0).map(|a| {
        if a.fract() == 0.0 {
            format!("{}", a as i64)
        } else {
            format!("{}", (a * 100.0).round() / 100.0)
        }
    });

    match (amount, non_blank(unit)) {
        (Some(a), Some(u)) => Some(format!("{a} {u}")),
        (Some(a), None) => Some(a),
        (None, Some(u)) => Some(u),
        (None, None) => None,
    }
}
