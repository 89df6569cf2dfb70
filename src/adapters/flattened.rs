use serde::Deserialize;
use serde_json::{Map, Value};

use super::{decode_html_symbols, lenient, non_blank, required, RecordId, SourceAdapter};
use crate::error::FinderError;
use crate::model::{Ingredient, Recipe};

/// Number of numbered ingredient/measure field pairs in a flattened record
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Adapter for records with `idMeal`/`strMeal` style field names and
/// numbered `strIngredientN`/`strMeasureN` pairs.
pub struct FlattenedAdapter;

#[derive(Debug, Deserialize)]
struct FlattenedMeal {
    #[serde(rename = "idMeal")]
    id: Option<RecordId>,
    #[serde(rename = "strMeal")]
    title: Option<String>,
    #[serde(rename = "strMealThumb", default, deserialize_with = "lenient")]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default, deserialize_with = "lenient")]
    category: Option<String>,
    #[serde(rename = "strArea", default, deserialize_with = "lenient")]
    area: Option<String>,
    /// Usually a comma separated string, occasionally a list
    #[serde(rename = "strTags")]
    tags: Option<Value>,
    #[serde(rename = "strInstructions", default, deserialize_with = "lenient")]
    instructions: Option<String>,
    #[serde(rename = "strYoutube", default, deserialize_with = "lenient")]
    youtube: Option<String>,
    #[serde(rename = "strSource", default, deserialize_with = "lenient")]
    source: Option<String>,
    #[serde(flatten)]
    slots: Map<String, Value>,
}

impl SourceAdapter for FlattenedAdapter {
    fn shape(&self) -> &str {
        "flattened"
    }

    fn can_normalize(&self, payload: &Value) -> bool {
        payload
            .as_object()
            .is_some_and(|obj| obj.contains_key("idMeal") || obj.contains_key("strMeal"))
    }

    fn normalize(&self, payload: &Value) -> Result<Recipe, FinderError> {
        let meal = FlattenedMeal::deserialize(payload)
            .map_err(|e| FinderError::MalformedRecordError(e.to_string()))?;

        let id = required(meal.id.and_then(RecordId::into_id), "idMeal")?;
        let title = required(meal.title, "strMeal")?;

        Ok(Recipe {
            id,
            title: decode_html_symbols(&title),
            image_url: non_blank(meal.thumbnail),
            ready_in_minutes: None,
            servings: None,
            tags: collect_tags(meal.category, meal.area, meal.tags),
            ingredients: collapse_ingredient_slots(&meal.slots),
            instructions: non_blank(meal.instructions).map(|i| decode_html_symbols(&i)),
            summary_html: None,
            external_video_url: non_blank(meal.youtube),
            source_url: non_blank(meal.source),
            likes: None,
        })
    }
}

/// Collapse numbered ingredient/measure fields into an ordered list.
///
/// Slots 1..=20 are visited in ascending order; a slot is emitted exactly when
/// its ingredient name is present and not blank.
pub fn collapse_ingredient_slots(fields: &Map<String, Value>) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = slot_text(fields, &format!("strIngredient{slot}"))?;
            let quantity = slot_text(fields, &format!("strMeasure{slot}"));
            Some(Ingredient::new(quantity, decode_html_symbols(&name)))
        })
        .collect()
}

fn slot_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Category, then area, then the comma separated tag list
fn collect_tags(category: Option<String>, area: Option<String>, tags: Option<Value>) -> Vec<String> {
    let extra: Vec<String> = match tags {
        Some(Value::String(t)) => t.split(',').map(String::from).collect(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    };

    let mut result: Vec<String> = Vec::new();
    for tag in [category, area]
        .into_iter()
        .chain(extra.into_iter().map(Some))
        .filter_map(non_blank)
    {
        if !result.contains(&tag) {
            result.push(tag);
        }
    }
    result
}
