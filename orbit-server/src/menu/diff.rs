//! Relation diffing for menu item updates
//!
//! Each function answers "does the incoming set differ from what is
//! persisted?". A relation is rewritten only when it does.
//!
//! - sizes / tags: sorted, de-duplicated id sets
//! - ingredients: keyed by `ingredient_id`, compared on quantity, optional flag, sort order
//! - recipe steps: keyed by `step_number`, compared on instruction, duration, temperature

use std::collections::BTreeMap;

use shared::models::{
    IngredientLinkInput, MenuItemIngredient, RecipeStep, RecipeStepInput, Size, Tag,
};

/// Trimmed text, blank treated as absent
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn id_set(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub fn sizes_changed(current: &[Size], incoming: &[i64]) -> bool {
    id_set(current.iter().map(|s| s.id)) != id_set(incoming.iter().copied())
}

pub fn tags_changed(current: &[Tag], incoming: &[i64]) -> bool {
    id_set(current.iter().map(|t| t.id)) != id_set(incoming.iter().copied())
}

pub fn ingredients_changed(current: &[MenuItemIngredient], incoming: &[IngredientLinkInput]) -> bool {
    let persisted: BTreeMap<i64, (Option<String>, bool, i32)> = current
        .iter()
        .map(|i| {
            (
                i.ingredient_id,
                (normalize_text(i.quantity.as_deref()), i.is_optional, i.sort_order),
            )
        })
        .collect();
    let requested: BTreeMap<i64, (Option<String>, bool, i32)> = incoming
        .iter()
        .map(|i| {
            (
                i.ingredient_id,
                (normalize_text(i.quantity.as_deref()), i.is_optional, i.sort_order),
            )
        })
        .collect();
    persisted != requested || requested.len() != incoming.len()
}

pub fn recipe_steps_changed(current: &[RecipeStep], incoming: &[RecipeStepInput]) -> bool {
    let persisted: BTreeMap<i32, (String, Option<i32>, Option<String>)> = current
        .iter()
        .map(|s| {
            (
                s.step_number,
                (
                    s.instruction.trim().to_string(),
                    s.duration,
                    normalize_text(s.temperature.as_deref()),
                ),
            )
        })
        .collect();
    let requested: BTreeMap<i32, (String, Option<i32>, Option<String>)> = incoming
        .iter()
        .map(|s| {
            (
                s.step_number,
                (
                    s.instruction.trim().to_string(),
                    s.duration,
                    normalize_text(s.temperature.as_deref()),
                ),
            )
        })
        .collect();
    persisted != requested || requested.len() != incoming.len()
}
