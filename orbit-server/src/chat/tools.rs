//! Catalog tools exposed to the chat model
//!
//! Each tool runs through the same repositories as the REST API, so the
//! same validation and uniqueness rules apply.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::db::repository::{category, ingredient, menu_item};
use crate::utils::{AppError, validate};
use shared::models::{IngredientCreate, MenuItemCreate, MenuItemFilter, RecipeStepInput};

#[derive(Debug, Default, Deserialize)]
struct LookupArgs {
    #[serde(default)]
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMenuItemArgs {
    name: String,
    description: Option<String>,
    base_price: f64,
    category_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetRecipeStepsArgs {
    menu_item_id: i64,
    steps: Vec<RecipeStepInput>,
}

/// Tool schema in the chat-completions `tools` format
pub fn definitions() -> Vec<Value> {
    vec![
        function(
            "lookup_menu_items",
            "Search menu items by name. Omit query to list every item.",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } }
            }),
        ),
        function(
            "lookup_ingredients",
            "Search ingredients by name. Omit query to list active ingredients.",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } }
            }),
        ),
        function(
            "lookup_categories",
            "List all menu categories with their ids.",
            json!({ "type": "object", "properties": {} }),
        ),
        function(
            "create_ingredient",
            "Create a new ingredient.",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "allergens": { "type": "string", "description": "Comma separated" }
                },
                "required": ["name"]
            }),
        ),
        function(
            "create_menu_item",
            "Create a menu item in an existing category.",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "basePrice": { "type": "number" },
                    "categoryId": { "type": "integer" }
                },
                "required": ["name", "basePrice", "categoryId"]
            }),
        ),
        function(
            "set_recipe_steps",
            "Replace the recipe steps of a menu item.",
            json!({
                "type": "object",
                "properties": {
                    "menuItemId": { "type": "integer" },
                    "steps": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "stepNumber": { "type": "integer" },
                                "instruction": { "type": "string" },
                                "duration": { "type": "integer", "description": "Seconds" },
                                "temperature": { "type": "string" }
                            },
                            "required": ["stepNumber", "instruction"]
                        }
                    }
                },
                "required": ["menuItemId", "steps"]
            }),
        ),
    ]
}

fn function(name: &str, description: &str, parameters: Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description,
            "parameters": parameters
        }
    })
}

/// Execute a tool call and return its JSON result
pub async fn dispatch(pool: &SqlitePool, name: &str, arguments: &Value) -> Result<Value, AppError> {
    match name {
        "lookup_menu_items" => {
            let args: LookupArgs = parse(arguments)?;
            let items = match non_empty(args.query) {
                Some(q) => menu_item::search(pool, &q).await?,
                None => {
                    let filter = MenuItemFilter {
                        include_inactive: true,
                        ..Default::default()
                    };
                    menu_item::find_all(pool, &filter)
                        .await?
                        .into_iter()
                        .map(|d| d.item)
                        .collect()
                }
            };
            to_json(&items)
        }
        "lookup_ingredients" => {
            let args: LookupArgs = parse(arguments)?;
            let found = match non_empty(args.query) {
                Some(q) => ingredient::search(pool, &q).await?,
                None => ingredient::find_active(pool).await?,
            };
            to_json(&found)
        }
        "lookup_categories" => to_json(&category::find_all(pool, true).await?),
        "create_ingredient" => {
            let data: IngredientCreate = parse(arguments)?;
            validate(&data)?;
            to_json(&ingredient::create(pool, data).await?)
        }
        "create_menu_item" => {
            let args: CreateMenuItemArgs = parse(arguments)?;
            let data = MenuItemCreate {
                name: args.name,
                description: args.description,
                base_price: args.base_price,
                category_id: args.category_id,
                image_path: None,
                is_active: None,
                is_featured: None,
                sort_order: None,
                size_ids: Vec::new(),
                tag_ids: Vec::new(),
                ingredients: Vec::new(),
                recipe_steps: Vec::new(),
            };
            validate(&data)?;
            to_json(&menu_item::create(pool, data).await?)
        }
        "set_recipe_steps" => {
            let args: SetRecipeStepsArgs = parse(arguments)?;
            for step in &args.steps {
                validate(step)?;
            }
            to_json(&menu_item::set_recipe_steps(pool, args.menu_item_id, &args.steps).await?)
        }
        other => Err(AppError::validation(format!("Unknown tool '{other}'"))),
    }
}

fn parse<T: DeserializeOwned>(arguments: &Value) -> Result<T, AppError> {
    // Models sometimes send no arguments at all
    let arguments = if arguments.is_null() { json!({}) } else { arguments.clone() };
    serde_json::from_value(arguments)
        .map_err(|e| AppError::validation(format!("Invalid tool arguments: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::internal(format!("Serialize failed: {e}")))
}

fn non_empty(query: Option<String>) -> Option<String> {
    query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::repository::category::tests::seed_category;
    use crate::db::repository::menu_item::tests::latte_payload;
    use shared::ErrorCode;

    #[test]
    fn test_definitions_are_named_functions() {
        let names: Vec<String> = definitions()
            .iter()
            .map(|d| d["function"]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "lookup_menu_items",
                "lookup_ingredients",
                "lookup_categories",
                "create_ingredient",
                "create_menu_item",
                "set_recipe_steps"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_menu_item_and_steps() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;

        let created = dispatch(
            &pool,
            "create_menu_item",
            &json!({ "name": "Cortado", "basePrice": 3.75, "categoryId": coffee.id }),
        )
        .await
        .unwrap();
        let id = created["id"].as_i64().unwrap();

        let steps = dispatch(
            &pool,
            "set_recipe_steps",
            &json!({
                "menuItemId": id,
                "steps": [
                    { "stepNumber": 1, "instruction": "Pull a double shot" },
                    { "stepNumber": 2, "instruction": "Add steamed milk", "temperature": "60C" }
                ]
            }),
        )
        .await
        .unwrap();
        assert_eq!(steps.as_array().unwrap().len(), 2);
        assert_eq!(steps[1]["temperature"], "60C");
    }

    #[tokio::test]
    async fn test_lookup_menu_items() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        menu_item::create(&pool, latte_payload(coffee.id)).await.unwrap();

        let all = dispatch(&pool, "lookup_menu_items", &Value::Null).await.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);

        let none = dispatch(&pool, "lookup_menu_items", &json!({ "query": "tea" }))
            .await
            .unwrap();
        assert!(none.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_and_unknown_tool() {
        let pool = memory_pool().await.unwrap();

        let err = dispatch(&pool, "create_ingredient", &json!({ "name": "" }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = dispatch(&pool, "create_menu_item", &json!({ "name": "x" }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = dispatch(&pool, "drop_tables", &json!({})).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
