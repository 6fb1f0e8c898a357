//! Menu Item Repository
//!
//! Writes that touch relations run in one transaction. Updates diff each
//! relation against the persisted set and rewrite only the ones that changed.

use super::category::{SELECT_CATEGORY, category_not_found};
use super::ingredient::ingredient_not_found;
use super::{RepoError, RepoResult};
use crate::menu::diff::{
    ingredients_changed, normalize_text, recipe_steps_changed, sizes_changed, tags_changed,
};
use shared::models::{
    Category, IngredientLinkInput, MenuItem, MenuItemCreate, MenuItemDetail, MenuItemFilter,
    MenuItemIngredient, MenuItemUpdate, RecipeStep, RecipeStepInput, RelationChanges, Size, Tag,
};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_ITEM: &str = "SELECT m.id, m.name, m.description, m.base_price, m.category_id, \
     m.image_path, m.is_active, m.is_featured, m.sort_order, m.created_at, m.updated_at \
     FROM menu_items m";

// =============================================================================
// Queries
// =============================================================================

/// Row only, no relations
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let mut conn = pool.acquire().await?;
    find_row(&mut conn, id).await
}

/// Item with category, sizes, tags, ingredients and recipe steps
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItemDetail>> {
    let mut conn = pool.acquire().await?;
    match find_row(&mut conn, id).await? {
        Some(item) => Ok(Some(load_detail(&mut conn, item).await?)),
        None => Ok(None),
    }
}

pub async fn find_all(pool: &SqlitePool, filter: &MenuItemFilter) -> RepoResult<Vec<MenuItemDetail>> {
    let mut conn = pool.acquire().await?;
    let items = sqlx::query_as::<_, MenuItem>(&format!(
        "{SELECT_ITEM} JOIN categories c ON c.id = m.category_id \
         WHERE (?1 IS NULL OR c.slug = ?1) \
         AND (?2 IS NULL OR m.is_featured = ?2) \
         AND (?3 OR (m.is_active = 1 AND c.is_active = 1)) \
         ORDER BY c.sort_order, m.sort_order, m.name"
    ))
    .bind(&filter.category)
    .bind(filter.featured)
    .bind(filter.include_inactive)
    .fetch_all(&mut *conn)
    .await?;

    let mut details = Vec::with_capacity(items.len());
    for item in items {
        details.push(load_detail(&mut conn, item).await?);
    }
    Ok(details)
}

/// Case-insensitive name search over active items (chat assistant lookups)
pub async fn search(pool: &SqlitePool, query: &str) -> RepoResult<Vec<MenuItem>> {
    let pattern = format!("%{}%", query.trim().to_lowercase());
    let items = sqlx::query_as::<_, MenuItem>(&format!(
        "{SELECT_ITEM} WHERE LOWER(m.name) LIKE ? ORDER BY m.name LIMIT 50"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Sizes linked to an item (used for order re-pricing)
pub async fn find_sizes(conn: &mut SqliteConnection, menu_item_id: i64) -> RepoResult<Vec<Size>> {
    let sizes = sqlx::query_as::<_, Size>(
        "SELECT s.id, s.name, s.abbreviation, s.price_modifier, s.is_active, s.sort_order, \
         s.created_at, s.updated_at \
         FROM sizes s JOIN menu_item_sizes ms ON ms.size_id = s.id \
         WHERE ms.menu_item_id = ? ORDER BY s.sort_order, s.name",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(sizes)
}

pub(crate) async fn find_row(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!("{SELECT_ITEM} WHERE m.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(item)
}

async fn load_detail(conn: &mut SqliteConnection, item: MenuItem) -> RepoResult<MenuItemDetail> {
    let category = sqlx::query_as::<_, Category>(&format!("{SELECT_CATEGORY} WHERE c.id = ?"))
        .bind(item.category_id)
        .fetch_optional(&mut *conn)
        .await?;
    let sizes = find_sizes(conn, item.id).await?;
    let tags = load_tags(conn, item.id).await?;
    let ingredients = load_ingredients(conn, item.id).await?;
    let recipe_steps = load_recipe_steps(conn, item.id).await?;

    Ok(MenuItemDetail {
        item,
        category,
        sizes,
        tags,
        ingredients,
        recipe_steps,
    })
}

async fn load_tags(conn: &mut SqliteConnection, menu_item_id: i64) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name, t.slug, \
         (SELECT COUNT(*) FROM menu_item_tags x WHERE x.tag_id = t.id) AS menu_item_count, \
         t.created_at, t.updated_at \
         FROM tags t JOIN menu_item_tags mt ON mt.tag_id = t.id \
         WHERE mt.menu_item_id = ? ORDER BY t.name",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(tags)
}

async fn load_ingredients(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> RepoResult<Vec<MenuItemIngredient>> {
    let ingredients = sqlx::query_as::<_, MenuItemIngredient>(
        "SELECT mi.ingredient_id, i.name, i.allergens, mi.quantity, mi.is_optional, \
         mi.sort_order, mi.created_at \
         FROM menu_item_ingredients mi JOIN ingredients i ON i.id = mi.ingredient_id \
         WHERE mi.menu_item_id = ? ORDER BY mi.sort_order, i.name",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(ingredients)
}

async fn load_recipe_steps(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> RepoResult<Vec<RecipeStep>> {
    let steps = sqlx::query_as::<_, RecipeStep>(
        "SELECT id, menu_item_id, step_number, instruction, duration, temperature \
         FROM recipe_steps WHERE menu_item_id = ? ORDER BY step_number",
    )
    .bind(menu_item_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(steps)
}

// =============================================================================
// Writes
// =============================================================================

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItemDetail> {
    let mut tx = pool.begin().await?;
    let now = now_millis();
    let id = snowflake_id();

    ensure_category(&mut tx, data.category_id).await?;

    sqlx::query(
        "INSERT INTO menu_items (id, name, description, base_price, category_id, image_path, \
         is_active, is_featured, sort_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.base_price)
    .bind(data.category_id)
    .bind(&data.image_path)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.is_featured.unwrap_or(false))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    replace_sizes(&mut tx, id, &data.size_ids, now).await?;
    replace_tags(&mut tx, id, &data.tag_ids, now).await?;
    replace_ingredients(&mut tx, id, &data.ingredients, now).await?;
    replace_recipe_steps(&mut tx, id, &data.recipe_steps).await?;

    let item = find_row(&mut tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))?;
    let detail = load_detail(&mut tx, item).await?;
    tx.commit().await?;

    tracing::info!(menu_item_id = id, name = %detail.item.name, "Menu item created");
    Ok(detail)
}

/// Scalar PATCH plus diffed relation rewrites, all in one transaction
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: MenuItemUpdate,
) -> RepoResult<(MenuItemDetail, RelationChanges)> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    if find_row(&mut tx, id).await?.is_none() {
        return Err(menu_item_not_found(id));
    }
    if let Some(category_id) = data.category_id {
        ensure_category(&mut tx, category_id).await?;
    }

    sqlx::query(
        "UPDATE menu_items SET \
         name = COALESCE(?1, name), \
         description = COALESCE(?2, description), \
         base_price = COALESCE(?3, base_price), \
         category_id = COALESCE(?4, category_id), \
         image_path = COALESCE(?5, image_path), \
         is_active = COALESCE(?6, is_active), \
         is_featured = COALESCE(?7, is_featured), \
         sort_order = COALESCE(?8, sort_order), \
         updated_at = ?9 \
         WHERE id = ?10",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.base_price)
    .bind(data.category_id)
    .bind(&data.image_path)
    .bind(data.is_active)
    .bind(data.is_featured)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let mut changes = RelationChanges::default();

    if let Some(size_ids) = &data.size_ids {
        let current = find_sizes(&mut tx, id).await?;
        if sizes_changed(&current, size_ids) {
            replace_sizes(&mut tx, id, size_ids, now).await?;
            changes.sizes = true;
        }
    }
    if let Some(tag_ids) = &data.tag_ids {
        let current = load_tags(&mut tx, id).await?;
        if tags_changed(&current, tag_ids) {
            replace_tags(&mut tx, id, tag_ids, now).await?;
            changes.tags = true;
        }
    }
    if let Some(ingredients) = &data.ingredients {
        let current = load_ingredients(&mut tx, id).await?;
        if ingredients_changed(&current, ingredients) {
            replace_ingredients(&mut tx, id, ingredients, now).await?;
            changes.ingredients = true;
        }
    }
    if let Some(steps) = &data.recipe_steps {
        let current = load_recipe_steps(&mut tx, id).await?;
        if recipe_steps_changed(&current, steps) {
            replace_recipe_steps(&mut tx, id, steps).await?;
            changes.recipe_steps = true;
        }
    }

    let item = find_row(&mut tx, id)
        .await?
        .ok_or_else(|| menu_item_not_found(id))?;
    let detail = load_detail(&mut tx, item).await?;
    tx.commit().await?;

    tracing::debug!(menu_item_id = id, ?changes, "Menu item updated");
    Ok((detail, changes))
}

/// Replace recipe steps when they differ; returns the persisted steps
pub async fn set_recipe_steps(
    pool: &SqlitePool,
    id: i64,
    steps: &[RecipeStepInput],
) -> RepoResult<Vec<RecipeStep>> {
    let mut tx = pool.begin().await?;
    if find_row(&mut tx, id).await?.is_none() {
        return Err(menu_item_not_found(id));
    }
    let current = load_recipe_steps(&mut tx, id).await?;
    if recipe_steps_changed(&current, steps) {
        replace_recipe_steps(&mut tx, id, steps).await?;
        sqlx::query("UPDATE menu_items SET updated_at = ? WHERE id = ?")
            .bind(now_millis())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    let persisted = load_recipe_steps(&mut tx, id).await?;
    tx.commit().await?;
    Ok(persisted)
}

/// Point the item at a new image; returns the previous path
pub async fn set_image_path(
    pool: &SqlitePool,
    id: i64,
    image_path: &str,
) -> RepoResult<Option<String>> {
    let mut tx = pool.begin().await?;
    let previous = find_row(&mut tx, id)
        .await?
        .ok_or_else(|| menu_item_not_found(id))?
        .image_path;
    sqlx::query("UPDATE menu_items SET image_path = ?, updated_at = ? WHERE id = ?")
        .bind(image_path)
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(previous)
}

/// Hard delete; links and recipe steps cascade, order items keep their snapshot
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<MenuItem> {
    let deleted = sqlx::query_as::<_, MenuItem>(
        "DELETE FROM menu_items WHERE id = ? \
         RETURNING id, name, description, base_price, category_id, image_path, is_active, \
         is_featured, sort_order, created_at, updated_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    deleted.ok_or_else(|| menu_item_not_found(id))
}

pub(crate) fn menu_item_not_found(id: i64) -> RepoError {
    AppError::with_message(
        ErrorCode::MenuItemNotFound,
        format!("Menu item {id} not found"),
    )
    .into()
}

// =============================================================================
// Relation helpers (transaction-scoped)
// =============================================================================

async fn ensure_category(conn: &mut SqliteConnection, category_id: i64) -> RepoResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)")
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await?;
    if !exists {
        return Err(category_not_found(category_id));
    }
    Ok(())
}

/// Whether the item's category is active (a missing category counts as inactive)
pub(crate) async fn category_is_active(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> RepoResult<bool> {
    let active: bool = sqlx::query_scalar(
        "SELECT COALESCE((SELECT is_active FROM categories WHERE id = ?), 0)",
    )
    .bind(category_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(active)
}

async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &str,
    id: i64,
    not_found: impl FnOnce(i64) -> RepoError,
) -> RepoResult<()> {
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?)"
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    if !exists {
        return Err(not_found(id));
    }
    Ok(())
}

fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn replace_sizes(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    size_ids: &[i64],
    now: i64,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM menu_item_sizes WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *conn)
        .await?;
    for size_id in dedup_ids(size_ids) {
        ensure_exists(conn, "sizes", size_id, |id| {
            AppError::with_message(ErrorCode::SizeNotFound, format!("Size {id} not found")).into()
        })
        .await?;
        sqlx::query(
            "INSERT INTO menu_item_sizes (menu_item_id, size_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(menu_item_id)
        .bind(size_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn replace_tags(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    tag_ids: &[i64],
    now: i64,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM menu_item_tags WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *conn)
        .await?;
    for tag_id in dedup_ids(tag_ids) {
        ensure_exists(conn, "tags", tag_id, |id| {
            AppError::with_message(ErrorCode::TagNotFound, format!("Tag {id} not found")).into()
        })
        .await?;
        sqlx::query("INSERT INTO menu_item_tags (menu_item_id, tag_id, created_at) VALUES (?, ?, ?)")
            .bind(menu_item_id)
            .bind(tag_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn replace_ingredients(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    ingredients: &[IngredientLinkInput],
    now: i64,
) -> RepoResult<()> {
    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = ingredients.iter().find(|i| !seen.insert(i.ingredient_id)) {
        return Err(RepoError::Validation(format!(
            "Ingredient {} is listed more than once",
            dup.ingredient_id
        )));
    }

    sqlx::query("DELETE FROM menu_item_ingredients WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *conn)
        .await?;
    for link in ingredients {
        ensure_exists(conn, "ingredients", link.ingredient_id, ingredient_not_found).await?;
        sqlx::query(
            "INSERT INTO menu_item_ingredients \
             (menu_item_id, ingredient_id, quantity, is_optional, sort_order, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(menu_item_id)
        .bind(link.ingredient_id)
        .bind(normalize_text(link.quantity.as_deref()))
        .bind(link.is_optional)
        .bind(link.sort_order)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn replace_recipe_steps(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
    steps: &[RecipeStepInput],
) -> RepoResult<()> {
    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = steps.iter().find(|s| !seen.insert(s.step_number)) {
        return Err(RepoError::Validation(format!(
            "Step number {} is listed more than once",
            dup.step_number
        )));
    }

    sqlx::query("DELETE FROM recipe_steps WHERE menu_item_id = ?")
        .bind(menu_item_id)
        .execute(&mut *conn)
        .await?;
    for step in steps {
        sqlx::query(
            "INSERT INTO recipe_steps (id, menu_item_id, step_number, instruction, duration, temperature) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(menu_item_id)
        .bind(step.step_number)
        .bind(step.instruction.trim())
        .bind(step.duration)
        .bind(normalize_text(step.temperature.as_deref()))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::db::repository::category::{self, tests::seed_category};
    use crate::db::repository::ingredient::tests::seed_ingredient;
    use crate::db::repository::size::tests::seed_size;
    use crate::db::repository::tag::{self, tests::seed_tag};

    pub(crate) fn latte_payload(category_id: i64) -> MenuItemCreate {
        MenuItemCreate {
            name: "Latte".into(),
            description: Some("Espresso with steamed milk".into()),
            base_price: 4.5,
            category_id,
            image_path: None,
            is_active: None,
            is_featured: Some(true),
            sort_order: None,
            size_ids: vec![],
            tag_ids: vec![],
            ingredients: vec![],
            recipe_steps: vec![],
        }
    }

    fn link(ingredient_id: i64, quantity: &str) -> IngredientLinkInput {
        IngredientLinkInput {
            ingredient_id,
            quantity: Some(quantity.into()),
            is_optional: false,
            sort_order: 0,
        }
    }

    fn step(step_number: i32, instruction: &str) -> RecipeStepInput {
        RecipeStepInput {
            step_number,
            instruction: instruction.into(),
            duration: None,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn test_create_with_relations() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let small = seed_size(&pool, "Small", "SM", 0.0).await;
        let large = seed_size(&pool, "Large", "LG", 1.0).await;
        let iced = seed_tag(&pool, "Iced").await;
        let milk = seed_ingredient(&pool, "Milk").await;

        let mut payload = latte_payload(coffee.id);
        payload.size_ids = vec![large.id, small.id, small.id];
        payload.tag_ids = vec![iced.id];
        payload.ingredients = vec![link(milk.id, "200ml")];
        payload.recipe_steps = vec![step(2, "Pour milk"), step(1, "Pull shot")];

        let detail = create(&pool, payload).await.unwrap();
        assert_eq!(detail.category.as_ref().unwrap().id, coffee.id);
        assert_eq!(detail.sizes.len(), 2);
        assert_eq!(detail.tags.len(), 1);
        assert_eq!(detail.ingredients[0].quantity.as_deref(), Some("200ml"));
        assert_eq!(detail.recipe_steps[0].instruction, "Pull shot");
        assert_eq!(detail.recipe_steps[1].step_number, 2);
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_unknown_size() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let mut payload = latte_payload(coffee.id);
        payload.size_ids = vec![999];

        let err = create(&pool, payload).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::SizeNotFound));
        let all = find_all(
            &pool,
            &MenuItemFilter {
                include_inactive: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_category() {
        let pool = memory_pool().await.unwrap();
        let err = create(&pool, latte_payload(404)).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::CategoryNotFound));
    }

    #[tokio::test]
    async fn test_update_unchanged_ingredients_not_rewritten() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let milk = seed_ingredient(&pool, "Milk").await;
        let beans = seed_ingredient(&pool, "Espresso Beans").await;

        let mut payload = latte_payload(coffee.id);
        payload.ingredients = vec![link(milk.id, "200ml"), link(beans.id, "18g")];
        let created = create(&pool, payload).await.unwrap();
        let original_links: Vec<i64> =
            created.ingredients.iter().map(|i| i.created_at).collect();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (detail, changes) = update(
            &pool,
            created.item.id,
            MenuItemUpdate {
                name: Some("Caffè Latte".into()),
                ingredients: Some(vec![link(beans.id, "18g"), link(milk.id, "200ml")]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(detail.item.name, "Caffè Latte");
        assert!(!changes.ingredients);
        assert!(!changes.any());
        let after: Vec<i64> = detail.ingredients.iter().map(|i| i.created_at).collect();
        assert_eq!(after, original_links);

        let (detail, changes) = update(
            &pool,
            created.item.id,
            MenuItemUpdate {
                ingredients: Some(vec![link(beans.id, "20g"), link(milk.id, "200ml")]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(changes.ingredients);
        assert!(!changes.sizes);
        assert!(detail.ingredients.iter().all(|i| i.created_at > original_links[0]));
    }

    #[tokio::test]
    async fn test_update_sizes_tags_and_steps() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let small = seed_size(&pool, "Small", "SM", 0.0).await;
        let large = seed_size(&pool, "Large", "LG", 1.0).await;
        let hot = seed_tag(&pool, "Hot").await;

        let mut payload = latte_payload(coffee.id);
        payload.size_ids = vec![small.id];
        payload.recipe_steps = vec![step(1, "Pull shot")];
        let created = create(&pool, payload).await.unwrap();

        let (detail, changes) = update(
            &pool,
            created.item.id,
            MenuItemUpdate {
                size_ids: Some(vec![small.id, large.id]),
                tag_ids: Some(vec![hot.id]),
                recipe_steps: Some(vec![step(1, "Pull shot")]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(changes.sizes);
        assert!(changes.tags);
        assert!(!changes.recipe_steps);
        assert_eq!(detail.sizes.len(), 2);
        assert_eq!(detail.tags[0].menu_item_count, 1);
    }

    #[tokio::test]
    async fn test_update_rolls_back_all_relations_on_failure() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let small = seed_size(&pool, "Small", "SM", 0.0).await;
        let created = create(&pool, latte_payload(coffee.id)).await.unwrap();

        let err = update(
            &pool,
            created.item.id,
            MenuItemUpdate {
                name: Some("Broken".into()),
                size_ids: Some(vec![small.id]),
                ingredients: Some(vec![link(12345, "1")]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::IngredientNotFound));

        let detail = find_detail(&pool, created.item.id).await.unwrap().unwrap();
        assert_eq!(detail.item.name, "Latte");
        assert!(detail.sizes.is_empty());
    }

    #[tokio::test]
    async fn test_filters() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let pastries = seed_category(&pool, "Pastries").await;
        create(&pool, latte_payload(coffee.id)).await.unwrap();
        let mut croissant = latte_payload(pastries.id);
        croissant.name = "Croissant".into();
        croissant.is_featured = Some(false);
        croissant.is_active = Some(false);
        create(&pool, croissant).await.unwrap();

        let visible = find_all(&pool, &MenuItemFilter::default()).await.unwrap();
        assert_eq!(visible.len(), 1);

        let filter = MenuItemFilter {
            category: Some("pastries".into()),
            include_inactive: true,
            ..Default::default()
        };
        let pastries_only = find_all(&pool, &filter).await.unwrap();
        assert_eq!(pastries_only.len(), 1);
        assert_eq!(pastries_only[0].item.name, "Croissant");

        let featured = MenuItemFilter {
            featured: Some(true),
            include_inactive: true,
            ..Default::default()
        };
        assert_eq!(find_all(&pool, &featured).await.unwrap().len(), 1);

        assert_eq!(search(&pool, "latt").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_category_and_tag_delete_blocked_while_referenced() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let hot = seed_tag(&pool, "Hot").await;
        let mut payload = latte_payload(coffee.id);
        payload.tag_ids = vec![hot.id];
        let created = create(&pool, payload).await.unwrap();

        let err = category::delete(&pool, coffee.id).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::CategoryHasItems));
        let err = tag::delete(&pool, hot.id).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::TagInUse));

        delete(&pool, created.item.id).await.unwrap();
        category::delete(&pool, coffee.id).await.unwrap();
        tag::delete(&pool, hot.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_recipe_steps_and_image() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let created = create(&pool, latte_payload(coffee.id)).await.unwrap();

        let steps = set_recipe_steps(
            &pool,
            created.item.id,
            &[step(1, "Grind"), step(2, "Brew")],
        )
        .await
        .unwrap();
        assert_eq!(steps.len(), 2);

        let previous = set_image_path(&pool, created.item.id, "/api/uploads/menu/a.png")
            .await
            .unwrap();
        assert!(previous.is_none());
        let previous = set_image_path(&pool, created.item.id, "/api/uploads/menu/b.png")
            .await
            .unwrap();
        assert_eq!(previous.as_deref(), Some("/api/uploads/menu/a.png"));

        let err = set_recipe_steps(&pool, 1, &[]).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::MenuItemNotFound));
    }

    #[tokio::test]
    async fn test_long_recipe_persists_every_step() {
        let pool = memory_pool().await.unwrap();
        let coffee = seed_category(&pool, "Coffee").await;
        let mut payload = latte_payload(coffee.id);
        payload.recipe_steps = (1..=80).map(|n| step(n, "Stir")).collect();
        let created = create(&pool, payload).await.unwrap();
        assert_eq!(created.recipe_steps.len(), 80);

        let steps: Vec<RecipeStepInput> = (1..=80).map(|n| step(n, "Swirl")).collect();
        let saved = set_recipe_steps(&pool, created.item.id, &steps).await.unwrap();
        assert_eq!(saved.len(), 80);
        assert_eq!(saved[79].step_number, 80);
        let mut ids: Vec<i64> = saved.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 80);
    }
}
