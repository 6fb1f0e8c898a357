//! Tag Repository

use super::category::resolve_slug;
use super::{RepoError, RepoResult, on_duplicate};
use shared::models::{Tag, TagCreate, TagUpdate};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

const SELECT_TAG: &str = "SELECT t.id, t.name, t.slug, \
     (SELECT COUNT(*) FROM menu_item_tags mt WHERE mt.tag_id = t.id) AS menu_item_count, \
     t.created_at, t.updated_at FROM tags t";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(&format!("{SELECT_TAG} ORDER BY t.name"))
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>(&format!("{SELECT_TAG} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(tag)
}

pub async fn create(pool: &SqlitePool, data: TagCreate) -> RepoResult<Tag> {
    let slug = resolve_slug(data.slug.as_deref(), &data.name)?;
    let now = now_millis();
    let id = snowflake_id();

    sqlx::query("INSERT INTO tags (id, name, slug, created_at, updated_at) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(data.name.trim())
        .bind(&slug)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .map_err(RepoError::from)
        .map_err(on_duplicate(
            ErrorCode::TagSlugExists,
            &format!("Tag slug '{slug}' already exists"),
        ))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tag".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TagUpdate) -> RepoResult<Tag> {
    let slug = match data.slug.as_deref() {
        Some(raw) => Some(resolve_slug(Some(raw), raw)?),
        None => None,
    };

    let rows = sqlx::query(
        "UPDATE tags SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), updated_at = ?3 \
         WHERE id = ?4",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&slug)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(ErrorCode::TagSlugExists, "Tag slug already exists"))?;

    if rows.rows_affected() == 0 {
        return Err(tag_not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| tag_not_found(id))
}

/// Hard delete; rejected while any menu item carries the tag
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let tag = find_by_id(pool, id).await?.ok_or_else(|| tag_not_found(id))?;
    if tag.menu_item_count > 0 {
        return Err(AppError::with_message(
            ErrorCode::TagInUse,
            format!(
                "Tag '{}' is used by {} menu item(s)",
                tag.name, tag.menu_item_count
            ),
        )
        .with_detail("menuItemCount", tag.menu_item_count)
        .into());
    }

    sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

fn tag_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::TagNotFound, format!("Tag {id} not found")).into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::memory_pool;

    pub(crate) async fn seed_tag(pool: &SqlitePool, name: &str) -> Tag {
        create(
            pool,
            TagCreate {
                name: name.into(),
                slug: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let pool = memory_pool().await.unwrap();
        let tag = seed_tag(&pool, "Dairy Free").await;
        assert_eq!(tag.slug, "dairy-free");
        assert_eq!(tag.menu_item_count, 0);

        let renamed = update(
            &pool,
            tag.id,
            TagUpdate {
                name: Some("Vegan".into()),
                slug: Some("Vegan".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.slug, "vegan");

        delete(&pool, tag.id).await.unwrap();
        assert!(find_all(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_slug() {
        let pool = memory_pool().await.unwrap();
        seed_tag(&pool, "Iced").await;
        let err = create(
            &pool,
            TagCreate {
                name: "ICED".into(),
                slug: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::TagSlugExists));
    }
}
