//! Size Repository

use super::{RepoError, RepoResult, on_duplicate};
use shared::models::{Size, SizeCreate, SizeUpdate};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

pub(crate) const SELECT_SIZE: &str = "SELECT id, name, abbreviation, price_modifier, is_active, sort_order, \
     created_at, updated_at FROM sizes";

pub async fn find_all(pool: &SqlitePool, active_only: bool) -> RepoResult<Vec<Size>> {
    let sql = if active_only {
        format!("{SELECT_SIZE} WHERE is_active = 1 ORDER BY sort_order, name")
    } else {
        format!("{SELECT_SIZE} ORDER BY sort_order, name")
    };
    let sizes = sqlx::query_as::<_, Size>(&sql).fetch_all(pool).await?;
    Ok(sizes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Size>> {
    let size = sqlx::query_as::<_, Size>(&format!("{SELECT_SIZE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(size)
}

pub async fn create(pool: &SqlitePool, data: SizeCreate) -> RepoResult<Size> {
    let now = now_millis();
    let abbreviation = data.abbreviation.trim().to_uppercase();
    let size = sqlx::query_as::<_, Size>(
        "INSERT INTO sizes (id, name, abbreviation, price_modifier, is_active, sort_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, name, abbreviation, price_modifier, is_active, sort_order, created_at, updated_at",
    )
    .bind(snowflake_id())
    .bind(data.name.trim())
    .bind(&abbreviation)
    .bind(data.price_modifier.unwrap_or(0.0))
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::SizeAbbreviationExists,
        &format!("Size abbreviation '{abbreviation}' already exists"),
    ))?;
    Ok(size)
}

pub async fn update(pool: &SqlitePool, id: i64, data: SizeUpdate) -> RepoResult<Size> {
    let rows = sqlx::query(
        "UPDATE sizes SET \
         name = COALESCE(?1, name), \
         abbreviation = COALESCE(?2, abbreviation), \
         price_modifier = COALESCE(?3, price_modifier), \
         is_active = COALESCE(?4, is_active), \
         sort_order = COALESCE(?5, sort_order), \
         updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.abbreviation.as_deref().map(|a| a.trim().to_uppercase()))
    .bind(data.price_modifier)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(
        ErrorCode::SizeAbbreviationExists,
        "Size abbreviation already exists",
    ))?;

    if rows.rows_affected() == 0 {
        return Err(size_not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| size_not_found(id))
}

/// Hard delete; menu item links go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM sizes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(size_not_found(id));
    }
    Ok(())
}

fn size_not_found(id: i64) -> RepoError {
    AppError::with_message(ErrorCode::SizeNotFound, format!("Size {id} not found")).into()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::memory_pool;

    pub(crate) async fn seed_size(pool: &SqlitePool, name: &str, abbr: &str, modifier: f64) -> Size {
        create(
            pool,
            SizeCreate {
                name: name.into(),
                abbreviation: abbr.into(),
                price_modifier: Some(modifier),
                is_active: None,
                sort_order: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_normalizes_abbreviation() {
        let pool = memory_pool().await.unwrap();
        let size = seed_size(&pool, "Large", " lg ", 1.0).await;
        assert_eq!(size.abbreviation, "LG");
        assert_eq!(size.price_modifier, 1.0);

        let err = create(
            &pool,
            SizeCreate {
                name: "Larger".into(),
                abbreviation: "lg".into(),
                price_modifier: None,
                is_active: None,
                sort_order: None,
            },
        )
        .await
        .unwrap_err();
        assert!(
            matches!(err, RepoError::App(ref e) if e.code == ErrorCode::SizeAbbreviationExists)
        );
    }

    #[tokio::test]
    async fn test_active_filter_and_delete() {
        let pool = memory_pool().await.unwrap();
        let small = seed_size(&pool, "Small", "SM", 0.0).await;
        let large = seed_size(&pool, "Large", "LG", 1.0).await;
        update(
            &pool,
            large.id,
            SizeUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = find_all(&pool, true).await.unwrap();
        assert_eq!(active, vec![small.clone()]);
        assert_eq!(find_all(&pool, false).await.unwrap().len(), 2);

        delete(&pool, small.id).await.unwrap();
        let err = delete(&pool, small.id).await.unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::SizeNotFound));
    }
}
