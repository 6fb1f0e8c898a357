//! Settings Repository (singleton row, id = 1)

use super::RepoResult;
use shared::models::{Settings, SettingsUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

const SELECT_SETTINGS: &str = "SELECT pricing_enabled, store_name, store_address, store_phone, \
     tax_rate, prep_time, updated_at FROM settings WHERE id = 1";

/// Read the settings row, creating it with defaults on first access
pub async fn get_or_create(pool: &SqlitePool) -> RepoResult<Settings> {
    let mut conn = pool.acquire().await?;
    get_or_create_conn(&mut conn).await
}

/// Same as [`get_or_create`] on an open connection or transaction
pub async fn get_or_create_conn(conn: &mut SqliteConnection) -> RepoResult<Settings> {
    sqlx::query("INSERT OR IGNORE INTO settings (id, updated_at) VALUES (1, ?)")
        .bind(now_millis())
        .execute(&mut *conn)
        .await?;
    let settings = sqlx::query_as::<_, Settings>(SELECT_SETTINGS)
        .fetch_one(&mut *conn)
        .await?;
    Ok(settings)
}

pub async fn update(pool: &SqlitePool, data: SettingsUpdate) -> RepoResult<Settings> {
    get_or_create(pool).await?;
    sqlx::query(
        "UPDATE settings SET \
         pricing_enabled = COALESCE(?1, pricing_enabled), \
         store_name = COALESCE(?2, store_name), \
         store_address = COALESCE(?3, store_address), \
         store_phone = COALESCE(?4, store_phone), \
         tax_rate = COALESCE(?5, tax_rate), \
         prep_time = COALESCE(?6, prep_time), \
         updated_at = ?7 \
         WHERE id = 1",
    )
    .bind(data.pricing_enabled)
    .bind(&data.store_name)
    .bind(&data.store_address)
    .bind(&data.store_phone)
    .bind(data.tax_rate)
    .bind(data.prep_time)
    .bind(now_millis())
    .execute(pool)
    .await?;
    get_or_create(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use shared::models::DEFAULT_TAX_RATE;

    #[tokio::test]
    async fn test_defaults_created_lazily() {
        let pool = memory_pool().await.unwrap();
        let settings = get_or_create(&pool).await.unwrap();
        assert_eq!(settings.tax_rate, DEFAULT_TAX_RATE);
        assert_eq!(settings.store_name, "Orbit Coffee");
        assert!(settings.pricing_enabled);
        assert_eq!(settings.prep_time, 10);

        let again = get_or_create(&pool).await.unwrap();
        assert_eq!(again, settings);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let pool = memory_pool().await.unwrap();
        let updated = update(
            &pool,
            SettingsUpdate {
                tax_rate: Some(7.25),
                store_phone: Some("555-0100".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.tax_rate, 7.25);
        assert_eq!(updated.store_phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.store_name, "Orbit Coffee");
    }
}
