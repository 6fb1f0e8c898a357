//! User Repository

use super::{RepoError, RepoResult, on_duplicate};
use shared::ErrorCode;
use shared::models::{Role, User};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const SELECT_USER: &str =
    "SELECT id, username, password_hash, email, role, created_at, updated_at FROM users";

/// Insert payload with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Column changes; `email: Some(None)` clears the address
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<Option<String>>,
    pub role: Option<Role>,
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY created_at DESC"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ? LIMIT 1"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn count_admins(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(Role::Admin)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    ensure_unique(pool, None, Some(&data.username), data.email.as_deref()).await?;

    let now = now_millis();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, password_hash, email, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING id, username, password_hash, email, role, created_at, updated_at",
    )
    .bind(snowflake_id())
    .bind(&data.username)
    .bind(&data.password_hash)
    .bind(&data.email)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(ErrorCode::UsernameExists, "Username already taken"))?;
    Ok(user)
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserChanges) -> RepoResult<User> {
    let email = data.email.as_ref().map(|e| e.as_deref());
    ensure_unique(pool, Some(id), data.username.as_deref(), email.flatten()).await?;

    let rows = sqlx::query(
        "UPDATE users SET \
         username = COALESCE(?1, username), \
         password_hash = COALESCE(?2, password_hash), \
         email = CASE WHEN ?3 THEN ?4 ELSE email END, \
         role = COALESCE(?5, role), \
         updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(&data.username)
    .bind(&data.password_hash)
    .bind(data.email.is_some())
    .bind(email.flatten())
    .bind(data.role)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(RepoError::from)
    .map_err(on_duplicate(ErrorCode::UsernameExists, "Username already taken"))?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Username and email uniqueness with precise error codes
async fn ensure_unique(
    pool: &SqlitePool,
    exclude_id: Option<i64>,
    username: Option<&str>,
    email: Option<&str>,
) -> RepoResult<()> {
    let exclude = exclude_id.unwrap_or(0);
    if let Some(username) = username {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ? AND id != ?)")
                .bind(username)
                .bind(exclude)
                .fetch_one(pool)
                .await?;
        if taken {
            return Err(shared::AppError::with_message(
                ErrorCode::UsernameExists,
                format!("Username '{username}' is already taken"),
            )
            .into());
        }
    }
    if let Some(email) = email {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? AND id != ?)")
                .bind(email)
                .bind(exclude)
                .fetch_one(pool)
                .await?;
        if taken {
            return Err(shared::AppError::with_message(
                ErrorCode::EmailExists,
                format!("Email '{email}' is already registered"),
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    fn new_user(username: &str, email: Option<&str>, role: Role) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: "hash".into(),
            email: email.map(Into::into),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = memory_pool().await.unwrap();
        let user = create(&pool, new_user("barista", Some("b@orbit.cafe"), Role::User))
            .await
            .unwrap();

        let found = find_by_username(&pool, "barista").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, Role::User);
        assert_eq!(count_admins(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let pool = memory_pool().await.unwrap();
        create(&pool, new_user("barista", Some("b@orbit.cafe"), Role::User))
            .await
            .unwrap();

        let err = create(&pool, new_user("barista", None, Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::UsernameExists));

        let err = create(&pool, new_user("other", Some("b@orbit.cafe"), Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::App(ref e) if e.code == ErrorCode::EmailExists));
    }

    #[tokio::test]
    async fn test_update_role_and_clear_email() {
        let pool = memory_pool().await.unwrap();
        let user = create(&pool, new_user("barista", Some("b@orbit.cafe"), Role::User))
            .await
            .unwrap();

        let updated = update(
            &pool,
            user.id,
            UserChanges {
                role: Some(Role::Admin),
                email: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.email, None);
        assert_eq!(updated.username, "barista");
        assert_eq!(count_admins(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = memory_pool().await.unwrap();
        let user = create(&pool, new_user("barista", None, Role::User))
            .await
            .unwrap();
        assert!(delete(&pool, user.id).await.unwrap());
        assert!(find_by_id(&pool, user.id).await.unwrap().is_none());
        assert!(!delete(&pool, user.id).await.unwrap());
    }
}
