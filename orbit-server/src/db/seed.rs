//! Built-in accounts created at startup

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::password::{hash_password, random_password};
use crate::core::Config;
use crate::db::repository::user::{self, NewUser};

/// Username of the shared guest account behind `POST /api/auth/guest`
pub const GUEST_USERNAME: &str = "guest";

/// Create the bootstrap admin (when no admin exists) and the guest account
pub async fn ensure_builtin_accounts(pool: &SqlitePool, config: &Config) -> anyhow::Result<()> {
    if user::count_admins(pool).await? == 0 {
        match (&config.admin_username, &config.admin_password) {
            (Some(username), Some(password)) => {
                let password_hash = hash_password(password)
                    .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;
                user::create(
                    pool,
                    NewUser {
                        username: username.clone(),
                        password_hash,
                        email: None,
                        role: Role::Admin,
                    },
                )
                .await?;
                tracing::info!(username = %username, "Bootstrap admin account created");
            }
            _ => tracing::warn!(
                "No admin account exists and ADMIN_USERNAME/ADMIN_PASSWORD are not set"
            ),
        }
    }

    if user::find_by_username(pool, GUEST_USERNAME).await?.is_none() {
        let password = random_password()
            .ok_or_else(|| anyhow::anyhow!("Failed to generate guest password"))?;
        let password_hash = hash_password(&password)
            .map_err(|e| anyhow::anyhow!("Failed to hash guest password: {e}"))?;
        user::create(
            pool,
            NewUser {
                username: GUEST_USERNAME.to_string(),
                password_hash,
                email: None,
                role: Role::User,
            },
        )
        .await?;
        tracing::info!("Guest account created");
    }

    Ok(())
}
