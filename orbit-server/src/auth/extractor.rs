//! Session extractors
//!
//! Handlers declare what they need: [`CurrentUser`] for any signed-in
//! user, [`AdminUser`] for admin-only writes, [`MaybeUser`] where guests
//! are allowed.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::middleware::session_user;
use crate::auth::session::{AuthRejection, CurrentUser, extract_token, resolve_user};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by the authenticate middleware
        if parts.extensions.get::<CurrentUser>().is_some()
            || parts.extensions.get::<AuthRejection>().is_some()
        {
            return session_user(&parts.extensions).cloned();
        }

        let Some(token) = extract_token(&parts.headers) else {
            security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
            return Err(AppError::unauthorized());
        };

        let user = resolve_user(state, &token).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Signed-in admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<ServerState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::admin_required())?;
        if !user.is_admin() {
            security_log!(
                "WARN",
                "admin_required",
                user_id = user.id,
                username = user.username.clone(),
                uri = parts.uri.to_string()
            );
            return Err(AppError::admin_required());
        }
        Ok(AdminUser(user))
    }
}

/// Optional session; an invalid token is treated as anonymous
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(CurrentUser::is_admin)
    }

    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<ServerState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            CurrentUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
