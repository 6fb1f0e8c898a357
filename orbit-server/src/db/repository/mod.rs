//! Repository Module
//!
//! Free async functions over a [`sqlx::SqlitePool`], one module per entity.
//! Multi-statement writes take a transaction and run every statement on it.

pub mod category;
pub mod ingredient;
pub mod menu_item;
pub mod order;
pub mod settings;
pub mod size;
pub mod tag;
pub mod user;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row is referenced elsewhere (delete blocked)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Domain error with a precise code, passed through untouched
    #[error("{0}")]
    App(AppError),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Conflict(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        RepoError::App(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Conflict(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database("Internal database error")
            }
            RepoError::App(err) => err,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a UNIQUE violation to a domain-specific error code
pub(crate) fn on_duplicate(code: ErrorCode, message: &str) -> impl FnOnce(RepoError) -> RepoError {
    let message = message.to_string();
    move |err| match err {
        RepoError::Duplicate(_) => RepoError::App(AppError::with_message(code, message)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_to_app_error() {
        let err: AppError = RepoError::NotFound("Tag 1 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Internal database error");

        let err: AppError = RepoError::App(AppError::new(ErrorCode::TagInUse)).into();
        assert_eq!(err.code, ErrorCode::TagInUse);
    }

    #[test]
    fn test_on_duplicate_rewrites_code() {
        let mapped = on_duplicate(ErrorCode::TagSlugExists, "Slug taken")(RepoError::Duplicate(
            "UNIQUE constraint failed: tags.slug".into(),
        ));
        match mapped {
            RepoError::App(err) => assert_eq!(err.code, ErrorCode::TagSlugExists),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
