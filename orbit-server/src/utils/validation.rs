//! Input validation helpers
//!
//! Payload structs derive [`validator::Validate`]; handlers take
//! [`ValidatedJson`] so field errors come back as 400 with `details.fields`.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::utils::AppError;

/// Run `validator` rules and convert failures into [`AppError`]
pub fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(|e| AppError::from_validation(&e))
}

/// JSON body extractor that also runs `Validate`
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        validate(&value)?;
        Ok(ValidatedJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::validation(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;
    use shared::models::CategoryCreate;

    #[test]
    fn test_validate_reports_fields() {
        let payload = CategoryCreate {
            name: String::new(),
            slug: None,
            icon: None,
            is_active: None,
            sort_order: None,
        };
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let fields = &err.details.unwrap()["fields"];
        assert!(fields.get("name").is_some());
    }
}
