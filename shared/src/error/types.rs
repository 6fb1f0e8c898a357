//! `AppError` and the JSON error body it renders to

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Error returned by every fallible API operation
///
/// Rendered as [`ErrorBody`] with the status from [`ErrorCode::http_status`].
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Extra context such as `fields` for validation failures
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Build a validation error from `validator` output.
    ///
    /// Field-level messages are exposed under `details.fields`, keyed by
    /// path (`items[0].quantity` for nested list entries).
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields = serde_json::Map::new();
        collect_field_errors(errors, "", &mut fields);
        Self::new(ErrorCode::ValidationFailed).with_detail("fields", Value::Object(fields))
    }

    /// Generic 404 for resources without a dedicated code (e.g. uploaded files)
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{resource} not found"))
            .with_detail("resource", resource)
    }

    /// No valid session on a route that needs one
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Admin-gated route hit without an admin session
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Unique or foreign-key violation not mapped to a domain code
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: &str,
    out: &mut serde_json::Map<String, Value>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = errs
                    .iter()
                    .map(|e| {
                        Value::String(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string()),
                        )
                    })
                    .collect();
                out.insert(path, Value::Array(messages));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    collect_field_errors(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// JSON body of every error response: `{code, message, details?}`
///
/// Successful responses carry the resource itself, never this envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl ErrorBody {
    /// Known error code, `None` for codes this build does not recognise
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.code).ok()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (self.http_status(), axum::Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_custom_messages() {
        let err = AppError::new(ErrorCode::OrderEmpty);
        assert_eq!(err.message, "Order is empty");
        assert!(err.details.is_none());

        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order ORB-1009 not found");
        assert_eq!(format!("{err}"), "Order ORB-1009 not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::new(ErrorCode::SizeUnavailable)
            .with_detail("menuItemId", 7)
            .with_detail("size", "XL");
        let details = err.details.unwrap();
        assert_eq!(details["menuItemId"], 7);
        assert_eq!(details["size"], "XL");
    }

    #[test]
    fn test_session_constructors() {
        assert_eq!(AppError::unauthorized().code, ErrorCode::NotAuthenticated);
        assert_eq!(AppError::admin_required().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::token_expired().code, ErrorCode::TokenExpired);
        assert_eq!(AppError::invalid_token("bad signature").message, "bad signature");
        assert_eq!(AppError::invalid_credentials().code.code(), 1002);
    }

    #[test]
    fn test_not_found_names_resource() {
        let err = AppError::not_found("File menu/a.png");
        assert_eq!(err.message, "File menu/a.png not found");
        assert_eq!(err.details.unwrap()["resource"], "File menu/a.png");
    }

    #[test]
    fn test_from_validation_nested_paths() {
        use validator::Validate;

        #[derive(Validate)]
        struct Line {
            #[validate(range(min = 1, message = "Quantity must be positive"))]
            quantity: i32,
        }

        #[derive(Validate)]
        struct Form {
            #[validate(length(min = 1, message = "Name is required"))]
            name: String,
            #[validate(nested)]
            lines: Vec<Line>,
        }

        let errors = Form {
            name: String::new(),
            lines: vec![Line { quantity: 1 }, Line { quantity: 0 }],
        }
        .validate()
        .unwrap_err();
        let err = AppError::from_validation(&errors);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let fields = err.details.unwrap().remove("fields").unwrap();
        assert_eq!(fields["name"][0], "Name is required");
        assert_eq!(fields["lines[1].quantity"][0], "Quantity must be positive");
    }

    #[test]
    fn test_error_body_shape() {
        let err = AppError::new(ErrorCode::TagInUse).with_detail("tagId", 3);
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["code"], 3202);
        assert_eq!(json["message"], "Tag is in use by menu items");
        assert_eq!(json["details"]["tagId"], 3);

        let bare = serde_json::to_value(ErrorBody::from(&AppError::internal("boom"))).unwrap();
        assert!(bare.get("details").is_none());
    }

    #[test]
    fn test_error_body_parses_unknown_codes() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"code":4008,"message":"Cannot move order"}"#).unwrap();
        assert_eq!(body.error_code(), Some(ErrorCode::InvalidStatusTransition));

        let body: ErrorBody = serde_json::from_str(r#"{"code":4242,"message":"?"}"#).unwrap();
        assert_eq!(body.error_code(), None);
    }
}
