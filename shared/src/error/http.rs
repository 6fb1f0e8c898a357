//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::CategoryNotFound
            | Self::SizeNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::MenuItemNotFound
            | Self::OrderNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::CategoryHasItems
            | Self::CategorySlugExists
            | Self::SizeAbbreviationExists
            | Self::TagInUse
            | Self::TagSlugExists
            | Self::IngredientNameExists
            | Self::UsernameExists
            | Self::EmailExists => StatusCode::CONFLICT,

            // 401 Unauthorized (admin-gated API routes answer 401, not 403)
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AdminRequired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::CannotDeleteSelf => StatusCode::FORBIDDEN,

            // 413 / 415 Upload
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 502 / 503 Chat upstream
            Self::ChatUpstreamFailed => StatusCode::BAD_GATEWAY,
            Self::ChatNotConfigured => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::MenuItemNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::CategoryHasItems.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::TagInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::UsernameExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_admin_required_is_unauthorized() {
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_upload_status() {
        assert_eq!(
            ErrorCode::FileTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::UnsupportedMediaType.http_status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            ErrorCode::InvalidFilename.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::InvalidStatusTransition.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ChatNotConfigured.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
