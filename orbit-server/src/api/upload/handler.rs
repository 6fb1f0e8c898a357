//! Menu Image Upload Handler
//!
//! The declared content type must be an accepted image type and must agree
//! with the format sniffed from the bytes. Files are stored as
//! `<uploads>/menu/<item-id>-<uuid>.<ext>`.

use std::path::Path as FsPath;

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use image::ImageFormat;
use serde::Serialize;
use uuid::Uuid;

use super::MENU_IMAGE_URL_PREFIX;
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Accepted declared content types and their sniffed formats
const ACCEPTED_TYPES: &[(&str, ImageFormat, &str)] = &[
    ("image/jpeg", ImageFormat::Jpeg, "jpg"),
    ("image/png", ImageFormat::Png, "png"),
    ("image/webp", ImageFormat::WebP, "webp"),
    ("image/gif", ImageFormat::Gif, "gif"),
];

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub menu_item_id: i64,
    pub image_path: String,
    pub content_type: String,
    pub size: usize,
}

/// POST /api/menu-items/{id}/upload-image - 上传菜品图片
pub async fn upload_menu_image(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart =
        multipart.map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?;

    if menu_item::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {id} not found"),
        ));
    }

    let max_bytes = state.config.upload_max_bytes;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            file_too_large(max_bytes)
        } else {
            AppError::validation(format!("Invalid multipart request: {e}"))
        }
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                file_too_large(max_bytes)
            } else {
                AppError::validation(format!("Multipart error: {e}"))
            }
        })?;
        upload = Some((content_type, data));
        break;
    }

    let (content_type, data) = upload.ok_or_else(|| {
        AppError::with_message(ErrorCode::NoFileProvided, "No 'file' field found")
    })?;
    let extension = check_image(&content_type, &data, max_bytes)?;

    let uploads_dir = state.config.menu_uploads_dir();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| storage_failed(format!("Failed to create uploads directory: {e}")))?;

    let filename = format!("{id}-{}.{extension}", Uuid::new_v4());
    let file_path = uploads_dir.join(&filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| storage_failed(format!("Failed to save file: {e}")))?;

    let image_path = format!("{MENU_IMAGE_URL_PREFIX}{filename}");
    let previous = match menu_item::set_image_path(&state.db, id, &image_path).await {
        Ok(previous) => previous,
        Err(e) => {
            let _ = tokio::fs::remove_file(&file_path).await;
            return Err(e.into());
        }
    };
    if let Some(old) = previous.as_deref().filter(|old| *old != image_path) {
        remove_stored_image(&uploads_dir, old).await;
    }

    tracing::info!(
        menu_item_id = id,
        file = %filename,
        size = data.len(),
        "Menu image uploaded"
    );

    Ok(Json(UploadResponse {
        menu_item_id: id,
        image_path,
        content_type,
        size: data.len(),
    }))
}

/// GET /api/uploads/menu/{filename} - 读取菜品图片
pub async fn serve_menu_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !is_safe_filename(&filename) {
        return Err(AppError::with_message(
            ErrorCode::InvalidFilename,
            "Invalid filename",
        ));
    }

    let file_path = state.config.menu_uploads_dir().join(&filename);
    let content = tokio::fs::read(&file_path)
        .await
        .map_err(|_| AppError::not_found(format!("File {filename}")))?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.essence_str().to_string())], content))
}

/// Delete a stored image given its public path; failures are only logged
pub async fn remove_stored_image(uploads_dir: &FsPath, image_path: &str) {
    let Some(filename) = image_path
        .strip_prefix(MENU_IMAGE_URL_PREFIX)
        .filter(|name| is_safe_filename(name))
    else {
        return;
    };
    if let Err(e) = tokio::fs::remove_file(uploads_dir.join(filename)).await {
        tracing::warn!(file = %filename, error = %e, "Failed to remove old menu image");
    }
}

/// Validate size, declared type and sniffed format; returns the file extension
fn check_image(content_type: &str, data: &[u8], max_bytes: usize) -> AppResult<&'static str> {
    if data.is_empty() {
        return Err(AppError::with_message(ErrorCode::EmptyFile, "Empty file provided"));
    }
    if data.len() > max_bytes {
        return Err(file_too_large(max_bytes));
    }

    let Some((_, expected, extension)) = ACCEPTED_TYPES
        .iter()
        .find(|(mime, _, _)| *mime == content_type)
    else {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedMediaType,
            format!("Unsupported content type '{content_type}'"),
        )
        .with_detail(
            "accepted",
            ACCEPTED_TYPES.iter().map(|(m, _, _)| *m).collect::<Vec<_>>(),
        ));
    };

    match image::guess_format(data) {
        Ok(actual) if actual == *expected => Ok(*extension),
        _ => Err(AppError::with_message(
            ErrorCode::UnsupportedMediaType,
            format!("File content does not match declared type '{content_type}'"),
        )),
    }
}

fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

fn file_too_large(max_bytes: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!("File too large. Maximum size is {max_bytes} bytes"),
    )
    .with_detail("maxBytes", max_bytes)
}

fn storage_failed(message: String) -> AppError {
    tracing::error!(error = %message, "Menu image storage failed");
    AppError::with_message(ErrorCode::FileStorageFailed, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_check_image_accepts_matching_type() {
        assert_eq!(check_image("image/png", PNG_MAGIC, 1024).unwrap(), "png");
        assert_eq!(check_image("image/jpeg", JPEG_MAGIC, 1024).unwrap(), "jpg");
    }

    #[test]
    fn test_check_image_rejects_mismatch() {
        let err = check_image("image/jpeg", PNG_MAGIC, 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedMediaType);

        let err = check_image("text/plain", b"hello", 1024).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedMediaType);
    }

    #[test]
    fn test_check_image_limits() {
        assert_eq!(check_image("image/png", &[], 1024).unwrap_err().code, ErrorCode::EmptyFile);
        assert_eq!(
            check_image("image/png", PNG_MAGIC, 4).unwrap_err().code,
            ErrorCode::FileTooLarge
        );
    }

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("42-abc.png"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("../orbit.db"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
        assert!(!is_safe_filename("a\0.png"));
    }
}
