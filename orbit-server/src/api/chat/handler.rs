//! Chat API Handler

use axum::{Json, extract::State};

use crate::chat::{ChatRequest, ChatResponse, OpenAiBackend, converse};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode, ValidatedJson};

/// POST /api/chat - 与聊天助手对话 (可调用目录工具)
pub async fn chat(
    State(state): State<ServerState>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let backend = OpenAiBackend::from_config(state.http_client.clone(), &state.config.chat)
        .ok_or_else(|| AppError::new(ErrorCode::ChatNotConfigured))?;

    let response = converse(
        &backend,
        &state.db,
        payload,
        state.config.chat.max_tool_rounds,
    )
    .await?;
    Ok(Json(response))
}
