use thiserror::Error;

/// 服务器启动/运行错误
///
/// 请求级错误使用 [`shared::AppError`]，这里只覆盖进程级故障。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<shared::AppError> for ServerError {
    fn from(err: shared::AppError) -> Self {
        match err.code.category() {
            shared::ErrorCategory::System => ServerError::Database(err.message),
            _ => ServerError::Internal(anyhow::anyhow!(err.message)),
        }
    }
}

impl From<crate::auth::JwtError> for ServerError {
    fn from(err: crate::auth::JwtError) -> Self {
        ServerError::Config(err.to_string())
    }
}

/// 进程级 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
