//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ErrorBody`] - 错误响应结构 (from shared::error)
//! - [`ValidatedJson`] - 带 validator 校验的 JSON 提取器
//! - 日志初始化

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use validation::{ValidatedJson, validate};
