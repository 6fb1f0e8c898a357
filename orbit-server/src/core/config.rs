use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::Result;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、上传文件、日志) |
/// | DATABASE_PATH | `<WORK_DIR>/orbit.db` | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | UPLOAD_MAX_BYTES | 10485760 | 上传图片最大字节数 |
/// | ADMIN_DIST_DIR | - | 管理后台静态文件目录 (可选) |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | admin / admin123 (仅开发环境) | 初始管理员 |
/// | CHAT_API_URL | https://api.openai.com/v1 | 聊天助手上游地址 |
/// | CHAT_API_KEY | - | 未设置则聊天助手不可用 |
/// | CHAT_MODEL | gpt-4o-mini | 模型名称 |
/// | CHAT_MAX_TOOL_ROUNDS | 5 | 工具调用最大轮数 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/orbit HTTP_PORT=8080 cargo run -p orbit-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// SQLite 数据库路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 上传文件大小上限 (字节)
    pub upload_max_bytes: usize,
    /// 管理后台静态文件目录
    pub admin_dist_dir: Option<String>,
    /// 初始管理员账号
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    /// 聊天助手配置
    pub chat: ChatConfig,
}

/// 聊天助手 (OpenAI 兼容接口) 配置
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tool_rounds: usize,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("CHAT_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("CHAT_API_KEY").ok().filter(|s| !s.is_empty()),
            model: std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            max_tool_rounds: std::env::var("CHAT_MAX_TOOL_ROUNDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值。非开发环境下缺少 `JWT_SECRET` 会返回错误。
    pub fn from_env() -> Result<Self> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_dev = environment == "development";

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
                PathBuf::from(&work_dir)
                    .join("orbit.db")
                    .to_string_lossy()
                    .into_owned()
            }),
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(&environment)?,
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            upload_max_bytes: std::env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            admin_dist_dir: std::env::var("ADMIN_DIST_DIR").ok().filter(|s| !s.is_empty()),
            admin_username: std::env::var("ADMIN_USERNAME")
                .ok()
                .or_else(|| is_dev.then(|| "admin".to_string())),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .or_else(|| is_dev.then(|| "admin123".to_string())),
            chat: ChatConfig::from_env(),
            environment,
        })
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Result<Self> {
        let work_dir = work_dir.into();
        let mut config = Self::from_env()?;
        config.database_path = PathBuf::from(&work_dir)
            .join("orbit.db")
            .to_string_lossy()
            .into_owned();
        config.work_dir = work_dir;
        Ok(config)
    }

    /// 上传图片目录: `<work_dir>/uploads/menu`
    pub fn menu_uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads").join("menu")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
