use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::{DbService, seed};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，每个请求克隆的成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | http_client | reqwest::Client | 出站 HTTP (聊天助手上游) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub http_client: reqwest::Client,
}

impl ServerState {
    /// 使用现有组件构造状态 (测试使用内存数据库)
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .unwrap_or_default();
        Self {
            config,
            db,
            jwt_service,
            http_client,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录结构
    /// 2. 打开数据库并执行迁移
    /// 3. 创建内置账号 (管理员、访客)
    pub async fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        std::fs::create_dir_all(config.menu_uploads_dir())?;

        let db_service = DbService::new(&config.database_path).await?;
        seed::ensure_builtin_accounts(&db_service.pool, config)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self::new(config.clone(), db_service.pool))
    }

    /// 获取工作目录
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
