//! 基础设施资源管理

use cuba_adapter_sqlite::{SqliteConfig, create_pool};
use cuba_config::AppConfig;
use cuba_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::shutdown::ShutdownController;

/// 基础设施资源容器，由 bootstrap 统一初始化
#[derive(Clone)]
pub struct Infrastructure {
    pool: SqlitePool,
    shutdown: ShutdownController,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: &AppConfig, shutdown: ShutdownController) -> AppResult<Self> {
        let db_config = SqliteConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections)
            .with_create_if_missing(config.database.create_if_missing);
        let pool = create_pool(&db_config).await?;
        info!(
            max_connections = config.database.max_connections,
            "SQLite connection pool created"
        );

        Ok(Self { pool, shutdown })
    }

    /// 获取 SQLite 连接池
    pub fn sqlite_pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// 进程关闭令牌，请求级令牌应从它派生
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.token()
    }
}
