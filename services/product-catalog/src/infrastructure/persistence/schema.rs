//! 表结构初始化
//!
//! 启动时执行，必须在 gRPC 服务开始监听之前完成

use cuba_errors::{AppError, AppResult};
use sqlx::SqlitePool;
use tracing::info;

pub const PRODUCTS_TABLE: &str = "products";

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        price REAL NOT NULL,
        stock INTEGER NOT NULL
    )
"#;

/// 确保商品表存在
///
/// 幂等，已有表和数据保持不变
pub async fn ensure_schema(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query(CREATE_PRODUCTS_TABLE)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("创建商品表失败: {}", e)))?;

    info!(table = PRODUCTS_TABLE, "Schema ensured");
    Ok(())
}
