#![allow(dead_code)]

use cuba_adapter_sqlite::{SqliteConfig, create_pool};
use product_catalog::infrastructure::persistence::{SqliteProductRepository, ensure_schema};
use sqlx::SqlitePool;

/// 独立的内存库，每个测试互不影响
pub async fn get_test_pool() -> SqlitePool {
    let pool = create_pool(&SqliteConfig::in_memory())
        .await
        .expect("Failed to create in-memory pool");
    ensure_schema(&pool).await.expect("Failed to ensure schema");
    pool
}

pub async fn get_test_repo() -> (SqlitePool, SqliteProductRepository) {
    let pool = get_test_pool().await;
    (pool.clone(), SqliteProductRepository::new(pool))
}
