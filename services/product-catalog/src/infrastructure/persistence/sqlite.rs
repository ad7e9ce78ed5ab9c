//! SQLite repository implementation

use async_trait::async_trait;
use cuba_errors::{AppError, AppResult};
use sqlx::SqlitePool;

use crate::domain::entities::{Product, ProductPrice};
use crate::domain::repositories::ProductRepository;
use crate::domain::value_objects::ProductId;

use super::rows::{ProductPriceRow, ProductRow};

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, price, stock FROM products WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询商品失败: {}", e)))?;

        Ok(row.map(Product::from))
    }

    async fn find_price(&self, id: &ProductId) -> AppResult<Option<ProductPrice>> {
        let row = sqlx::query_as::<_, ProductPriceRow>(
            "SELECT price, stock FROM products WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询商品价格失败: {}", e)))?;

        Ok(row.map(|row| ProductPrice {
            id: id.clone(),
            price: row.price,
            stock: row.stock,
        }))
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, stock
            FROM products
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("查询商品列表失败: {}", e)))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("查询商品总数失败: {}", e)))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO products (id, name, description, price, stock) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product.id.as_str())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("保存商品失败: {}", e)))?;

        Ok(())
    }
}
