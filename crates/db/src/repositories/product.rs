use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, Sqlite, Transaction};

use product_info_core::domain::product::{Product, ProductId};

use super::{ProductRepository, ProductUnitOfWork, RepositoryError};
use crate::DbPool;

/// SQLite-backed product store. A unit of work is one sqlx transaction.
pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError> {
        // Take the write lock up front; a deferred BEGIN lets two writers read the same MAX(id).
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(Box::new(SqlProductUnitOfWork { tx }))
    }

    async fn begin_read(&self) -> Result<Box<dyn ProductUnitOfWork>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqlProductUnitOfWork { tx }))
    }
}

pub struct SqlProductUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl SqlProductUnitOfWork {
    fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
        let price_text: String = row.try_get("price")?;
        let price = Decimal::from_str(&price_text).map_err(|error| {
            RepositoryError::Decode(format!("invalid price `{price_text}`: {error}"))
        })?;

        Ok(Product {
            id: ProductId(row.try_get("id")?),
            name: row.try_get("name")?,
            brand_name: row.try_get("brand_name")?,
            size: row.try_get("size")?,
            available: row.try_get("available")?,
            description: row.try_get("description")?,
            price,
        })
    }
}

#[async_trait::async_trait]
impl ProductUnitOfWork for SqlProductUnitOfWork {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, brand_name, size, available, description, price
            FROM product
            WHERE id = ?
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(Self::product_from_row).transpose()
    }

    async fn next_id(&mut self) -> Result<ProductId, RepositoryError> {
        // Adding in SQL would overflow into REAL at i64::MAX.
        let last: Option<i64> =
            sqlx::query_scalar("SELECT MAX(id) FROM product").fetch_one(&mut *self.tx).await?;
        let last = last.unwrap_or(0);
        last.checked_add(1).map(ProductId).ok_or(RepositoryError::IdsExhausted(ProductId(last)))
    }

    async fn save(&mut self, product: Product) -> Result<Product, RepositoryError> {
        if !product.id.is_valid() {
            return Err(RepositoryError::InvalidId(product.id));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO product
                (id, name, brand_name, size, available, description, price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                brand_name = excluded.brand_name,
                size = excluded.size,
                available = excluded.available,
                description = excluded.description,
                price = excluded.price,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.brand_name)
        .bind(&product.size)
        .bind(product.available)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&mut *self.tx)
        .await?;

        Ok(product)
    }

    async fn delete_by_id(&mut self, id: ProductId) -> Result<(), RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::InvalidId(id));
        }

        let result =
            sqlx::query("DELETE FROM product WHERE id = ?").bind(id.0).execute(&mut *self.tx).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::InvalidId(id));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
