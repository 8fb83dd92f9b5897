use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::models::{Product, ProductCandidate};

/// Outcome of a repository call that did not produce a result.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("product not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Data access for the product resource.
///
/// Every call is a single statement. Dropping the returned future aborts the
/// statement and hands the connection back to the pool.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Products ordered newest first, skipping `offset` rows and returning at most `limit`.
    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError>;

    /// Persist a new product; the backend assigns `id` and `created_at`.
    async fn create(&self, candidate: ProductCandidate) -> Result<Product, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<Product, RepositoryError>;

    /// Overwrite name, price and stock. `created_at` is left untouched.
    async fn update(&self, id: i64, candidate: ProductCandidate) -> Result<(), RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Round-trip to the backend without touching product rows.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Postgres-backed product repository.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, created_at
            FROM products
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn create(&self, candidate: ProductCandidate) -> Result<Product, RepositoryError> {
        let (id, created_at): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            "INSERT INTO products (name, price, stock) VALUES ($1, $2, $3) RETURNING id, created_at",
        )
        .bind(&candidate.name)
        .bind(candidate.price)
        .bind(candidate.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(candidate.into_product(id, created_at))
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock, created_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: i64, candidate: ProductCandidate) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET name = $1, price = $2, stock = $3 WHERE id = $4")
            .bind(&candidate.name)
            .bind(candidate.price)
            .bind(candidate.stock)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
