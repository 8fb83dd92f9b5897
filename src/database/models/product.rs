use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// A persisted product row. `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied product payload for create and update.
///
/// Absent fields take their zero value so the validator decides what is
/// missing; `id` and `created_at` in the body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub stock: i64,
}

impl ProductCandidate {
    pub fn new(name: impl Into<String>, price: i64, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }

    /// Merge the database-assigned fields into a full product.
    pub fn into_product(self, id: i64, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            created_at,
        }
    }
}

/// Business-rule violations, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("price must be greater than zero")]
    NonPositivePrice,

    #[error("stock cannot be negative")]
    NegativeStock,
}

impl ValidationError {
    /// Name of the payload field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "name",
            ValidationError::NonPositivePrice => "price",
            ValidationError::NegativeStock => "stock",
        }
    }
}

/// Decides whether a candidate may be persisted. Reports only the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductValidator;

impl ProductValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, candidate: &ProductCandidate) -> Result<(), ValidationError> {
        if candidate.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if candidate.price <= 0 {
            return Err(ValidationError::NonPositivePrice);
        }
        if candidate.stock < 0 {
            return Err(ValidationError::NegativeStock);
        }
        Ok(())
    }
}
