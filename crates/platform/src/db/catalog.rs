//! Category and product repositories (store-scoped catalog).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use storelane_core::{CategoryId, ProductId, StoreId};

use super::RepositoryError;

/// A product category with explicit ordering.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub store_id: StoreId,
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalog product.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating or updating a product.
#[derive(Debug, serde::Deserialize)]
pub struct ProductInput {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub available: bool,
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category at the given position.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create_category(
    pool: &PgPool,
    store_id: StoreId,
    name: &str,
    position: i32,
) -> Result<Category, RepositoryError> {
    let category = sqlx::query_as::<_, Category>(
        r"
        INSERT INTO categories (store_id, name, position)
        VALUES ($1, $2, $3)
        RETURNING id, store_id, name, position, created_at, updated_at
        ",
    )
    .bind(store_id)
    .bind(name)
    .bind(position)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// List a store's categories in display order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_categories(
    pool: &PgPool,
    store_id: StoreId,
) -> Result<Vec<Category>, RepositoryError> {
    let categories = sqlx::query_as::<_, Category>(
        r"
        SELECT id, store_id, name, position, created_at, updated_at
        FROM categories
        WHERE store_id = $1
        ORDER BY position, id
        ",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Rename or reposition a category.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the category is not in this store.
pub async fn update_category(
    pool: &PgPool,
    store_id: StoreId,
    category_id: CategoryId,
    name: &str,
    position: i32,
) -> Result<Category, RepositoryError> {
    sqlx::query_as::<_, Category>(
        r"
        UPDATE categories
        SET name = $3, position = $4, updated_at = NOW()
        WHERE id = $2 AND store_id = $1
        RETURNING id, store_id, name, position, created_at, updated_at
        ",
    )
    .bind(store_id)
    .bind(category_id)
    .bind(name)
    .bind(position)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Delete a category. Products in it fall back to uncategorized.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the category is not in this store.
pub async fn delete_category(
    pool: &PgPool,
    store_id: StoreId,
    category_id: CategoryId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $2 AND store_id = $1")
        .bind(store_id)
        .bind(category_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// Create a product.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn create_product(
    pool: &PgPool,
    store_id: StoreId,
    input: ProductInput,
) -> Result<Product, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(
        r"
        INSERT INTO products (store_id, category_id, name, description, price, image_url, available)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, store_id, category_id, name, description, price, image_url,
                  available, created_at, updated_at
        ",
    )
    .bind(store_id)
    .bind(input.category_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(&input.image_url)
    .bind(input.available)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Fetch one product scoped to a store.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_product(
    pool: &PgPool,
    store_id: StoreId,
    product_id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let product = sqlx::query_as::<_, Product>(
        r"
        SELECT id, store_id, category_id, name, description, price, image_url,
               available, created_at, updated_at
        FROM products
        WHERE id = $2 AND store_id = $1
        ",
    )
    .bind(store_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// List a store's products, optionally only the available ones.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_products(
    pool: &PgPool,
    store_id: StoreId,
    available_only: bool,
) -> Result<Vec<Product>, RepositoryError> {
    let products = sqlx::query_as::<_, Product>(
        r"
        SELECT id, store_id, category_id, name, description, price, image_url,
               available, created_at, updated_at
        FROM products
        WHERE store_id = $1 AND (NOT $2 OR available)
        ORDER BY created_at DESC
        ",
    )
    .bind(store_id)
    .bind(available_only)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Update a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product is not in this store.
pub async fn update_product(
    pool: &PgPool,
    store_id: StoreId,
    product_id: ProductId,
    input: ProductInput,
) -> Result<Product, RepositoryError> {
    sqlx::query_as::<_, Product>(
        r"
        UPDATE products
        SET category_id = $3, name = $4, description = $5, price = $6,
            image_url = $7, available = $8, updated_at = NOW()
        WHERE id = $2 AND store_id = $1
        RETURNING id, store_id, category_id, name, description, price, image_url,
                  available, created_at, updated_at
        ",
    )
    .bind(store_id)
    .bind(product_id)
    .bind(input.category_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(&input.image_url)
    .bind(input.available)
    .fetch_optional(pool)
    .await?
    .ok_or(RepositoryError::NotFound)
}

/// Delete a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product is not in this store.
pub async fn delete_product(
    pool: &PgPool,
    store_id: StoreId,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $2 AND store_id = $1")
        .bind(store_id)
        .bind(product_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Count a store's products (for advisory plan-limit checks).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_products(pool: &PgPool, store_id: StoreId) -> Result<i64, RepositoryError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE store_id = $1")
        .bind(store_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
