//! # Catalog Repositories
//!
//! Products and categories belong to the catalog subsystem. The engine reads
//! them during checkout and reporting; this module only covers what seeding,
//! tests and stock inspection need.
//!
//! ## Ownership Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog (external CRUD)          Engine (this crate)                   │
//! │  ──────────────────────           ───────────────────                   │
//! │  insert / delete product   ──►    reads name, price                     │
//! │  insert / delete category  ──►    reads category for reports            │
//! │                                   owns `stock` through InventoryLedger  │
//! │                                                                         │
//! │  Deleting a product leaves its order lines untouched (name snapshot).  │
//! │  Deleting a category sets products.category_id to NULL.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use tally_core::validation::{validate_new_category, validate_new_product};
use tally_core::{Category, CoreError, NewCategory, NewProduct, Product, StockLevel};

use crate::error::{DbError, DbResult};
use crate::repository::inventory::InventoryLedger;

/// Repository for product rows.
///
/// ## Usage
/// ```rust,ignore
/// let product = db.products().insert(&NewProduct { .. }).await?;
/// let level = db.products().stock_level(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, stock, category_id, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::ForeignKeyViolation)` - category does not exist
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        validate_new_product(product)?;

        debug!(name = %product.name, stock = product.stock, "Inserting product");

        let now = Utc::now();
        let inserted = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock, category_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, name, price, stock, category_id, created_at, updated_at
            "#,
        )
        .bind(product.name.trim())
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Current stock of a product, read through the inventory ledger.
    pub async fn stock_level(&self, id: i64) -> DbResult<StockLevel> {
        let mut conn = self.pool.acquire().await?;
        InventoryLedger::new(&mut *conn)
            .read(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Hard-deletes a product. Order lines that reference it keep their
    /// snapshot and are not touched.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Repository for category rows.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        validate_new_category(category)?;

        debug!(name = %category.name, "Inserting category");

        let inserted = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(category.name.trim())
        .bind(category.description.trim())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    /// Deletes a category. Its products become uncategorized.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Counts all categories.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use tally_core::ErrorKind;

    fn drink(category_id: Option<i64>) -> NewProduct {
        NewProduct {
            name: "Es Teh".to_string(),
            price: 5_000,
            stock: 12,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let drinks = db
            .categories()
            .insert(&NewCategory {
                name: "Drinks".to_string(),
                description: "Cold and hot".to_string(),
            })
            .await
            .unwrap();

        let product = db.products().insert(&drink(Some(drinks.id))).await.unwrap();
        assert!(product.id > 0);

        let fetched = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Es Teh");
        assert_eq!(fetched.price().minor(), 5_000);
        assert_eq!(fetched.category_id, Some(drinks.id));
        assert!(fetched.can_sell(12));
        assert!(!fetched.can_sell(13));

        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.categories().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_product_rejected_before_insert() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .products()
            .insert(&NewProduct {
                stock: -1,
                ..drink(None)
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_category_is_foreign_key_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().insert(&drink(Some(77))).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_category_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let snacks = NewCategory {
            name: "Snacks".to_string(),
            description: String::new(),
        };
        db.categories().insert(&snacks).await.unwrap();

        let err = db.categories().insert(&snacks).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete_category_uncategorizes_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cat = db
            .categories()
            .insert(&NewCategory {
                name: "Seasonal".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        let product = db.products().insert(&drink(Some(cat.id))).await.unwrap();

        db.categories().delete(cat.id).await.unwrap();

        let product = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.category_id, None);
        assert!(matches!(
            db.categories().delete(cat.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_product_and_stock_level() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().insert(&drink(None)).await.unwrap();
        assert_eq!(db.products().stock_level(product.id).await.unwrap().stock, 12);

        db.products().delete(product.id).await.unwrap();
        assert!(db.products().get_by_id(product.id).await.unwrap().is_none());

        let err = db.products().stock_level(product.id).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ProductNotFound(_))));
        assert!(db.products().delete(product.id).await.is_err());
    }
}
