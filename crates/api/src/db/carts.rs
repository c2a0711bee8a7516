//! Cart queries.
//!
//! Cart lines are priced at read time by joining against `shop.product`, so a
//! cart always reflects current catalog prices. Writes that touch more than
//! one row run in a single transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use workshop_core::{CartId, Price, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Cart, CartContents, CartItem};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Internal row type for a cart line joined with its product price.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    cart_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(i64::from(row.quantity)).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid quantity in cart {}: {e}",
                row.cart_id
            ))
        })?;
        let unit_price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price for product {}: {e}",
                row.product_id
            ))
        })?;

        Self::new(ProductId::new(row.product_id), quantity, unit_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("cart {}: {e}", row.cart_id))
        })
    }
}

fn assemble(row: CartRow, items: Vec<CartItem>) -> Result<Cart, RepositoryError> {
    Cart::new(CartId::new(row.id), items, row.created_at, row.updated_at)
        .map_err(|e| RepositoryError::DataCorruption(format!("cart {}: {e}", row.id)))
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every cart with its items, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored line is invalid.
    pub async fn list(&self) -> Result<Vec<Cart>, RepositoryError> {
        let carts = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, created_at, updated_at
            FROM shop.cart
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.cart_id, ci.product_id, ci.quantity, p.price
            FROM shop.cart_item ci
            JOIN shop.product p ON p.id = ci.product_id
            ORDER BY ci.cart_id, ci.product_id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut items_by_cart: HashMap<i32, Vec<CartItem>> = HashMap::new();
        for row in rows {
            let cart_id = row.cart_id;
            items_by_cart
                .entry(cart_id)
                .or_default()
                .push(CartItem::try_from(row)?);
        }

        carts
            .into_iter()
            .map(|row| {
                let items = items_by_cart.remove(&row.id).unwrap_or_default();
                assemble(row, items)
            })
            .collect()
    }

    /// Get a cart and its items by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored line is invalid.
    pub async fn get_by_id(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let Some(cart) = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, created_at, updated_at
            FROM shop.cart
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.cart_id, ci.product_id, ci.quantity, p.price
            FROM shop.cart_item ci
            JOIN shop.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.product_id
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(CartItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        assemble(cart, items).map(Some)
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Integrity` if a line references an unknown product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, contents: &CartContents) -> Result<CartId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO shop.cart DEFAULT VALUES
            RETURNING id
            ",
        )
        .fetch_one(&mut *tx)
        .await?;

        insert_lines(&mut tx, id, contents).await?;

        tx.commit().await?;

        Ok(CartId::new(id))
    }

    /// Replace all lines of a cart and bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart doesn't exist.
    /// Returns `RepositoryError::Integrity` if a line references an unknown product.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn replace_items(
        &self,
        id: CartId,
        contents: &CartContents,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE shop.cart
            SET updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r"
            DELETE FROM shop.cart_item
            WHERE cart_id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut tx, id.as_i32(), contents).await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Insert every line of `contents` into `cart_id` with one statement.
async fn insert_lines(
    conn: &mut PgConnection,
    cart_id: i32,
    contents: &CartContents,
) -> Result<(), RepositoryError> {
    if contents.is_empty() {
        return Ok(());
    }

    let (product_ids, quantities): (Vec<i32>, Vec<i32>) = contents
        .lines()
        .iter()
        .map(|line| (line.product_id.as_i32(), line.quantity.get()))
        .unzip();

    sqlx::query(
        r"
        INSERT INTO shop.cart_item (cart_id, product_id, quantity)
        SELECT $1, product_id, quantity
        FROM UNNEST($2::INTEGER[], $3::INTEGER[]) AS line(product_id, quantity)
        ",
    )
    .bind(cart_id)
    .bind(&product_ids)
    .bind(&quantities)
    .execute(conn)
    .await
    .map_err(RepositoryError::from_write)?;

    Ok(())
}
