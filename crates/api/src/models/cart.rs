//! Cart domain types.
//!
//! A cart is read as a list of priced [`CartItem`]s and written as
//! [`CartContents`], a list of [`CartLine`]s with at most one line per product.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};
use serde::Serialize;

use workshop_core::{CartId, Price, PriceError, ProductId, Quantity, QuantityError};

/// A priced line in a stored cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Current price of one unit of the product.
    pub unit_price: Price,
    /// `unit_price * quantity`.
    pub line_total: Price,
}

impl CartItem {
    /// Build a line, computing its total from the unit price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the line total is not representable.
    pub fn new(
        product_id: ProductId,
        quantity: Quantity,
        unit_price: Price,
    ) -> Result<Self, PriceError> {
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            line_total: unit_price.checked_times(quantity)?,
        })
    }
}

/// A stored shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cart {
    pub id: CartId,
    /// Lines ordered by product ID.
    pub items: Vec<CartItem>,
    /// Sum of all line totals.
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Build a cart, computing its total from the items.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total is not representable.
    pub fn new(
        id: CartId,
        mut items: Vec<CartItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, PriceError> {
        items.sort_by_key(|item| item.product_id);
        let total = Price::checked_sum(items.iter().map(|item| item.line_total))?;
        Ok(Self {
            id,
            items,
            total,
            created_at,
            updated_at,
        })
    }
}

/// One product and how many of it, as written by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// The full set of lines to store in a cart.
///
/// Holds at most one line per product, ordered by product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartContents {
    lines: Vec<CartLine>,
}

impl CartContents {
    /// Collect lines, merging repeated products by summing their quantities.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::Overflow` if a merged quantity is too large.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Result<Self, QuantityError> {
        let mut merged: BTreeMap<ProductId, Quantity> = BTreeMap::new();
        for incoming in lines {
            match merged.entry(incoming.product_id) {
                Entry::Occupied(mut entry) => {
                    let total = entry.get().checked_add(incoming.quantity)?;
                    entry.insert(total);
                }
                Entry::Vacant(entry) => {
                    entry.insert(incoming.quantity);
                }
            }
        }

        Ok(Self {
            lines: merged
                .into_iter()
                .map(|(product_id, quantity)| CartLine {
                    product_id,
                    quantity,
                })
                .collect(),
        })
    }

    /// The merged lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart would hold no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
