//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as `NUMERIC(10,2)` and travel over the wire as decimal
//! strings (`"2.50"`) so no precision is lost in JSON.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// Errors that can occur when constructing or combining a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has fractions of a cent.
    #[error("price has more than 2 decimal places (got {0})")]
    TooPrecise(Decimal),
    /// The amount does not fit a catalog price column.
    #[error("price must be below {limit} (got {0})", limit = Price::CATALOG_LIMIT)]
    TooLarge(Decimal),
    /// Arithmetic on prices left the representable range.
    #[error("price overflow")]
    Overflow,
}

/// A non-negative amount of money in the shop's currency, in whole cents.
///
/// Catalog prices are additionally bounded by [`Price::CATALOG_LIMIT`] to fit
/// `NUMERIC(10,2)`; line and cart totals may exceed it.
///
/// ```
/// use rust_decimal::Decimal;
/// use workshop_core::{Price, Quantity};
///
/// let unit = Price::for_catalog(Decimal::new(250, 2)).unwrap();
/// let line = unit.checked_times(Quantity::new(3).unwrap()).unwrap();
/// assert_eq!(line.to_string(), "7.50");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// assert!(Price::new(Decimal::new(1005, 3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Exclusive upper bound of a catalog price (`10^8`).
    pub const CATALOG_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Create a price, rejecting negative amounts and fractions of a cent.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    /// Returns `PriceError::TooPrecise` if it has more than 2 significant
    /// decimal places.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// Create a unit price for a catalog product.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Price::new`], or `PriceError::TooLarge` if
    /// `amount` is not below [`Price::CATALOG_LIMIT`].
    pub fn for_catalog(amount: Decimal) -> Result<Self, PriceError> {
        let price = Self::new(amount)?;
        price.check_catalog()
    }

    /// Check that this price fits a catalog price column.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::TooLarge` if it is not below [`Price::CATALOG_LIMIT`].
    pub fn check_catalog(self) -> Result<Self, PriceError> {
        if self.0 >= Self::CATALOG_LIMIT {
            return Err(PriceError::TooLarge(self.0));
        }
        Ok(self)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product is not representable.
    pub fn checked_times(self, quantity: Quantity) -> Result<Self, PriceError> {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .map(Self)
            .ok_or(PriceError::Overflow)
    }

    /// Add two prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum is not representable.
    pub fn checked_add(self, other: Self) -> Result<Self, PriceError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(PriceError::Overflow)
    }

    /// Sum a sequence of prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total is not representable.
    pub fn checked_sum(prices: impl IntoIterator<Item = Self>) -> Result<Self, PriceError> {
        prices
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Price {
        Price::new(Decimal::new(cents, 2)).unwrap()
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = Price::new(Decimal::new(-100, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_zero_price_allowed() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_price_serializes_as_string() {
        let json = serde_json::to_string(&price(1999)).unwrap();
        assert_eq!(json, "\"19.99\"");
    }

    #[test]
    fn test_fractions_of_a_cent_rejected() {
        let result = Price::new(Decimal::new(123_456_789_555, 3));
        assert!(matches!(result, Err(PriceError::TooPrecise(_))));

        // Trailing zeros are not extra precision
        assert!(Price::new(Decimal::new(2500, 3)).is_ok());
    }

    #[test]
    fn test_catalog_limit() {
        assert!(Price::for_catalog(Decimal::new(9_999_999_999, 2)).is_ok());
        assert!(matches!(
            Price::for_catalog(Decimal::new(100_000_000, 0)),
            Err(PriceError::TooLarge(_))
        ));
        assert!(matches!(
            Price::for_catalog(Decimal::MAX),
            Err(PriceError::TooLarge(_))
        ));
    }

    #[test]
    fn test_times_keeps_scale() {
        let line = price(250).checked_times(Quantity::new(4).unwrap()).unwrap();
        assert_eq!(line.to_string(), "10.00");
    }

    #[test]
    fn test_times_overflow() {
        let huge = Price::new(Decimal::MAX).unwrap();
        let result = huge.checked_times(Quantity::new(2).unwrap());
        assert_eq!(result, Err(PriceError::Overflow));
    }

    #[test]
    fn test_largest_catalog_line_does_not_overflow() {
        let max_unit = Price::for_catalog(Decimal::new(9_999_999_999, 2)).unwrap();
        let max_quantity = Quantity::new(i64::from(i32::MAX)).unwrap();
        assert!(max_unit.checked_times(max_quantity).is_ok());
    }

    #[test]
    fn test_sum() {
        let total = Price::checked_sum([price(100), price(250), price(5)]).unwrap();
        assert_eq!(total, price(355));

        assert_eq!(Price::checked_sum(Vec::new()).unwrap(), Price::ZERO);

        let huge = Price::new(Decimal::MAX).unwrap();
        assert_eq!(
            Price::checked_sum([huge, price(1)]),
            Err(PriceError::Overflow)
        );
    }
}
