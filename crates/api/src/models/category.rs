//! Category domain type.

use serde::Serialize;

use workshop_core::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name, unique across categories.
    pub name: String,
}
