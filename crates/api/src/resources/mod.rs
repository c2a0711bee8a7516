//! Resource handlers.
//!
//! One resource per entity type. Each translates an HTTP-level request
//! (already routed and with path/query parameters parsed) into repository
//! calls, and reports failures as [`AppError`](crate::error::AppError) kinds.

pub mod carts;
pub mod categories;
pub mod payload;
pub mod products;

pub use carts::CartResource;
pub use categories::CategoryResource;
pub use products::ProductResource;
