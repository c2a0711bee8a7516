//! Domain models served by the API.
//!
//! These types represent validated domain objects separate from database row
//! types. They serialize directly to the JSON documents returned to clients.

pub mod cart;
pub mod category;
pub mod product;

pub use cart::{Cart, CartContents, CartItem, CartLine};
pub use category::Category;
pub use product::{NewProduct, Product};
