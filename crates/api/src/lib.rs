//! Workshop shop API library.
//!
//! A JSON REST API over product categories, products and shopping carts.
//! The binary in `main.rs` wires these modules to `PostgreSQL`; tests wire
//! them to [`db::MemoryRepository`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod resources;
pub mod routes;
pub mod seed;
pub mod state;
