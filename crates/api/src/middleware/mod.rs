//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors)
//! 2. CORS headers (answer preflights, stamp every response)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)

pub mod cors;
pub mod request_id;

pub use cors::cors_middleware;
pub use request_id::request_id_middleware;
