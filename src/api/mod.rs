//! API Module
//!
//! Admin HTTP surface over the cache manager.
//!
//! # Endpoints
//! - `PUT /cache` - Store a JSON value
//! - `DELETE /cache` - Flush the cache
//! - `GET /cache/:key` - Retrieve a value by key
//! - `DELETE /cache/:key` - Delete a key
//! - `GET /stats` - Cache counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
