//! Fallback Cache - A best-effort read-through response cache
//!
//! Stores computed responses in Redis when it is reachable at startup and in
//! an in-process expiring map otherwise. Cache failures never fail the caller.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheManager, CacheMode, CacheValue};
pub use config::Config;
