//! Cache Module
//!
//! Best-effort response cache: a Redis-backed store when one is reachable at
//! startup, an in-process expiring map otherwise.

mod backend;
mod clock;
pub mod codec;
mod entry;
mod local;
mod manager;
mod remote;
mod stats;


// Re-export public types
pub use backend::{CacheBackend, CacheMode};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::CacheValue;
pub use entry::{LocalEntry, MAX_TTL_SECONDS};
pub use local::{LocalBackend, LocalStore, DEFAULT_SWEEP_THRESHOLD};
pub use manager::CacheManager;
pub use remote::RemoteStore;
pub use stats::CacheStats;
