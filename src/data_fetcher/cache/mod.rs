pub mod clock;
mod core;
pub mod keys;
pub mod policy;
pub mod store;
pub mod types;

// Re-export cache types
pub use clock::{Clock, ManualClock, SystemClock};
pub use core::SportsCache;
pub use keys::generate_cache_key;
pub use policy::{CacheOptions, Cacheable, Cached, DataKind};
pub use store::{FileKvStore, KvStore, MemoryKvStore};
pub use types::*;
