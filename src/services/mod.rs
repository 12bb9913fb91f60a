// Service exports
pub mod cache;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheStats, ResultCache};
pub use store::{InMemoryStore, MatchStore, SeedData, StoreError};
