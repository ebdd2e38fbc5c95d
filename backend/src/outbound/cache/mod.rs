//! Weather cache adapters.
//!
//! - `RedisWeatherCache` stores entries in Redis through a bb8 pool and lets
//!   Redis expire them.
//! - `InMemoryWeatherCache` keeps entries in process, timing expiry on an
//!   injected clock. Used when no Redis URL is configured.

mod memory;
mod redis;

pub use memory::InMemoryWeatherCache;
pub use redis::{RedisPool, RedisWeatherCache};
