//! Client-side query cache
//!
//! - `QueryKey` - structured, parameter-inclusive cache keys
//! - `QueryOptions` - staleness window and cache time per read
//! - `QueryClient` - explicitly constructed cache with request coalescing

mod client;
mod key;
mod options;

pub use client::{QueryClient, QueryResult, QueryStats};
pub use key::QueryKey;
pub use options::QueryOptions;
