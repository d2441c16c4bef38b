// Cache storage for the aggregated fleet snapshot.

mod cache;

pub use cache::{CacheMeta, StatusCache};
