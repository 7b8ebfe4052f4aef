//! In-memory caches for the blog list and the open comment thread.
//!
//! Every write is a wholesale replace published through a `watch` channel;
//! nothing patches entries in place.

mod cache;
mod scope;

pub use cache::blogs::BlogCache;
pub use cache::threads::ThreadCache;
pub use cache::{Cache, Snapshot};
pub use scope::ViewScope;
