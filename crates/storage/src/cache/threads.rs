use super::{Cache, Snapshot};
use domain::{BlogId, Thread};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Comment tree of exactly one blog. Threads of other blogs are refused.
pub struct ThreadCache {
    blog_id: BlogId,
    inner: Cache<Thread>,
}

impl ThreadCache {
    pub fn new(blog_id: BlogId) -> Self {
        let inner = Cache::new(Thread::empty(blog_id.clone()));
        Self { blog_id, inner }
    }

    pub fn blog_id(&self) -> &BlogId {
        &self.blog_id
    }

    pub fn replace(&self, thread: Thread) -> Option<Arc<Thread>> {
        if thread.blog_id != self.blog_id {
            warn!(
                "Refusing thread of blog {} in cache scoped to {}",
                thread.blog_id, self.blog_id
            );
            return None;
        }
        debug!(
            "Thread cache for {} replaced ({} nodes)",
            self.blog_id,
            thread.node_count()
        );
        Some(self.inner.replace(thread))
    }

    pub fn thread(&self) -> Arc<Thread> {
        self.inner.data()
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Thread>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_foreign_thread() {
        let cache = ThreadCache::new(BlogId::new("b1"));
        assert!(cache.replace(Thread::empty(BlogId::new("b2"))).is_none());
        assert_eq!(cache.revision(), 0);

        assert!(cache.replace(Thread::empty(BlogId::new("b1"))).is_some());
        assert_eq!(cache.revision(), 1);
    }
}
