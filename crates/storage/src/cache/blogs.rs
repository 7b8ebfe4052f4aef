use super::{Cache, Snapshot};
use domain::{Blog, BlogId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct BlogCache {
    inner: Cache<Vec<Blog>>,
}

impl Default for BlogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::new(Vec::new()),
        }
    }

    pub fn replace(&self, blogs: Vec<Blog>) -> Arc<Vec<Blog>> {
        debug!("Blog cache replaced ({} blogs)", blogs.len());
        self.inner.replace(blogs)
    }

    pub fn blogs(&self) -> Arc<Vec<Blog>> {
        self.inner.data()
    }

    pub fn find(&self, id: &BlogId) -> Option<Blog> {
        self.inner.data().iter().find(|b| &b.id == id).cloned()
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<Blog>>> {
        self.inner.subscribe()
    }
}
