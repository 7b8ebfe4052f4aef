use domain::BlogId;
use std::sync::Arc;
use tokio::sync::watch;

/// Which blog's detail view is currently open. Thread refreshes that resolve
/// after the view moved on check this and drop their result.
#[derive(Clone)]
pub struct ViewScope {
    tx: Arc<watch::Sender<Option<BlogId>>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn open(&self, blog_id: BlogId) {
        self.tx.send_replace(Some(blog_id));
    }

    pub fn close(&self) -> Option<BlogId> {
        self.tx.send_replace(None)
    }

    pub fn current(&self) -> Option<BlogId> {
        self.tx.borrow().clone()
    }

    pub fn is_current(&self, blog_id: &BlogId) -> bool {
        self.tx.borrow().as_ref() == Some(blog_id)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<BlogId>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_scope() {
        let scope = ViewScope::new();
        let other = scope.clone();
        let id = BlogId::new("b1");

        scope.open(id.clone());
        assert!(other.is_current(&id));

        assert_eq!(other.close(), Some(id.clone()));
        assert!(!scope.is_current(&id));
        assert_eq!(scope.current(), None);
    }
}
