pub mod blogs;
pub mod threads;

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
pub struct Snapshot<T> {
    /// Bumped on every replace, starting at 0 for the initial value.
    pub revision: u64,
    pub data: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            revision: self.revision,
            data: Arc::clone(&self.data),
        }
    }
}

pub struct Cache<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> Cache<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            revision: 0,
            data: Arc::new(initial),
        });
        Self { tx }
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    pub fn data(&self) -> Arc<T> {
        Arc::clone(&self.tx.borrow().data)
    }

    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    // 整体替换，不做增量合并
    pub fn replace(&self, data: T) -> Arc<T> {
        let data = Arc::new(data);
        self.tx.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.data = Arc::clone(&data);
        });
        data
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }
}
