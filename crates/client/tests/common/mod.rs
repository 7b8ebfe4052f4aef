//! Instrumented transport for driving the client core in tests.

#![allow(dead_code)]

use adapter::{BearerToken, MemoryTransport, Session, Transport};
use async_trait::async_trait;
use domain::{Blog, BlogId, BlogPatch, ClientError, CommentBody, CommentId, NewBlog, NodeId, Result, Thread, User};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Wraps the in-memory store, counting every call and optionally parking
/// thread fetches until the test releases them.
#[derive(Default)]
pub struct Probe {
    inner: MemoryTransport,
    calls: AtomicUsize,
    hold_threads: AtomicBool,
    fail_deletes: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl Probe {
    pub fn new(inner: MemoryTransport) -> Arc<Self> {
        Arc::new(Self {
            inner,
            ..Default::default()
        })
    }

    pub fn memory(&self) -> &MemoryTransport {
        &self.inner
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hold_thread_fetches(&self, hold: bool) {
        self.hold_threads.store(hold, Ordering::SeqCst);
    }

    /// Makes every blog delete fail as if the network dropped.
    pub fn fail_blog_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Resolves once a held thread fetch has its answer and is parked.
    pub async fn fetch_parked(&self) {
        self.entered.notified().await;
    }

    pub fn release_fetch(&self) {
        self.release.notify_one();
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for Probe {
    async fn list_blogs(&self, auth: &BearerToken) -> Result<Vec<Blog>> {
        self.hit();
        self.inner.list_blogs(auth).await
    }

    async fn create_blog(&self, auth: &BearerToken, blog: &NewBlog) -> Result<Option<Blog>> {
        self.hit();
        self.inner.create_blog(auth, blog).await
    }

    async fn update_blog(&self, auth: &BearerToken, id: &BlogId, patch: &BlogPatch) -> Result<()> {
        self.hit();
        self.inner.update_blog(auth, id, patch).await
    }

    async fn delete_blog(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        self.hit();
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection reset".to_string()));
        }
        self.inner.delete_blog(auth, id).await
    }

    async fn toggle_blog_like(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        self.hit();
        self.inner.toggle_blog_like(auth, id).await
    }

    async fn list_comments(&self, auth: &BearerToken, blog: &BlogId) -> Result<Thread> {
        self.hit();
        let thread = self.inner.list_comments(auth, blog).await;
        if self.hold_threads.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        thread
    }

    async fn add_comment(&self, auth: &BearerToken, blog: &BlogId, body: &CommentBody) -> Result<()> {
        self.hit();
        self.inner.add_comment(auth, blog, body).await
    }

    async fn add_reply(
        &self,
        auth: &BearerToken,
        blog: &BlogId,
        comment: &CommentId,
        body: &CommentBody,
    ) -> Result<()> {
        self.hit();
        self.inner.add_reply(auth, blog, comment, body).await
    }

    async fn delete_node(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        self.hit();
        self.inner.delete_node(auth, blog, node).await
    }

    async fn toggle_node_like(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        self.hit();
        self.inner.toggle_node_like(auth, blog, node).await
    }
}

pub fn ann() -> User {
    User::new("ann", "ann@example.com")
}

pub fn bob() -> User {
    User::new("bob", "bob@example.com")
}

/// A memory store that knows `ann` (token `t-ann`) and `bob` (token `t-bob`).
pub fn store() -> MemoryTransport {
    let memory = MemoryTransport::new();
    memory.register("t-ann", ann());
    memory.register("t-bob", bob());
    memory
}

pub fn session_of(user: User) -> Session {
    let token = format!("t-{}", user.id);
    Session::new(user, Some(token))
}
