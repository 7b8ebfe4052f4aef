use async_trait::async_trait;
use domain::{Blog, BlogId, BlogPatch, CommentBody, CommentId, NewBlog, NodeId, Result, Thread, User};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::store::Store;
use crate::session::BearerToken;
use crate::traits::Transport;

// 进程内的权威存储，行为与真实后端一致 (分配 id，点赞翻转，未知 id 返回 NotFound)
#[derive(Clone, Default)]
pub struct MemoryTransport {
    store: Arc<Mutex<Store>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, token: impl Into<String>, user: User) {
        self.store().register(token.into(), user);
    }

    pub fn seed_blog(&self, author: User, blog: &NewBlog) -> Blog {
        self.store().create_blog(author, blog)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn list_blogs(&self, auth: &BearerToken) -> Result<Vec<Blog>> {
        let store = self.store();
        store.authenticate(auth)?;
        Ok(store.list_blogs())
    }

    async fn create_blog(&self, auth: &BearerToken, blog: &NewBlog) -> Result<Option<Blog>> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        let created = store.create_blog(user, blog);
        debug!("memory: created blog {}", created.id);
        Ok(Some(created))
    }

    async fn update_blog(&self, auth: &BearerToken, id: &BlogId, patch: &BlogPatch) -> Result<()> {
        let mut store = self.store();
        store.authenticate(auth)?;
        store.update_blog(id, patch)
    }

    async fn delete_blog(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        let mut store = self.store();
        store.authenticate(auth)?;
        store.delete_blog(id)
    }

    async fn toggle_blog_like(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        let liked = store.toggle_blog_like(&user, id)?;
        debug!("memory: {} likes blog {}: {}", user.id, id, liked);
        Ok(())
    }

    async fn list_comments(&self, auth: &BearerToken, blog: &BlogId) -> Result<Thread> {
        let store = self.store();
        store.authenticate(auth)?;
        store.thread(blog)
    }

    async fn add_comment(&self, auth: &BearerToken, blog: &BlogId, body: &CommentBody) -> Result<()> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        store.add_comment(user, blog, body)?;
        Ok(())
    }

    async fn add_reply(
        &self,
        auth: &BearerToken,
        blog: &BlogId,
        comment: &CommentId,
        body: &CommentBody,
    ) -> Result<()> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        store.add_reply(user, blog, comment, body)?;
        Ok(())
    }

    async fn delete_node(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        store.delete_node(&user, blog, node)
    }

    async fn toggle_node_like(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        let mut store = self.store();
        let user = store.authenticate(auth)?;
        store.toggle_node_like(&user, blog, node)?;
        Ok(())
    }
}
