use adapter::{Session, Transport};
use async_trait::async_trait;
use domain::{BlogId, ClientError, CommentBody, CommentId, NodeId, Result, Thread, UserId};
use std::sync::{Arc, Mutex, PoisonError};
use storage::{Snapshot, ThreadCache, ViewScope};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::gate::Deleter;

/// Comment tree of one open blog.
///
/// Lives exactly as long as the detail view of `blog_id`. Results of fetches
/// that complete after the view was closed or switched are dropped instead
/// of published.
pub struct CommentThreadManager {
    blog_id: BlogId,
    transport: Arc<dyn Transport>,
    session: Session,
    scope: ViewScope,
    cache: ThreadCache,
    reply_target: Mutex<Option<CommentId>>,
}

impl CommentThreadManager {
    pub fn new(
        blog_id: BlogId,
        transport: Arc<dyn Transport>,
        session: Session,
        scope: ViewScope,
    ) -> Self {
        Self {
            cache: ThreadCache::new(blog_id.clone()),
            blog_id,
            transport,
            session,
            scope,
            reply_target: Mutex::new(None),
        }
    }

    pub fn blog_id(&self) -> &BlogId {
        &self.blog_id
    }

    pub fn is_active(&self) -> bool {
        self.scope.is_current(&self.blog_id)
    }

    pub fn thread(&self) -> Arc<Thread> {
        self.cache.thread()
    }

    pub fn revision(&self) -> u64 {
        self.cache.revision()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Thread>> {
        self.cache.subscribe()
    }

    /// Full refresh. `Ok(None)` means the view moved on while the request was
    /// in flight and its outcome was discarded.
    pub async fn load_thread(&self) -> Result<Option<Arc<Thread>>> {
        let auth = self.session.bearer()?;
        debug!("Fetching thread of {}", self.blog_id);
        let fetched = self.transport.list_comments(auth, &self.blog_id).await;

        if !self.is_active() {
            debug!("Discarding stale thread fetch for {}", self.blog_id);
            return Ok(None);
        }

        match fetched {
            Ok(thread) => Ok(self.cache.replace(thread)),
            Err(e) => {
                warn!("Failed to fetch thread of {}: {}", self.blog_id, e);
                Err(e)
            }
        }
    }

    async fn refresh_after(&self, action: &str) {
        if let Err(e) = self.load_thread().await {
            warn!("Thread refresh after {} failed: {}", action, e);
        }
    }

    pub async fn add_comment(&self, content: &str) -> Result<()> {
        let body = CommentBody::new(content)?;
        let auth = self.session.bearer()?;
        self.transport
            .add_comment(auth, &self.blog_id, &body)
            .await
            .inspect_err(|e| warn!("Failed to add comment on {}: {}", self.blog_id, e))?;
        info!("Comment added on {}", self.blog_id);
        self.refresh_after("comment").await;
        Ok(())
    }

    pub async fn add_reply(&self, comment_id: &CommentId, content: &str) -> Result<()> {
        let body = CommentBody::new(content)?;
        let auth = self.session.bearer()?;
        self.transport
            .add_reply(auth, &self.blog_id, comment_id, &body)
            .await
            .inspect_err(|e| warn!("Failed to reply to {}: {}", comment_id, e))?;
        info!("Reply added under {}", comment_id);
        self.refresh_after("reply").await;
        Ok(())
    }

    // 评论和回复走同一个删除接口
    pub async fn delete_node(&self, node: &NodeId) -> Result<()> {
        let auth = self.session.bearer()?;
        self.transport
            .delete_node(auth, &self.blog_id, node)
            .await
            .inspect_err(|e| warn!("Failed to delete {}: {}", node, e))?;
        info!("Deleted {} on {}", node, self.blog_id);
        self.refresh_after("delete").await;
        Ok(())
    }

    pub async fn toggle_like(&self, node: &NodeId, user_id: &UserId) -> Result<()> {
        if user_id != self.session.user_id() {
            return Err(ClientError::Unauthorized(format!(
                "cannot like on behalf of {}",
                user_id
            )));
        }
        let auth = self.session.bearer()?;
        self.transport
            .toggle_node_like(auth, &self.blog_id, node)
            .await
            .inspect_err(|e| warn!("Failed to toggle like on {}: {}", node, e))?;
        debug!("Like toggled on {} by {}", node, user_id);
        self.refresh_after("like").await;
        Ok(())
    }

    // --- 回复输入框 ---

    /// Opens the reply box under `comment_id`. Only one box is open at a time.
    pub fn begin_reply(&self, comment_id: &CommentId) -> Result<()> {
        if self.thread().comment(comment_id).is_none() {
            return Err(ClientError::NotFound(format!("comment {}", comment_id)));
        }
        *self.lock_reply_target() = Some(comment_id.clone());
        Ok(())
    }

    pub fn cancel_reply(&self) {
        self.lock_reply_target().take();
    }

    pub fn reply_target(&self) -> Option<CommentId> {
        self.lock_reply_target().clone()
    }

    /// Posts `content` under the open reply box; the box closes only on success.
    pub async fn submit_reply(&self, content: &str) -> Result<()> {
        let target = self
            .reply_target()
            .ok_or_else(|| ClientError::Validation("no comment selected for reply".to_string()))?;
        self.add_reply(&target, content).await?;

        let mut current = self.lock_reply_target();
        if current.as_ref() == Some(&target) {
            *current = None;
        }
        Ok(())
    }

    fn lock_reply_target(&self) -> std::sync::MutexGuard<'_, Option<CommentId>> {
        self.reply_target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Deleter<NodeId> for CommentThreadManager {
    async fn delete_target(&self, node: &NodeId) -> Result<()> {
        self.delete_node(node).await
    }
}
