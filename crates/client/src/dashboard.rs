use adapter::{Session, Transport};
use domain::{Blog, BlogId, ClientError, NodeId, Result};
use std::sync::Arc;
use storage::ViewScope;
use tracing::{debug, info, warn};

use crate::blogs::BlogRepository;
use crate::gate::DeletionGate;
use crate::thread::CommentThreadManager;
use crate::workflow::EditWorkflow;

const BLOG_PROMPT: &str = "Delete this blog? This cannot be undone.";
const NODE_PROMPT: &str = "Delete this comment?";

// 列表、详情页、表单和两个删除确认的组合
pub struct Dashboard {
    transport: Arc<dyn Transport>,
    repo: BlogRepository,
    scope: ViewScope,
    form: EditWorkflow,
    blog_gate: DeletionGate<BlogId>,
    node_gate: DeletionGate<NodeId>,
    detail: Option<Arc<CommentThreadManager>>,
}

impl Dashboard {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self {
            repo: BlogRepository::new(transport.clone(), session),
            transport,
            scope: ViewScope::new(),
            form: EditWorkflow::new(),
            blog_gate: DeletionGate::new(BLOG_PROMPT),
            node_gate: DeletionGate::new(NODE_PROMPT),
            detail: None,
        }
    }

    pub fn repo(&self) -> &BlogRepository {
        &self.repo
    }

    pub fn session(&self) -> &Session {
        self.repo.session()
    }

    pub fn form(&self) -> &EditWorkflow {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditWorkflow {
        &mut self.form
    }

    pub fn blog_gate(&self) -> &DeletionGate<BlogId> {
        &self.blog_gate
    }

    pub fn node_gate(&self) -> &DeletionGate<NodeId> {
        &self.node_gate
    }

    pub async fn refresh(&self) -> Result<Arc<Vec<Blog>>> {
        self.repo.list().await
    }

    pub async fn toggle_like(&self, id: &BlogId) -> Result<()> {
        let user_id = self.session().user_id().clone();
        self.repo.toggle_like(id, &user_id).await
    }

    // --- 表单 ---

    pub fn start_create(&mut self) {
        self.form.add_new();
    }

    pub fn start_edit(&mut self, id: &BlogId) -> Result<()> {
        let blog = self
            .repo
            .get(id)
            .ok_or_else(|| ClientError::NotFound(format!("blog {}", id)))?;
        self.form.edit(blog);
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form.cancel();
    }

    pub async fn submit_form(&mut self) -> Result<()> {
        self.form.submit(&self.repo).await
    }

    // --- 删除博客 ---

    pub fn request_delete(&mut self, id: BlogId) {
        self.blog_gate.request(id);
    }

    pub fn cancel_delete(&mut self) {
        self.blog_gate.cancel();
    }

    /// Deletes the pending blog. An open detail view of it is closed before
    /// the request goes out, so a thread fetch still in flight for it is
    /// dropped on arrival; if the delete fails the view is put back. A blog
    /// that is already gone counts as deleted.
    pub async fn confirm_delete(&mut self) -> Result<Option<BlogId>> {
        let Some(target) = self.blog_gate.target().cloned() else {
            return Ok(None);
        };
        let closed_view = if self.scope.is_current(&target) {
            let manager = self.detail.clone();
            self.close_blog();
            manager
        } else {
            None
        };

        let outcome = match self.blog_gate.confirm(&self.repo).await {
            Err(e) if e.is_not_found() => {
                info!("Blog {} was already gone", target);
                if let Err(e) = self.repo.list().await {
                    warn!("Blog list refresh after delete failed: {}", e);
                }
                Some(target)
            }
            Err(e) => {
                // 删除失败，恢复原来的详情页
                if let Some(manager) = closed_view {
                    self.scope.open(target.clone());
                    self.detail = Some(manager);
                    debug!("Reopened detail view of {}", target);
                }
                return Err(e);
            }
            Ok(deleted) => deleted,
        };

        if let Some(deleted) = &outcome {
            if self.form.state().editing() == Some(deleted) {
                self.form.cancel();
            }
        }
        Ok(outcome)
    }

    // --- 详情页 ---

    /// Switches the detail view to `id` and loads its thread. Any previous
    /// manager is dropped along with its reply box and pending node delete.
    pub async fn open_blog(&mut self, id: &BlogId) -> Result<Arc<CommentThreadManager>> {
        if self.repo.get(id).is_none() {
            return Err(ClientError::NotFound(format!("blog {}", id)));
        }
        self.scope.open(id.clone());
        self.node_gate.cancel();

        let manager = Arc::new(CommentThreadManager::new(
            id.clone(),
            self.transport.clone(),
            self.session().clone(),
            self.scope.clone(),
        ));
        self.detail = Some(manager.clone());
        debug!("Opened detail view of {}", id);

        manager.load_thread().await?;
        Ok(manager)
    }

    pub fn close_blog(&mut self) {
        if let Some(closed) = self.scope.close() {
            debug!("Closed detail view of {}", closed);
        }
        self.node_gate.cancel();
        self.detail = None;
    }

    pub fn detail(&self) -> Option<Arc<CommentThreadManager>> {
        self.detail.clone()
    }

    pub fn open_detail(&self) -> Result<Arc<CommentThreadManager>> {
        self.detail
            .clone()
            .ok_or_else(|| ClientError::Validation("no blog is open".to_string()))
    }

    // --- 删除评论 ---

    pub fn request_node_delete(&mut self, node: NodeId) -> Result<()> {
        let manager = self.open_detail()?;
        if !manager.thread().contains(&node) {
            return Err(ClientError::NotFound(node.to_string()));
        }
        self.node_gate.request(node);
        Ok(())
    }

    pub fn cancel_node_delete(&mut self) {
        self.node_gate.cancel();
    }

    pub async fn confirm_node_delete(&mut self) -> Result<Option<NodeId>> {
        let Some(manager) = self.detail.clone() else {
            self.node_gate.cancel();
            return Ok(None);
        };
        self.node_gate.confirm(manager.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::MemoryTransport;
    use domain::{NewBlog, User};

    fn dashboard() -> (Dashboard, MemoryTransport, Blog) {
        let memory = MemoryTransport::new();
        let user = User::new("ann", "ann@example.com");
        memory.register("t-ann", user.clone());
        let blog = memory.seed_blog(user.clone(), &NewBlog::new("seed", "body", None).unwrap());
        let dashboard = Dashboard::new(
            Arc::new(memory.clone()),
            Session::new(user, Some("t-ann".to_string())),
        );
        (dashboard, memory, blog)
    }

    #[tokio::test]
    async fn open_blog_requires_cached_blog() {
        let (mut dash, _, blog) = dashboard();
        assert!(matches!(dash.open_blog(&blog.id).await, Err(e) if e.is_not_found()));

        dash.refresh().await.unwrap();
        let manager = dash.open_blog(&blog.id).await.unwrap();
        assert!(manager.is_active());
        assert_eq!(manager.revision(), 1);
    }

    #[tokio::test]
    async fn switching_blogs_deactivates_previous_manager() {
        let (mut dash, memory, first) = dashboard();
        let second = memory.seed_blog(first.author.clone(), &NewBlog::new("two", "b", None).unwrap());
        dash.refresh().await.unwrap();

        let old = dash.open_blog(&first.id).await.unwrap();
        dash.open_blog(&second.id).await.unwrap();
        assert!(!old.is_active());
        assert_eq!(dash.detail().unwrap().blog_id(), &second.id);
    }

    #[tokio::test]
    async fn deleting_edited_blog_closes_form() {
        let (mut dash, _, blog) = dashboard();
        dash.refresh().await.unwrap();
        dash.start_edit(&blog.id).unwrap();

        dash.request_delete(blog.id.clone());
        assert_eq!(dash.confirm_delete().await.unwrap(), Some(blog.id.clone()));
        assert!(!dash.form().is_open());
        assert!(dash.repo().blogs().is_empty());
    }

    #[tokio::test]
    async fn already_deleted_blog_counts_as_gone() {
        let (mut dash, memory, blog) = dashboard();
        dash.refresh().await.unwrap();

        let other = Dashboard::new(
            Arc::new(memory),
            dash.session().clone(),
        );
        other.repo().delete(&blog.id).await.unwrap();

        dash.request_delete(blog.id.clone());
        assert_eq!(dash.confirm_delete().await.unwrap(), Some(blog.id));
        assert!(dash.repo().blogs().is_empty());
    }

    #[tokio::test]
    async fn node_delete_needs_open_blog() {
        let (mut dash, _, _) = dashboard();
        let node = NodeId::Comment(domain::CommentId::new("c1"));
        assert!(dash.request_node_delete(node).is_err());
        assert_eq!(dash.confirm_node_delete().await.unwrap(), None);
    }
}
