use async_trait::async_trait;
use domain::{BlogId, BlogPatch, Blog, CommentBody, CommentId, NewBlog, NodeId, Result, Thread};

use crate::session::BearerToken;

/// Request/response exchange with the authoritative blog store. Failures
/// come back already classified as `ClientError`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn list_blogs(&self, auth: &BearerToken) -> Result<Vec<Blog>>;

    /// Any 2xx means the blog is stored. The created record comes back only
    /// when the server echoes it in a shape we understand.
    async fn create_blog(&self, auth: &BearerToken, blog: &NewBlog) -> Result<Option<Blog>>;

    async fn update_blog(&self, auth: &BearerToken, id: &BlogId, patch: &BlogPatch) -> Result<()>;

    async fn delete_blog(&self, auth: &BearerToken, id: &BlogId) -> Result<()>;

    async fn toggle_blog_like(&self, auth: &BearerToken, id: &BlogId) -> Result<()>;

    async fn list_comments(&self, auth: &BearerToken, blog: &BlogId) -> Result<Thread>;

    async fn add_comment(&self, auth: &BearerToken, blog: &BlogId, body: &CommentBody) -> Result<()>;

    async fn add_reply(
        &self,
        auth: &BearerToken,
        blog: &BlogId,
        comment: &CommentId,
        body: &CommentBody,
    ) -> Result<()>;

    /// Comments and replies share one route; the server resolves the kind.
    async fn delete_node(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()>;

    async fn toggle_node_like(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()>;
}
