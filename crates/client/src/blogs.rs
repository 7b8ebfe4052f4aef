use adapter::{Session, Transport};
use async_trait::async_trait;
use domain::{
    Blog, BlogId, BlogPatch, ClientError, ImageInput, ImageUpload, NewBlog, Result, UserId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storage::{BlogCache, Snapshot};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::gate::Deleter;

// 统计进行中的拉取
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn failed(action: &str, err: ClientError) -> ClientError {
    warn!("Failed to {}: {}", action, err);
    err
}

/// Owns the local blog list. Every successful mutation is followed by a full
/// `list()`; likes are never flipped locally.
pub struct BlogRepository {
    transport: Arc<dyn Transport>,
    session: Session,
    cache: BlogCache,
    in_flight: AtomicUsize,
}

impl BlogRepository {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self {
            transport,
            session,
            cache: BlogCache::new(),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn blogs(&self) -> Arc<Vec<Blog>> {
        self.cache.blogs()
    }

    pub fn get(&self, id: &BlogId) -> Option<Blog> {
        self.cache.find(id)
    }

    pub fn revision(&self) -> u64 {
        self.cache.revision()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Vec<Blog>>> {
        self.cache.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Fetches the whole collection and replaces the cache with it. On failure
    /// the previous cache stays as it was.
    pub async fn list(&self) -> Result<Arc<Vec<Blog>>> {
        let auth = self.session.bearer()?;
        let _loading = Loading::enter(&self.in_flight);
        debug!("Fetching blog list");
        let blogs = self
            .transport
            .list_blogs(auth)
            .await
            .map_err(|e| failed("fetch blogs", e))?;
        Ok(self.cache.replace(blogs))
    }

    // 变更已经成功，刷新失败只记录，不回传给调用方
    async fn refresh_after(&self, action: &str) {
        if let Err(e) = self.list().await {
            warn!("Blog list refresh after {} failed: {}", action, e);
        }
    }

    pub async fn create(&self, title: &str, body: &str, image: Option<ImageUpload>) -> Result<()> {
        let new = NewBlog::new(title, body, image)?;
        let auth = self.session.bearer()?;
        let created = self
            .transport
            .create_blog(auth, &new)
            .await
            .map_err(|e| failed("create blog", e))?;
        match created {
            Some(blog) => info!("Blog created: {}", blog.id),
            None => info!("Blog created"),
        }
        self.refresh_after("create").await;
        Ok(())
    }

    /// `ImageInput::Keep` leaves the stored image alone; only an upload replaces it.
    pub async fn update(
        &self,
        id: &BlogId,
        title: &str,
        body: &str,
        image: Option<ImageInput>,
    ) -> Result<()> {
        let patch = BlogPatch::new(title, body, image)?;
        let auth = self.session.bearer()?;
        self.transport
            .update_blog(auth, id, &patch)
            .await
            .map_err(|e| failed("update blog", e))?;
        info!("Blog updated: {}", id);
        self.refresh_after("update").await;
        Ok(())
    }

    pub async fn delete(&self, id: &BlogId) -> Result<()> {
        let auth = self.session.bearer()?;
        self.transport
            .delete_blog(auth, id)
            .await
            .map_err(|e| failed("delete blog", e))?;
        info!("Blog deleted: {}", id);
        self.refresh_after("delete").await;
        Ok(())
    }

    // 结果以随后的 list() 为准，本地不翻转
    pub async fn toggle_like(&self, id: &BlogId, user_id: &UserId) -> Result<()> {
        if user_id != self.session.user_id() {
            return Err(ClientError::Unauthorized(format!(
                "cannot like on behalf of {}",
                user_id
            )));
        }
        let auth = self.session.bearer()?;
        self.transport
            .toggle_blog_like(auth, id)
            .await
            .map_err(|e| failed("toggle blog like", e))?;
        debug!("Like toggled on blog {} by {}", id, user_id);
        self.refresh_after("like").await;
        Ok(())
    }
}

#[async_trait]
impl Deleter<BlogId> for BlogRepository {
    async fn delete_target(&self, id: &BlogId) -> Result<()> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::MemoryTransport;
    use domain::User;

    fn repo() -> (BlogRepository, MemoryTransport) {
        let memory = MemoryTransport::new();
        let user = User::new("ann", "ann@example.com");
        memory.register("t-ann", user.clone());
        let session = Session::new(user, Some("t-ann".to_string()));
        (BlogRepository::new(Arc::new(memory.clone()), session), memory)
    }

    #[tokio::test]
    async fn loading_flag_resets_after_fetch() {
        let (repo, _) = repo();
        assert!(!repo.is_loading());
        repo.list().await.unwrap();
        assert!(!repo.is_loading());
    }

    #[tokio::test]
    async fn missing_credential_is_unauthorized() {
        let memory = MemoryTransport::new();
        let session = Session::new(User::new("ann", "ann@example.com"), None);
        let repo = BlogRepository::new(Arc::new(memory), session);

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(repo.revision(), 0);
    }

    #[tokio::test]
    async fn like_for_another_user_is_refused() {
        let (repo, _) = repo();
        repo.create("t", "b", None).await.unwrap();
        let id = repo.blogs()[0].id.clone();

        let err = repo.toggle_like(&id, &UserId::new("bob")).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert_eq!(repo.blogs()[0].like_count(), 0);
    }

    #[tokio::test]
    async fn update_keeps_image_reference() {
        let (repo, _) = repo();
        let upload = ImageUpload::new("a.png", "image/png", vec![9]);
        repo.create("t", "b", Some(upload)).await.unwrap();
        let blog = repo.blogs()[0].clone();
        let image = blog.image.clone().unwrap();

        repo.update(&blog.id, "t2", "b2", Some(ImageInput::Keep(image.clone())))
            .await
            .unwrap();

        let updated = repo.get(&blog.id).unwrap();
        assert_eq!(updated.title, "t2");
        assert_eq!(updated.image, Some(image));
    }

    #[tokio::test]
    async fn update_of_missing_blog_surfaces_not_found() {
        let (repo, _) = repo();
        let err = repo
            .update(&BlogId::new("ghost"), "t", "b", None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
