//! Create/Edit Workflow: a single blog form that is either closed, filling a
//! new blog, or editing an existing one.

mod intent;
mod reducer;
mod state;

pub use intent::FormIntent;
pub use reducer::FormReducer;
pub use state::{BlogDraft, FormState};

use domain::{Blog, ClientError, ImageInput, ImageUpload, Result};
use tracing::{debug, info};

use crate::blogs::BlogRepository;
use crate::mvi::Reducer;

#[derive(Debug, Default)]
pub struct EditWorkflow {
    state: FormState,
}

impl EditWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn dispatch(&mut self, intent: FormIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = FormReducer::reduce(state, intent);
    }

    pub fn add_new(&mut self) {
        self.dispatch(FormIntent::AddNew);
    }

    pub fn edit(&mut self, blog: Blog) {
        debug!("Editing blog {}", blog.id);
        self.dispatch(FormIntent::Edit(blog));
    }

    pub fn cancel(&mut self) {
        self.dispatch(FormIntent::Cancel);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.dispatch(FormIntent::SetTitle(title.into()));
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.dispatch(FormIntent::SetBody(body.into()));
    }

    pub fn attach_image(&mut self, upload: ImageUpload) {
        self.dispatch(FormIntent::AttachImage(upload));
    }

    pub fn clear_image(&mut self) {
        self.dispatch(FormIntent::ClearImage);
    }

    /// Sends the draft through `repo`. The form closes only once the
    /// repository reports success; on error every field stays as typed.
    pub async fn submit(&mut self, repo: &BlogRepository) -> Result<()> {
        match &self.state {
            FormState::Closed => {
                return Err(ClientError::Validation("no form is open".to_string()));
            }
            FormState::Creating { draft } => {
                let image = draft.image.clone().and_then(ImageInput::into_upload);
                repo.create(&draft.title, &draft.body, image).await?;
                info!("New blog submitted");
            }
            FormState::Editing { blog_id, draft, .. } => {
                repo.update(blog_id, &draft.title, &draft.body, draft.image.clone())
                    .await?;
                info!("Edit of {} submitted", blog_id);
            }
        }
        self.dispatch(FormIntent::Submitted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter::{MemoryTransport, Session};
    use domain::User;
    use std::sync::Arc;

    fn repo() -> BlogRepository {
        let memory = MemoryTransport::new();
        let user = User::new("ann", "ann@example.com");
        memory.register("t-ann", user.clone());
        BlogRepository::new(
            Arc::new(memory),
            Session::new(user, Some("t-ann".to_string())),
        )
    }

    #[tokio::test]
    async fn submit_create_closes_form() {
        let repo = repo();
        let mut form = EditWorkflow::new();
        form.add_new();
        form.set_title("Hello");
        form.set_body("World");

        form.submit(&repo).await.unwrap();
        assert_eq!(form.state(), &FormState::Closed);
        assert_eq!(repo.blogs().len(), 1);
        assert_eq!(repo.blogs()[0].title, "Hello");
    }

    #[tokio::test]
    async fn invalid_draft_keeps_form_open() {
        let repo = repo();
        let mut form = EditWorkflow::new();
        form.add_new();
        form.set_title("   ");
        form.set_body("body");

        let err = form.submit(&repo).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(form.is_open());
        assert_eq!(form.state().draft().unwrap().body, "body");
        assert_eq!(repo.revision(), 0);
    }

    #[tokio::test]
    async fn submit_without_form_is_rejected() {
        let repo = repo();
        let mut form = EditWorkflow::new();
        assert!(form.submit(&repo).await.is_err());
    }

    #[tokio::test]
    async fn submit_edit_updates_in_place() {
        let repo = repo();
        repo.create("one", "b", None).await.unwrap();
        let blog = repo.blogs()[0].clone();

        let mut form = EditWorkflow::new();
        form.edit(blog.clone());
        form.set_title("renamed");
        form.submit(&repo).await.unwrap();

        assert!(!form.is_open());
        assert_eq!(repo.blogs().len(), 1);
        assert_eq!(repo.get(&blog.id).unwrap().title, "renamed");
    }

    #[tokio::test]
    async fn cleared_upload_keeps_stored_image() {
        let repo = repo();
        let upload = ImageUpload::new("a.png", "image/png", vec![1]);
        repo.create("pic", "b", Some(upload)).await.unwrap();
        let blog = repo.blogs()[0].clone();
        let stored = blog.image.clone().unwrap();

        let mut form = EditWorkflow::new();
        form.edit(blog.clone());
        form.attach_image(ImageUpload::new("b.png", "image/png", vec![2]));
        form.clear_image();
        assert_eq!(
            form.state().draft().unwrap().image,
            Some(ImageInput::Keep(stored.clone()))
        );

        form.submit(&repo).await.unwrap();
        assert_eq!(repo.get(&blog.id).unwrap().image, Some(stored));
    }
}
