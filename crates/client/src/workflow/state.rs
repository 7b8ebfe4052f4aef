use domain::{Blog, BlogId, ImageInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub body: String,
    pub image: Option<ImageInput>,
}

impl BlogDraft {
    /// Pre-fills the form with a blog's current values. The stored image is
    /// carried as a reference and kept unless replaced.
    pub fn from_blog(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            body: blog.body.clone(),
            image: blog.image.clone().map(ImageInput::Keep),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    Creating {
        draft: BlogDraft,
    },
    Editing {
        blog_id: BlogId,
        draft: BlogDraft,
        /// Image reference stored on the server when editing began.
        stored_image: Option<String>,
    },
}

impl FormState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn draft(&self) -> Option<&BlogDraft> {
        match self {
            Self::Closed => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub(super) fn draft_mut(&mut self) -> Option<&mut BlogDraft> {
        match self {
            Self::Closed => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing(&self) -> Option<&BlogId> {
        match self {
            Self::Editing { blog_id, .. } => Some(blog_id),
            _ => None,
        }
    }
}
