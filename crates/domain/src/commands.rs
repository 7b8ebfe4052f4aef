use crate::error::{ClientError, Result};

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Image field of the blog form.
///
/// `Keep` carries the reference the server already stores and is never
/// re-uploaded; only `Upload` replaces the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Keep(String),
    Upload(ImageUpload),
}

impl ImageInput {
    pub fn into_upload(self) -> Option<ImageUpload> {
        match self {
            Self::Keep(_) => None,
            Self::Upload(upload) => Some(upload),
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Keep(reference) => Some(reference),
            Self::Upload(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub body: String,
    pub image: Option<ImageUpload>,
}

impl NewBlog {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        image: Option<ImageUpload>,
    ) -> Result<Self> {
        let (title, body) = (title.into(), body.into());
        require_text("title", &title)?;
        require_text("body", &body)?;
        Ok(Self { title, body, image })
    }
}

/// Update payload. `image: None` leaves the stored image untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPatch {
    pub title: String,
    pub body: String,
    pub image: Option<ImageUpload>,
}

impl BlogPatch {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        image: Option<ImageInput>,
    ) -> Result<Self> {
        let (title, body) = (title.into(), body.into());
        require_text("title", &title)?;
        require_text("body", &body)?;
        Ok(Self {
            title,
            body,
            image: image.and_then(ImageInput::into_upload),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        require_text("content", &content)?;
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
