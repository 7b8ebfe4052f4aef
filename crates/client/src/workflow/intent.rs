use domain::{Blog, ImageUpload};

#[derive(Debug, Clone)]
pub enum FormIntent {
    AddNew,
    Edit(Blog),
    SetTitle(String),
    SetBody(String),
    AttachImage(ImageUpload),
    ClearImage,
    Cancel,
    Submitted,
}
