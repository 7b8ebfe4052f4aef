mod commands;
mod error;
mod models;
pub mod protocol;

pub use commands::{BlogPatch, CommentBody, ImageInput, ImageUpload, NewBlog};
pub use error::{ClientError, Result};
pub use models::{
    resolve_media_url, Blog, BlogId, Comment, CommentId, LikeSet, NodeId, Reply, ReplyId, Thread,
    User, UserId,
};
