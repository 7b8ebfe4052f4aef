//! JSON shapes spoken by the blog backend (`_id`, `description`, `createdAt`, ...)
//! and their mapping onto the domain model.

use crate::models::{Blog, BlogId, Comment, CommentId, LikeSet, Reply, ReplyId, Thread, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// multipart 字段名
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_IMAGE: &str = "blogImage";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// The backend either populates the author or leaves the bare id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireAuthor {
    Populated(WireUser),
    Id(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireBlog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub user: Option<WireAuthor>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireReply {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<WireAuthor>,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireComment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<WireAuthor>,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub replies: Vec<WireReply>,
}

/// Response of `POST /api/blogs`; some deployments wrap the created record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreatedBlog {
    Bare(WireBlog),
    Wrapped { blog: WireBlog },
}

impl CreatedBlog {
    pub fn into_blog(self) -> Blog {
        match self {
            Self::Bare(blog) | Self::Wrapped { blog } => blog.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content: String,
}

fn likes_from_wire(likes: Vec<String>) -> LikeSet {
    likes.into_iter().map(UserId::from).collect()
}

fn likes_to_wire(likes: &LikeSet) -> Vec<String> {
    likes.iter().map(|u| u.as_str().to_string()).collect()
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        User {
            id: UserId::new(wire.id),
            email: wire.email,
            avatar: wire.profile_image,
        }
    }
}

impl From<&User> for WireUser {
    fn from(user: &User) -> Self {
        WireUser {
            id: user.id.as_str().to_string(),
            email: user.email.clone(),
            profile_image: user.avatar.clone(),
        }
    }
}

fn author_from_wire(author: Option<WireAuthor>) -> User {
    match author {
        Some(WireAuthor::Populated(user)) => user.into(),
        Some(WireAuthor::Id(id)) => User::new(id, ""),
        None => User::anonymous(),
    }
}

impl From<WireBlog> for Blog {
    fn from(wire: WireBlog) -> Self {
        Blog {
            id: BlogId::new(wire.id),
            title: wire.title,
            body: wire.description,
            image: wire.image.filter(|i| !i.is_empty()),
            author: author_from_wire(wire.user),
            created_at: wire.created_at,
            likes: likes_from_wire(wire.likes),
        }
    }
}

impl From<&Blog> for WireBlog {
    fn from(blog: &Blog) -> Self {
        WireBlog {
            id: blog.id.as_str().to_string(),
            title: blog.title.clone(),
            description: blog.body.clone(),
            image: blog.image.clone(),
            user: Some(WireAuthor::Populated((&blog.author).into())),
            created_at: blog.created_at,
            likes: likes_to_wire(&blog.likes),
        }
    }
}

impl WireComment {
    /// Replies inherit their parent from the enclosing comment; the wire form
    /// does not repeat it.
    pub fn into_comment(self, blog_id: &BlogId) -> Comment {
        let comment_id = CommentId::new(self.id);
        let replies = self
            .replies
            .into_iter()
            .map(|r| Reply {
                id: ReplyId::new(r.id),
                comment_id: comment_id.clone(),
                author: author_from_wire(r.user),
                content: r.content,
                created_at: r.created_at,
                likes: likes_from_wire(r.likes),
            })
            .collect();

        Comment {
            id: comment_id,
            blog_id: blog_id.clone(),
            author: author_from_wire(self.user),
            content: self.content,
            created_at: self.created_at,
            likes: likes_from_wire(self.likes),
            replies,
        }
    }
}

impl From<&Comment> for WireComment {
    fn from(c: &Comment) -> Self {
        WireComment {
            id: c.id.as_str().to_string(),
            user: Some(WireAuthor::Populated((&c.author).into())),
            content: c.content.clone(),
            created_at: c.created_at,
            likes: likes_to_wire(&c.likes),
            replies: c
                .replies
                .iter()
                .map(|r| WireReply {
                    id: r.id.as_str().to_string(),
                    user: Some(WireAuthor::Populated((&r.author).into())),
                    content: r.content.clone(),
                    created_at: r.created_at,
                    likes: likes_to_wire(&r.likes),
                })
                .collect(),
        }
    }
}

pub fn thread_from_wire(blog_id: BlogId, comments: Vec<WireComment>) -> Thread {
    let comments = comments
        .into_iter()
        .map(|c| c.into_comment(&blog_id))
        .collect();
    Thread { blog_id, comments }
}
