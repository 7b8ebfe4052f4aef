use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

opaque_id!(
    /// 用户标识，由 Session 提供
    UserId
);
opaque_id!(BlogId);
opaque_id!(CommentId);
opaque_id!(ReplyId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            email: email.into(),
            avatar: None,
        }
    }

    // 服务端没有填充作者时的占位
    pub fn anonymous() -> Self {
        Self::new("", "")
    }

    pub fn display_name(&self) -> &str {
        if self.email.is_empty() {
            "Anonymous"
        } else {
            &self.email
        }
    }

    pub fn initial(&self) -> char {
        self.email
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('A')
    }
}

/// Set of users who liked a subject. `count()` is always the set size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeSet(BTreeSet<UserId>);

impl LikeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains(user)
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    pub fn flip(&mut self, user: &UserId) -> bool {
        if self.0.remove(user) {
            false
        } else {
            self.0.insert(user.clone());
            true
        }
    }
}

impl FromIterator<UserId> for LikeSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub body: String,
    /// 服务端保存的图片引用 (相对路径或完整 URL)
    pub image: Option<String>,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub likes: LikeSet,
}

impl Blog {
    pub fn like_count(&self) -> usize {
        self.likes.count()
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    pub fn image_url(&self, media_base: &str) -> Option<String> {
        self.image
            .as_deref()
            .map(|reference| resolve_media_url(media_base, reference))
    }
}

/// Absolute references pass through; relative ones are joined onto `media_base`.
pub fn resolve_media_url(media_base: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        media_base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    pub comment_id: CommentId,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: LikeSet,
}

impl Reply {
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author.id == user
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub blog_id: BlogId,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: LikeSet,
    /// 按创建顺序排列，只追加
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author.id == user
    }

    pub fn reply(&self, id: &ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|r| &r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    Comment(CommentId),
    Reply(ReplyId),
}

impl NodeId {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Comment(id) => id.as_str(),
            Self::Reply(id) => id.as_str(),
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(id) => write!(f, "comment:{}", id),
            Self::Reply(id) => write!(f, "reply:{}", id),
        }
    }
}

impl From<CommentId> for NodeId {
    fn from(id: CommentId) -> Self {
        Self::Comment(id)
    }
}

impl From<ReplyId> for NodeId {
    fn from(id: ReplyId) -> Self {
        Self::Reply(id)
    }
}

/// Comment tree of one blog. Depth is capped at comment -> reply by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub blog_id: BlogId,
    pub comments: Vec<Comment>,
}

impl Thread {
    pub fn empty(blog_id: BlogId) -> Self {
        Self {
            blog_id,
            comments: Vec::new(),
        }
    }

    pub fn comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    pub fn find(&self, raw: &str) -> Option<NodeId> {
        for comment in &self.comments {
            if comment.id.as_str() == raw {
                return Some(NodeId::Comment(comment.id.clone()));
            }
            if let Some(reply) = comment.replies.iter().find(|r| r.id.as_str() == raw) {
                return Some(NodeId::Reply(reply.id.clone()));
            }
        }
        None
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        match node {
            NodeId::Comment(id) => self.comment(id).is_some(),
            NodeId::Reply(id) => self.comments.iter().any(|c| c.reply(id).is_some()),
        }
    }

    pub fn node_count(&self) -> usize {
        self.comments.iter().map(|c| 1 + c.replies.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}
