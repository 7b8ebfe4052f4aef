use chrono::Utc;
use domain::{
    Blog, BlogId, BlogPatch, ClientError, Comment, CommentBody, CommentId, ImageUpload, LikeSet,
    NewBlog, NodeId, Reply, ReplyId, Result, Thread, User,
};
use std::collections::HashMap;

use crate::session::BearerToken;

#[derive(Default)]
pub(crate) struct Store {
    users: HashMap<String, User>,
    blogs: Vec<Blog>,
    threads: HashMap<BlogId, Vec<Comment>>,
}

impl Store {
    pub fn register(&mut self, token: String, user: User) {
        self.users.insert(token, user);
    }

    pub fn authenticate(&self, auth: &BearerToken) -> Result<User> {
        self.users
            .get(auth.expose())
            .cloned()
            .ok_or_else(|| ClientError::Unauthorized("invalid token".to_string()))
    }

    fn id_taken(&self, id: &str) -> bool {
        self.blogs.iter().any(|b| b.id.as_str() == id)
            || self.threads.values().flatten().any(|c| {
                c.id.as_str() == id || c.replies.iter().any(|r| r.id.as_str() == id)
            })
    }

    // 24 位十六进制，博客、评论、回复之间都不重复
    fn fresh_id(&self) -> String {
        loop {
            let candidate = format!("{:024x}", rand::random::<u128>() >> 32);
            if !self.id_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn image_reference(&self, upload: &ImageUpload) -> String {
        format!("uploads/{}-{}", self.fresh_id(), upload.file_name)
    }

    fn blog_mut(&mut self, id: &BlogId) -> Result<&mut Blog> {
        self.blogs
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("blog {}", id)))
    }

    fn comments_mut(&mut self, blog: &BlogId) -> Result<&mut Vec<Comment>> {
        if !self.blogs.iter().any(|b| &b.id == blog) {
            return Err(ClientError::NotFound(format!("blog {}", blog)));
        }
        Ok(self.threads.entry(blog.clone()).or_default())
    }

    pub fn list_blogs(&self) -> Vec<Blog> {
        self.blogs.clone()
    }

    pub fn create_blog(&mut self, author: User, new: &NewBlog) -> Blog {
        let blog = Blog {
            id: BlogId::new(self.fresh_id()),
            title: new.title.clone(),
            body: new.body.clone(),
            image: new.image.as_ref().map(|i| self.image_reference(i)),
            author,
            created_at: Utc::now(),
            likes: LikeSet::new(),
        };
        self.blogs.push(blog.clone());
        blog
    }

    pub fn update_blog(&mut self, id: &BlogId, patch: &BlogPatch) -> Result<()> {
        let image = patch.image.as_ref().map(|i| self.image_reference(i));
        let blog = self.blog_mut(id)?;
        blog.title = patch.title.clone();
        blog.body = patch.body.clone();
        if image.is_some() {
            blog.image = image;
        }
        Ok(())
    }

    pub fn delete_blog(&mut self, id: &BlogId) -> Result<()> {
        let before = self.blogs.len();
        self.blogs.retain(|b| &b.id != id);
        if self.blogs.len() == before {
            return Err(ClientError::NotFound(format!("blog {}", id)));
        }
        self.threads.remove(id);
        Ok(())
    }

    pub fn toggle_blog_like(&mut self, user: &User, id: &BlogId) -> Result<bool> {
        Ok(self.blog_mut(id)?.likes.flip(&user.id))
    }

    pub fn thread(&self, blog: &BlogId) -> Result<Thread> {
        if !self.blogs.iter().any(|b| &b.id == blog) {
            return Err(ClientError::NotFound(format!("blog {}", blog)));
        }
        Ok(Thread {
            blog_id: blog.clone(),
            comments: self.threads.get(blog).cloned().unwrap_or_default(),
        })
    }

    pub fn add_comment(&mut self, author: User, blog: &BlogId, body: &CommentBody) -> Result<CommentId> {
        let id = CommentId::new(self.fresh_id());
        let comment = Comment {
            id: id.clone(),
            blog_id: blog.clone(),
            author,
            content: body.as_str().to_string(),
            created_at: Utc::now(),
            likes: LikeSet::new(),
            replies: Vec::new(),
        };
        self.comments_mut(blog)?.push(comment);
        Ok(id)
    }

    pub fn add_reply(
        &mut self,
        author: User,
        blog: &BlogId,
        comment: &CommentId,
        body: &CommentBody,
    ) -> Result<ReplyId> {
        let id = ReplyId::new(self.fresh_id());
        let parent = self
            .comments_mut(blog)?
            .iter_mut()
            .find(|c| &c.id == comment)
            .ok_or_else(|| ClientError::NotFound(format!("comment {}", comment)))?;
        parent.replies.push(Reply {
            id: id.clone(),
            comment_id: comment.clone(),
            author,
            content: body.as_str().to_string(),
            created_at: Utc::now(),
            likes: LikeSet::new(),
        });
        Ok(id)
    }

    /// Only the author may delete a comment or reply.
    pub fn delete_node(&mut self, user: &User, blog: &BlogId, node: &NodeId) -> Result<()> {
        let comments = self.comments_mut(blog)?;
        let raw = node.as_str();

        if let Some(pos) = comments.iter().position(|c| c.id.as_str() == raw) {
            if comments[pos].author.id != user.id {
                return Err(ClientError::Unauthorized("not the author of this comment".to_string()));
            }
            comments.remove(pos);
            return Ok(());
        }

        for comment in comments.iter_mut() {
            if let Some(pos) = comment.replies.iter().position(|r| r.id.as_str() == raw) {
                if comment.replies[pos].author.id != user.id {
                    return Err(ClientError::Unauthorized("not the author of this reply".to_string()));
                }
                comment.replies.remove(pos);
                return Ok(());
            }
        }

        Err(ClientError::NotFound(format!("comment {}", raw)))
    }

    pub fn toggle_node_like(&mut self, user: &User, blog: &BlogId, node: &NodeId) -> Result<bool> {
        let raw = node.as_str();
        for comment in self.comments_mut(blog)?.iter_mut() {
            if comment.id.as_str() == raw {
                return Ok(comment.likes.flip(&user.id));
            }
            if let Some(reply) = comment.replies.iter_mut().find(|r| r.id.as_str() == raw) {
                return Ok(reply.likes.flip(&user.id));
            }
        }
        Err(ClientError::NotFound(format!("comment {}", raw)))
    }
}
