use anyhow::Context;
use domain::{BlogId, CommentId, NodeId};
use reqwest::Url;

/// REST layout of the blog backend, rooted at `{base}/api`.
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
}

impl Routes {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", base_url);
        }
        Ok(Self { base })
    }

    fn build(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // new() 已经排除了 cannot-be-a-base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    pub fn blogs(&self) -> Url {
        self.build(&["blogs"])
    }

    pub fn blog(&self, id: &BlogId) -> Url {
        self.build(&["blogs", id.as_str()])
    }

    pub fn blog_like(&self, id: &BlogId) -> Url {
        self.build(&["blogs", id.as_str(), "like"])
    }

    pub fn comments(&self, blog: &BlogId) -> Url {
        self.build(&["blogs", blog.as_str(), "comments"])
    }

    pub fn replies(&self, blog: &BlogId, comment: &CommentId) -> Url {
        self.build(&["blogs", blog.as_str(), "comments", comment.as_str(), "replies"])
    }

    pub fn node(&self, blog: &BlogId, node: &NodeId) -> Url {
        self.build(&["blogs", blog.as_str(), "comments", node.as_str()])
    }

    pub fn node_like(&self, blog: &BlogId, node: &NodeId) -> Url {
        self.build(&["blogs", blog.as_str(), "comments", node.as_str(), "like"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ReplyId;

    #[test]
    fn builds_backend_paths() {
        let routes = Routes::new("http://localhost:3000").unwrap();
        let blog = BlogId::new("b1");

        assert_eq!(routes.blogs().as_str(), "http://localhost:3000/api/blogs");
        assert_eq!(routes.blog_like(&blog).path(), "/api/blogs/b1/like");
        assert_eq!(
            routes.replies(&blog, &CommentId::new("c1")).path(),
            "/api/blogs/b1/comments/c1/replies"
        );
        assert_eq!(
            routes.node_like(&blog, &NodeId::Reply(ReplyId::new("r1"))).path(),
            "/api/blogs/b1/comments/r1/like"
        );
    }

    #[test]
    fn base_with_prefix_and_trailing_slash() {
        let routes = Routes::new("https://example.org/blog/").unwrap();
        assert_eq!(routes.blogs().path(), "/blog/api/blogs");
    }

    #[test]
    fn ids_are_percent_encoded() {
        let routes = Routes::new("http://localhost:3000").unwrap();
        assert_eq!(routes.blog(&BlogId::new("a/b")).path(), "/api/blogs/a%2Fb");
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(Routes::new("mailto:someone@example.org").is_err());
        assert!(Routes::new("not a url").is_err());
    }
}
