use anyhow::Context;
use async_trait::async_trait;
use domain::protocol::{
    thread_from_wire, ContentRequest, CreatedBlog, WireBlog, WireComment, FIELD_DESCRIPTION,
    FIELD_IMAGE, FIELD_TITLE,
};
use domain::{
    Blog, BlogId, BlogPatch, ClientError, CommentBody, CommentId, ImageUpload, NewBlog, NodeId,
    Result, Thread,
};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::routes::Routes;
use crate::session::BearerToken;
use crate::traits::Transport;

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

pub struct HttpTransport {
    client: reqwest::Client,
    routes: Routes,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            routes: Routes::new(&config.base_url)?,
        })
    }

    async fn execute(&self, request: RequestBuilder, auth: &BearerToken) -> Result<Response> {
        let response = request
            .bearer_auth(auth.expose())
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        ensure_success(response).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url, auth: &BearerToken) -> Result<T> {
        debug!("GET {}", url);
        let response = self.execute(self.client.get(url), auth).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("invalid response body: {}", e)))
    }

    async fn post_empty(&self, url: Url, auth: &BearerToken) -> Result<()> {
        debug!("POST {}", url);
        self.execute(self.client.post(url).json(&serde_json::json!({})), auth)
            .await?;
        Ok(())
    }

    async fn post_content(&self, url: Url, auth: &BearerToken, body: &CommentBody) -> Result<()> {
        debug!("POST {}", url);
        let payload = ContentRequest {
            content: body.as_str().to_string(),
        };
        self.execute(self.client.post(url).json(&payload), auth)
            .await?;
        Ok(())
    }

    async fn delete(&self, url: Url, auth: &BearerToken) -> Result<()> {
        debug!("DELETE {}", url);
        self.execute(self.client.delete(url), auth).await?;
        Ok(())
    }
}

fn blog_form(title: &str, body: &str, image: Option<&ImageUpload>) -> Result<Form> {
    let mut form = Form::new()
        .text(FIELD_TITLE, title.to_string())
        .text(FIELD_DESCRIPTION, body.to_string());

    if let Some(image) = image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| {
                ClientError::Validation(format!(
                    "invalid image content type '{}': {}",
                    image.content_type, e
                ))
            })?;
        form = form.part(FIELD_IMAGE, part);
    }
    Ok(form)
}

/// Pulls a human readable message out of an error body (`{"message": ..}`,
/// `{"error": ..}` or plain text).
fn error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = json.get(key).and_then(|v| v.as_str()) {
                return Some(msg.to_string());
            }
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or(path);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Transport(format!("{}: {}", status, message)),
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list_blogs(&self, auth: &BearerToken) -> Result<Vec<Blog>> {
        let wire: Vec<WireBlog> = self.fetch_json(self.routes.blogs(), auth).await?;
        Ok(wire.into_iter().map(Into::into).collect())
    }

    async fn create_blog(&self, auth: &BearerToken, blog: &NewBlog) -> Result<Option<Blog>> {
        let url = self.routes.blogs();
        debug!("POST {} (multipart)", url);
        let form = blog_form(&blog.title, &blog.body, blog.image.as_ref())?;
        let response = self
            .execute(self.client.post(url).multipart(form), auth)
            .await?;

        // 已经创建成功，响应体解析失败不能再当成错误
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Create response body unreadable: {}", e);
                return Ok(None);
            }
        };
        match serde_json::from_slice::<CreatedBlog>(&body) {
            Ok(created) => Ok(Some(created.into_blog())),
            Err(e) => {
                debug!("Create response carries no blog record: {}", e);
                Ok(None)
            }
        }
    }

    async fn update_blog(&self, auth: &BearerToken, id: &BlogId, patch: &BlogPatch) -> Result<()> {
        let url = self.routes.blog(id);
        debug!("PUT {} (multipart)", url);
        let form = blog_form(&patch.title, &patch.body, patch.image.as_ref())?;
        self.execute(self.client.put(url).multipart(form), auth)
            .await?;
        Ok(())
    }

    async fn delete_blog(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        self.delete(self.routes.blog(id), auth).await
    }

    async fn toggle_blog_like(&self, auth: &BearerToken, id: &BlogId) -> Result<()> {
        self.post_empty(self.routes.blog_like(id), auth).await
    }

    async fn list_comments(&self, auth: &BearerToken, blog: &BlogId) -> Result<Thread> {
        let wire: Vec<WireComment> = self.fetch_json(self.routes.comments(blog), auth).await?;
        Ok(thread_from_wire(blog.clone(), wire))
    }

    async fn add_comment(&self, auth: &BearerToken, blog: &BlogId, body: &CommentBody) -> Result<()> {
        self.post_content(self.routes.comments(blog), auth, body)
            .await
    }

    async fn add_reply(
        &self,
        auth: &BearerToken,
        blog: &BlogId,
        comment: &CommentId,
        body: &CommentBody,
    ) -> Result<()> {
        self.post_content(self.routes.replies(blog, comment), auth, body)
            .await
    }

    async fn delete_node(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        self.delete(self.routes.node(blog, node), auth).await
    }

    async fn toggle_node_like(&self, auth: &BearerToken, blog: &BlogId, node: &NodeId) -> Result<()> {
        self.post_empty(self.routes.node_like(blog, node), auth)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message":"Blog not found"}"#).as_deref(),
            Some("Blog not found")
        );
        assert_eq!(error_message(r#"{"error":"jwt expired"}"#).as_deref(), Some("jwt expired"));
        assert_eq!(error_message("Forbidden").as_deref(), Some("Forbidden"));
        assert_eq!(error_message(r#"{"status":500}"#), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn rejects_malformed_image_content_type() {
        let image = ImageUpload::new("a.png", "not a mime type", vec![0]);
        assert!(matches!(
            blog_form("t", "b", Some(&image)),
            Err(ClientError::Validation(_))
        ));
    }
}
