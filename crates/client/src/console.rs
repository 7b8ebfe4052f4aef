//! Line commands driving a [`Dashboard`] from a terminal, plus plain-text
//! renderings of its snapshots.

use domain::{Blog, BlogId, ClientError, CommentId, ImageUpload, NodeId, Result, Thread};
use std::path::Path;

use crate::dashboard::Dashboard;
use crate::workflow::FormState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Open(BlogId),
    Close,
    New { title: String, body: String },
    Edit(BlogId),
    Title(String),
    Body(String),
    Image(String),
    Save,
    Cancel,
    Delete(BlogId),
    Yes,
    No,
    Like(BlogId),
    Comment(String),
    Reply { comment_id: CommentId, content: String },
    LikeNode(String),
    RemoveNode(String),
    Thread,
    Help,
    Quit,
}

fn required<'a>(command: &str, arg: &'a str) -> std::result::Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("usage: {} <arg>", command))
    } else {
        Ok(arg)
    }
}

impl ConsoleCommand {
    /// Parses one input line. Free text arguments are passed through as typed;
    /// emptiness is judged by the repositories, not here.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let cmd = match head {
            "list" | "ls" => Self::List,
            "open" => Self::Open(BlogId::new(required(head, rest)?)),
            "close" => Self::Close,
            "new" => {
                let (title, body) = rest.split_once('|').unwrap_or((rest, ""));
                Self::New {
                    title: title.trim().to_string(),
                    body: body.trim().to_string(),
                }
            }
            "edit" => Self::Edit(BlogId::new(required(head, rest)?)),
            "title" => Self::Title(rest.to_string()),
            "body" => Self::Body(rest.to_string()),
            "image" => Self::Image(required(head, rest)?.to_string()),
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "delete" | "rm" => Self::Delete(BlogId::new(required(head, rest)?)),
            "yes" | "y" => Self::Yes,
            "no" | "n" => Self::No,
            "like" => Self::Like(BlogId::new(required(head, rest)?)),
            "comment" => Self::Comment(rest.to_string()),
            "reply" => {
                let (id, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Reply {
                    comment_id: CommentId::new(required(head, id)?),
                    content: content.trim().to_string(),
                }
            }
            "like-node" => Self::LikeNode(required(head, rest)?.to_string()),
            "rm-node" => Self::RemoveNode(required(head, rest)?.to_string()),
            "thread" => Self::Thread,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command: {}", other)),
        };
        Ok(cmd)
    }
}

pub const HELP: &str = "\
list | open <id> | close | new <title> | <body> | edit <id>
title <text> | body <text> | image <path> | save | cancel
delete <id> | yes | no | like <id>
comment <text> | reply <commentId> <text> | like-node <id> | rm-node <id> | thread
quit";

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_image(path: &str) -> Result<ImageUpload> {
    let path = Path::new(path);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::Validation(format!("cannot read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageUpload::new(file_name, content_type_for(path), bytes))
}

/// Resolves a raw node id against the open thread.
fn node_in(thread: &Thread, raw: &str) -> Result<NodeId> {
    thread
        .find(raw)
        .ok_or_else(|| ClientError::NotFound(format!("comment {}", raw)))
}

/// Runs `cmd` and returns the lines to print.
pub async fn execute(
    dashboard: &mut Dashboard,
    cmd: ConsoleCommand,
    media_base: &str,
) -> Result<Vec<String>> {
    let user = dashboard.session().user_id().clone();

    match cmd {
        ConsoleCommand::List => {
            let blogs = dashboard.refresh().await?;
            Ok(render_blogs(&blogs, &user, media_base))
        }
        ConsoleCommand::Open(id) => {
            let manager = dashboard.open_blog(&id).await?;
            let mut out = dashboard
                .repo()
                .get(&id)
                .map(|b| render_blog(&b, &user, media_base))
                .unwrap_or_default();
            out.extend(render_thread(&manager.thread(), &user));
            Ok(out)
        }
        ConsoleCommand::Close => {
            dashboard.close_blog();
            Ok(vec![])
        }
        ConsoleCommand::New { title, body } => {
            dashboard.start_create();
            if !title.is_empty() {
                dashboard.form_mut().set_title(title);
            }
            if !body.is_empty() {
                dashboard.form_mut().set_body(body);
            }
            Ok(render_form(dashboard.form().state()))
        }
        ConsoleCommand::Edit(id) => {
            dashboard.start_edit(&id)?;
            Ok(render_form(dashboard.form().state()))
        }
        ConsoleCommand::Title(text) => {
            dashboard.form_mut().set_title(text);
            Ok(render_form(dashboard.form().state()))
        }
        ConsoleCommand::Body(text) => {
            dashboard.form_mut().set_body(text);
            Ok(render_form(dashboard.form().state()))
        }
        ConsoleCommand::Image(path) => {
            let upload = read_image(&path).await?;
            dashboard.form_mut().attach_image(upload);
            Ok(render_form(dashboard.form().state()))
        }
        ConsoleCommand::Save => {
            dashboard.submit_form().await?;
            Ok(render_blogs(&dashboard.repo().blogs(), &user, media_base))
        }
        ConsoleCommand::Cancel => {
            dashboard.cancel_form();
            dashboard.cancel_delete();
            dashboard.cancel_node_delete();
            Ok(vec![])
        }
        ConsoleCommand::Delete(id) => {
            dashboard.request_delete(id);
            Ok(dashboard
                .blog_gate()
                .prompt()
                .map(|p| format!("{} [yes/no]", p))
                .into_iter()
                .collect())
        }
        ConsoleCommand::Yes => {
            // 评论删除优先，其次才是博客删除
            if dashboard.node_gate().is_pending() {
                dashboard.confirm_node_delete().await?;
                let manager = dashboard.open_detail()?;
                return Ok(render_thread(&manager.thread(), &user));
            }
            match dashboard.confirm_delete().await? {
                Some(id) => {
                    let mut out = vec![format!("deleted {}", id)];
                    out.extend(render_blogs(&dashboard.repo().blogs(), &user, media_base));
                    Ok(out)
                }
                None => Ok(vec!["nothing to confirm".to_string()]),
            }
        }
        ConsoleCommand::No => {
            dashboard.cancel_node_delete();
            dashboard.cancel_delete();
            Ok(vec![])
        }
        ConsoleCommand::Like(id) => {
            dashboard.toggle_like(&id).await?;
            Ok(render_blogs(&dashboard.repo().blogs(), &user, media_base))
        }
        ConsoleCommand::Comment(text) => {
            let manager = dashboard.open_detail()?;
            manager.add_comment(&text).await?;
            Ok(render_thread(&manager.thread(), &user))
        }
        ConsoleCommand::Reply {
            comment_id,
            content,
        } => {
            let manager = dashboard.open_detail()?;
            manager.begin_reply(&comment_id)?;
            manager.submit_reply(&content).await?;
            Ok(render_thread(&manager.thread(), &user))
        }
        ConsoleCommand::LikeNode(raw) => {
            let manager = dashboard.open_detail()?;
            let node = node_in(&manager.thread(), &raw)?;
            manager.toggle_like(&node, &user).await?;
            Ok(render_thread(&manager.thread(), &user))
        }
        ConsoleCommand::RemoveNode(raw) => {
            let manager = dashboard.open_detail()?;
            let node = node_in(&manager.thread(), &raw)?;
            dashboard.request_node_delete(node)?;
            Ok(dashboard
                .node_gate()
                .prompt()
                .map(|p| format!("{} [yes/no]", p))
                .into_iter()
                .collect())
        }
        ConsoleCommand::Thread => {
            let manager = dashboard.open_detail()?;
            manager.load_thread().await?;
            Ok(render_thread(&manager.thread(), &user))
        }
        ConsoleCommand::Help => Ok(HELP.lines().map(str::to_string).collect()),
        ConsoleCommand::Quit => Ok(vec![]),
    }
}

fn like_marker(count: usize, liked: bool) -> String {
    if liked {
        format!("♥ {}", count)
    } else {
        format!("♡ {}", count)
    }
}

pub fn render_blog(blog: &Blog, viewer: &domain::UserId, media_base: &str) -> Vec<String> {
    let mut out = vec![
        format!(
            "[{}] {}  {}",
            blog.id,
            blog.title,
            like_marker(blog.like_count(), blog.is_liked_by(viewer))
        ),
        format!(
            "    by {} on {}",
            blog.author.display_name(),
            blog.created_at.format("%Y-%m-%d %H:%M")
        ),
        format!("    {}", blog.body),
    ];
    if let Some(url) = blog.image_url(media_base) {
        out.push(format!("    image: {}", url));
    }
    out
}

pub fn render_blogs(blogs: &[Blog], viewer: &domain::UserId, media_base: &str) -> Vec<String> {
    if blogs.is_empty() {
        return vec!["(no blogs)".to_string()];
    }
    blogs
        .iter()
        .flat_map(|b| render_blog(b, viewer, media_base))
        .collect()
}

pub fn render_thread(thread: &Thread, viewer: &domain::UserId) -> Vec<String> {
    if thread.is_empty() {
        return vec!["(no comments)".to_string()];
    }
    let mut out = Vec::with_capacity(thread.node_count());
    for comment in &thread.comments {
        out.push(format!(
            "- [{}] {}: {}  {}",
            comment.id,
            comment.author.display_name(),
            comment.content,
            like_marker(comment.likes.count(), comment.is_liked_by(viewer))
        ));
        for reply in &comment.replies {
            out.push(format!(
                "    - [{}] {}: {}  {}",
                reply.id,
                reply.author.display_name(),
                reply.content,
                like_marker(reply.likes.count(), reply.is_liked_by(viewer))
            ));
        }
    }
    out
}

pub fn render_form(state: &FormState) -> Vec<String> {
    let heading = match state {
        FormState::Closed => return vec!["(form closed)".to_string()],
        FormState::Creating { .. } => "new blog".to_string(),
        FormState::Editing { blog_id, .. } => format!("editing {}", blog_id),
    };
    let Some(draft) = state.draft() else {
        return vec![heading];
    };
    let image = match &draft.image {
        None => "none".to_string(),
        Some(domain::ImageInput::Keep(reference)) => format!("keep {}", reference),
        Some(domain::ImageInput::Upload(upload)) => format!("upload {}", upload.file_name),
    };
    vec![
        format!("{}:", heading),
        format!("  title: {}", draft.title),
        format!("  body:  {}", draft.body),
        format!("  image: {}", image),
    ]
}
