use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use adapter::{MemoryTransport, Transport, TransportConfig};
use client::config::{Settings, TransportMode};
use client::console::{self, ConsoleCommand};
use client::Dashboard;
use domain::NewBlog;

// 离线模式下的会话凭证
const MEMORY_TOKEN: &str = "memory-session";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::new().context("Failed to load configuration")?;
    let mut session = settings.session();

    let transport: Arc<dyn Transport> = match settings.transport.mode {
        TransportMode::Http => adapter::connect(TransportConfig::Http(settings.http_config()))?,
        TransportMode::Memory => {
            let memory = MemoryTransport::new();
            let token = settings
                .session
                .token
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| MEMORY_TOKEN.to_string());
            memory.register(token.clone(), session.user().clone());
            seed(&memory, session.user())?;
            session = adapter::Session::new(session.user().clone(), Some(token));
            adapter::connect(TransportConfig::Memory(memory))?
        }
    };

    if !session.is_authenticated() {
        warn!("No session token configured; every request will be refused");
    }
    info!("Signed in as {}", session.user().display_name());

    let mut dashboard = Dashboard::new(transport, session);
    let media_base = settings.api.media_base_url.clone();

    match dashboard.refresh().await {
        Ok(blogs) => print_lines(&console::render_blogs(
            &blogs,
            dashboard.session().user_id(),
            &media_base,
        )),
        Err(e) => error!("Initial blog list failed: {}", e),
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line.context("Failed to read stdin")?,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd = match ConsoleCommand::parse(&line) {
            Ok(ConsoleCommand::Quit) => break,
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{} (try `help`)", e);
                continue;
            }
        };

        match console::execute(&mut dashboard, cmd, &media_base).await {
            Ok(out) => print_lines(&out),
            Err(e) => println!("error: {}", e),
        }
    }

    info!("Bye");
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn seed(memory: &MemoryTransport, user: &domain::User) -> anyhow::Result<()> {
    let welcome = NewBlog::new(
        "Welcome to BlogSpace",
        "This store lives in memory. Try `comment`, `like` or `new`.",
        None,
    )
    .context("Invalid seed blog")?;
    let blog = memory.seed_blog(user.clone(), &welcome);
    info!("Seeded offline store with {}", blog.id);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
