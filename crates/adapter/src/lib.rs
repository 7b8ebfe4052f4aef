mod drivers;
mod session;
mod traits;

pub use drivers::http::{HttpConfig, HttpTransport};
pub use drivers::memory::MemoryTransport;
pub use session::{BearerToken, Session};
pub use traits::Transport;

use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub enum TransportConfig {
    Http(HttpConfig),
    /// In-process store, used for offline runs and tests.
    Memory(MemoryTransport),
}

pub fn connect(config: TransportConfig) -> anyhow::Result<Arc<dyn Transport>> {
    let transport: Arc<dyn Transport> = match config {
        TransportConfig::Http(http) => {
            info!("Initializing transport in HTTP mode ({})...", http.base_url);
            Arc::new(HttpTransport::new(&http)?)
        }
        TransportConfig::Memory(memory) => {
            info!("Initializing transport in MEMORY mode...");
            Arc::new(memory)
        }
    };
    Ok(transport)
}
