mod driver;
mod routes;

pub use driver::{HttpConfig, HttpTransport};
