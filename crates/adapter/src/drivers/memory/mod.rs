mod driver;
mod store;

pub use driver::MemoryTransport;
