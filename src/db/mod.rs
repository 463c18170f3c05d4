//! Database connectivity.

mod pool;

pub use pool::{AsyncDbPool, establish_async_connection_pool};
