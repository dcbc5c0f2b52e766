//! # brisk-app
//!
//! Start-up plumbing for a brisk service: TOML configuration, a `tracing`
//! subscriber, the SQLite pool used by `brisk-orm`, and an in-process cache,
//! bundled into one [`AppContext`] that is built once and shared by `Arc`.

pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;

pub use cache::Cache;
pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, Result};
pub use logging::Logger;
