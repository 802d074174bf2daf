//! client-core: Shared infrastructure for the invoicing desktop client.
pub mod backend;
pub mod config;
pub mod error;
pub mod observability;
pub mod settings;

pub use async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use validator;
