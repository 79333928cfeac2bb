pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod metrics;
pub mod models;

pub use api::{create_router, AppState};
pub use config::{AppConfig, IndexSettings, ServerConfig};
pub use error::{Result, SymdexError};
pub use format::TableFormat;
pub use index::{IndexHandle, SymbolIndex, TableSource};
pub use metrics::SearchMetrics;
pub use models::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
