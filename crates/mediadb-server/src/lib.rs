pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{
    AppConfig, CatalogConfig, LoggingConfig, PostgresStorageConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use observability::init_tracing;
pub use server::{AppState, MediadbServer, ServerBuilder, build_app, create_category_source};
