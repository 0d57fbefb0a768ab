use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use mediadb_catalog::CategoryService;
use mediadb_storage::DynCategorySource;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::{handlers, middleware as app_middleware};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: CategoryService,
}

impl AppState {
    pub fn new(service: CategoryService) -> Self {
        Self { service }
    }
}

pub struct MediadbServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Category endpoints
        .route(
            "/v1/domains/{domain}/categories",
            get(handlers::list_categories),
        )
        .route(
            "/v1/domains/{domain}/subcategories/{subcategory_id}",
            get(handlers::subcategory_exists),
        )
        .route(
            "/v1/domains/{domain}/subcategory-check",
            get(handlers::subcategory_check),
        )
        // Cache administration
        .route(
            "/v1/admin/subcategory-cache/invalidate",
            post(handlers::invalidate_cache),
        )
        .route(
            "/v1/admin/subcategory-cache/stats",
            get(handlers::cache_stats),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        // Middleware stack, innermost first; request id wraps trace so spans see it
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

/// Opens the row source selected by `storage.backend`.
pub async fn create_category_source(cfg: &StorageConfig) -> anyhow::Result<DynCategorySource> {
    match cfg.backend {
        StorageBackend::Memory => match cfg.memory.seed_path.as_deref() {
            Some(path) => {
                let store: DynCategorySource =
                    Arc::new(mediadb_db_memory::load_seed_file(path)?);
                Ok(store)
            }
            None => {
                tracing::warn!("Memory backend started without a seed file; every domain is empty");
                Ok(mediadb_db_memory::create_category_source())
            }
        },
        StorageBackend::Postgres => {
            let pg = cfg.postgres.as_ref().ok_or_else(|| {
                anyhow::anyhow!("storage.postgres config is required for the postgres backend")
            })?;
            let store: DynCategorySource =
                mediadb_db_postgres::create_category_source(pg.to_postgres_config()).await?;
            Ok(store)
        }
    }
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    source: Option<DynCategorySource>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            source: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses `source` instead of opening the configured backend.
    pub fn with_source(mut self, source: DynCategorySource) -> Self {
        self.source = Some(source);
        self
    }

    pub async fn build(self) -> anyhow::Result<MediadbServer> {
        let source = match self.source {
            Some(source) => source,
            None => create_category_source(&self.config.storage).await?,
        };
        let service = CategoryService::with_settings(source, self.config.catalog.settings());
        tracing::info!(
            backend = service.backend_name(),
            ttl_secs = self.config.catalog.subcategory_ttl_secs,
            name_policy = ?self.config.catalog.name_policy,
            "Category service ready"
        );
        let app = build_app(AppState::new(service), &self.config);

        Ok(MediadbServer {
            addr: self.addr,
            app,
        })
    }
}

impl MediadbServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
