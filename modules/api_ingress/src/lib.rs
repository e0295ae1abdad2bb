use async_trait::async_trait;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, routing::any, Extension, Router};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
pub mod uploads;
pub mod web;

pub use config::ApiIngressConfig;

/// Main API Ingress module: owns the HTTP server (rest_host), serves the
/// demo endpoints and static files, and applies the global middleware stack.
pub struct ApiIngress {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiIngressConfig>,
    // Finalized router from the REST phase, taken by `start`
    final_router: Mutex<Option<Router>>,
    server: Mutex<Option<JoinHandle<Result<()>>>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            final_router: Mutex::new(None),
            server: Mutex::new(None),
            local_addr: Mutex::new(None),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Host-owned routes: demo endpoints, uploads and `/static`.
    pub fn base_routes(&self, router: Router) -> Router {
        let cfg = self.get_config();
        let upload_dir = uploads::UploadDir(Arc::new(PathBuf::from(&cfg.uploads_dir)));

        let upload_routes = Router::new()
            .route("/uploads", any(uploads::upload_file))
            .layer(Extension(upload_dir));

        router
            .route("/", any(web::index))
            .route("/bar", any(web::bar))
            .merge(upload_routes)
            .nest_service("/static", ServeDir::new(&cfg.static_dir))
    }

    /// Wrap `router` with the global middleware stack.
    ///
    /// Layers are added innermost first, so the request passes:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
    /// -> Timeout -> CORS -> BodyLimit -> handler
    pub fn apply_middleware(&self, mut router: Router) -> Router {
        let cfg = self.get_config();
        let x_request_id = request_id::header();

        router = router
            .layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes))
            .layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

        if cfg.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(cfg.request_timeout_secs)))
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind the listener and serve `router` until `cancel` fires.
    async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", cfg.bind_addr))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let bound = listener.local_addr()?;
        *self.local_addr.lock() = Some(bound);
        tracing::info!("HTTP server bound on {}", bound);

        // Graceful shutdown on cancel
        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        });
        *self.server.lock() = Some(handle);
        Ok(())
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> anyhow::Result<()> {
        let cfg = ctx.module_config::<ApiIngressConfig>();
        tracing::debug!(module = "api_ingress", bind_addr = %cfg.bind_addr, "Module initialized");
        self.config.store(Arc::new(cfg));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

// REST host role: prepare/finalize the router, but do not start the server here.
impl modkit::RestHostModule for ApiIngress {
    fn rest_prepare(
        &self,
        _ctx: &modkit::ModuleCtx,
        router: axum::Router,
    ) -> anyhow::Result<axum::Router> {
        let router = self.base_routes(router);
        tracing::debug!("REST host prepared base router");
        Ok(router)
    }

    fn rest_finalize(
        &self,
        _ctx: &modkit::ModuleCtx,
        router: axum::Router,
    ) -> anyhow::Result<axum::Router> {
        let router = self.apply_middleware(router);

        // Keep the finalized router to be used by `start()`
        *self.final_router.lock() = Some(router.clone());

        tracing::debug!("REST host finalized router");
        Ok(router)
    }
}

#[async_trait]
impl modkit::StatefulModule for ApiIngress {
    async fn start(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        // Take the finalized router so the MutexGuard is dropped before awaits
        let stored = { self.final_router.lock().take() };
        let router = match stored {
            Some(r) => r,
            None => {
                tracing::debug!("No router from REST phase, serving host routes only");
                self.apply_middleware(self.base_routes(Router::new()))
            }
        };
        self.serve(router, cancel).await
    }

    async fn stop(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        cancel.cancel();
        let handle = { self.server.lock().take() };
        let Some(handle) = handle else {
            return Ok(());
        };

        match tokio::time::timeout(Duration::from_secs(30), handle).await {
            Ok(joined) => {
                joined.context("HTTP server task panicked")??;
                tracing::info!("HTTP server stopped");
            }
            Err(_) => tracing::warn!("HTTP server did not stop within 30s"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit::{Module, ModuleCtxBuilder};
    use std::collections::HashMap;

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl modkit::ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    #[tokio::test]
    async fn init_loads_module_section() {
        let mut map = HashMap::new();
        map.insert(
            "api_ingress".to_string(),
            serde_json::json!({ "bind_addr": "127.0.0.1:0", "cors_enabled": true }),
        );
        let ctx = ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(MapProvider(map)))
            .build()
            .for_module("api_ingress");

        let ingress = ApiIngress::default();
        ingress.init(&ctx).await.unwrap();

        let cfg = ingress.get_config();
        assert_eq!(cfg.bind_addr, "127.0.0.1:0");
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.uploads_dir, "uploads");
    }
}
