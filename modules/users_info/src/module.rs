use async_trait::async_trait;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::api::rest::routes;
use crate::domain::service::Service;
use crate::infra::storage::InMemoryUsersRepository;

/// Users info module: owns the user store and exposes the CRUD routes.
#[derive(Default)]
pub struct UsersInfo {
    service: ArcSwapOption<Service>,
}

impl UsersInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The domain service, available once `init` ran.
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.load_full()
    }
}

#[async_trait]
impl modkit::Module for UsersInfo {
    async fn init(&self, _ctx: &modkit::ModuleCtx) -> anyhow::Result<()> {
        // Fresh, empty store per process
        let repo = Arc::new(InMemoryUsersRepository::new());
        self.service.store(Some(Arc::new(Service::new(repo))));
        tracing::info!(module = "users_info", "in-memory user store ready");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl modkit::RestfulModule for UsersInfo {
    fn register_rest(
        &self,
        _ctx: &modkit::ModuleCtx,
        router: axum::Router,
    ) -> anyhow::Result<axum::Router> {
        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("users_info: service not initialized"))?;
        routes::register_routes(router, service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modkit::{Module, ModuleCtxBuilder, RestfulModule};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn register_rest_requires_init() {
        let module = UsersInfo::new();
        let ctx = ModuleCtxBuilder::new(CancellationToken::new())
            .build()
            .for_module("users_info");

        assert!(module.register_rest(&ctx, axum::Router::new()).is_err());

        module.init(&ctx).await.unwrap();
        assert!(module.service().is_some());
        assert!(module.register_rest(&ctx, axum::Router::new()).is_ok());
    }
}
