use axum::{
    routing::{any, get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(mut router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    router = router
        .route("/users", get(handlers::list_users))
        .route(
            "/user",
            post(handlers::create_user).put(handlers::update_user),
        )
        .route(
            "/user/{id}",
            get(handlers::get_user)
                .delete(handlers::delete_user)
                .fallback(handlers::user_id_other_method),
        )
        .route("/foo", any(handlers::echo_user));

    router = router.layer(Extension(service));

    Ok(router)
}
