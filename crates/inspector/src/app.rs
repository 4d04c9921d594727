// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{Router, middleware, routing::get};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{
    logging::http_logger_middleware,
    metrics::metrics_middleware,
    routes::{self, RegisterRoute},
    state::AppState,
};

/// Build the HTTP router with every route registered in `state.route_registry`.
pub fn create_app(state: AppState) -> Router {
    let registry = &state.route_registry;

    let v1 = Router::new()
        .merge(routes::health::routes(registry))
        .merge(routes::version::routes(registry))
        .merge(routes::decode::routes(registry))
        .merge(routes::schemas::routes(registry));

    let mut router = Router::new()
        .route_registered(registry, "", "/", "get", get(routes::root::root_handler))
        .nest(routes::API_VERSION, v1);

    if state.config.metrics.enabled {
        router = router
            .merge(routes::metrics::routes(registry))
            .layer(middleware::from_fn(metrics_middleware));
    }

    router
        .layer(middleware::from_fn(http_logger_middleware))
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
