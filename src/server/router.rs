use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::Router;

use super::{archives, channels, namespaces, resources, versions};
use crate::store::Registry;

pub struct AppState {
    pub registry: Arc<dyn Registry>,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/namespaces", post(namespaces::create_namespace))
        .route("/namespaces", get(namespaces::list_namespaces))
        .route("/namespaces/{ns}", get(namespaces::read_namespace))
        .route("/namespaces/{ns}", put(namespaces::update_namespace))
        .route("/namespaces/{ns}", delete(namespaces::delete_namespace))
        .route(
            "/namespaces/{ns}/resources",
            post(resources::create_resource),
        )
        .route("/namespaces/{ns}/resources", get(resources::list_resources))
        .route(
            "/namespaces/{ns}/resources/{res}",
            get(resources::read_resource),
        )
        .route(
            "/namespaces/{ns}/resources/{res}",
            put(resources::update_resource),
        )
        .route(
            "/namespaces/{ns}/resources/{res}",
            delete(resources::delete_resource),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions",
            post(versions::create_version),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions",
            get(versions::list_versions),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions/{ver}",
            get(versions::read_version),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions/{ver}",
            put(versions::update_version),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions/{ver}",
            delete(versions::delete_version),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions/{ver}/archive",
            put(archives::upload_archive),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/versions/{ver}/archive",
            get(archives::download_archive),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/channels",
            post(channels::create_channel),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/channels",
            get(channels::list_channels),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/channels/{ch}",
            get(channels::read_channel),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/channels/{ch}",
            put(channels::update_channel),
        )
        .route(
            "/namespaces/{ns}/resources/{res}/channels/{ch}",
            delete(channels::delete_channel),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
