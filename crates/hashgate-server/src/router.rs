use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, BoxError, Router};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::error::ServerError;
use crate::handler;
use crate::state::AppState;

/// Endpoint paths.
pub mod endpoints {
    pub const HOME: &str = "/";
    pub const GET_OBJECT: &str = "/get-object/:file_id";
    pub const POST_OBJECT: &str = "/post-object";
}

/// Build the axum router with all hashgate endpoints.
///
/// Everything except the liveness route sits behind the shared-secret gate,
/// which runs before any extractor touches the request. Upload bodies are
/// not size-limited.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/get-object", get(handler::get_object_without_id))
        .route("/get-object/", get(handler::get_object_without_id))
        .route(endpoints::GET_OBJECT, get(handler::get_object))
        .route(endpoints::POST_OBJECT, post(handler::post_object))
        .layer(DefaultBodyLimit::disable())
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            auth::require_secret,
        ));

    Router::new()
        .route(endpoints::HOME, get(handler::home))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Cap in-flight requests and bound how long any single one may take.
pub fn with_limits(router: Router, max_concurrent: usize, timeout: Duration) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(timeout_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent))
}

async fn timeout_error(err: BoxError) -> ServerError {
    if err.is::<Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(err.to_string())
    }
}
