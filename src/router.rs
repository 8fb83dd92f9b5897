use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::ApiConfig;
use crate::handlers::public;
use crate::middleware::api_key_middleware;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState, api: &ApiConfig) -> Router {
    // Protected first so shared paths keep the public method fallback
    let router = Router::new()
        .merge(protected_routes(state.clone()))
        .merge(public_routes())
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(api.request_timeout_secs)))
        .layer(CatchPanicLayer::new());

    let router = if api.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    // One INFO line per completed request
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health))
        .route("/products", get(public::products::list))
        .route("/products/:id", get(public::products::get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::put;
    use crate::handlers::protected::products;

    Router::new()
        .route("/products", post(products::create))
        .route("/products/:id", put(products::update).delete(products::delete))
        .route_layer(middleware::from_fn_with_state(state, api_key_middleware))
}
