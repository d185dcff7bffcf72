use axum::http::Method;
use axum::http::header::{ACCEPT, CONTENT_TYPE, HeaderName, ORIGIN};
use tower_http::cors::{Any, CorsLayer};

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub(super) fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ORIGIN, X_REQUESTED_WITH, CONTENT_TYPE, ACCEPT])
}
