use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;


pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/security-schema",
            get(handlers::security_schema::session_user_security_schema_handler),
        )
        .route(
            "/security-schema/{user_id}",
            get(handlers::security_schema::user_security_schema_handler),
        )
        .route(
            "/record-access",
            post(handlers::record_access::session_user_record_access_handler),
        )
        .route(
            "/record-access/{user_id}",
            post(handlers::record_access::user_record_access_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer())
        .with_state(app_state)
}
