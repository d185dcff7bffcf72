//! Permscope API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use permscope_application::{CrmSessionProvider, RecordAccessService, SecuritySchemaService};
use permscope_core::AppError;
use permscope_infrastructure::{SalesforceSessionProvider, TracingAggregationObserver};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.crm_http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        login_url = %config.salesforce.login_url,
        api_version = %config.salesforce.api_version,
        empty_permission_policy = ?config.empty_permission_policy,
        "configured salesforce session provider"
    );

    let session_provider: Arc<dyn CrmSessionProvider> = Arc::new(SalesforceSessionProvider::new(
        http_client,
        config.salesforce.clone(),
    ));

    let app_state = AppState {
        security_schema_service: SecuritySchemaService::new(
            session_provider.clone(),
            config.empty_permission_policy,
        )
        .with_observer(Arc::new(TracingAggregationObserver)),
        record_access_service: RecordAccessService::new(session_provider),
    };

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "permscope-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
