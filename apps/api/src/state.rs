use permscope_application::{RecordAccessService, SecuritySchemaService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub security_schema_service: SecuritySchemaService,
    pub record_access_service: RecordAccessService,
}
