use serde::Serialize;
use ts_rs::TS;

mod record_access;
mod security_schema;

pub use record_access::{RecordAccessRequest, RecordAccessResponse};
pub use security_schema::SecuritySchemaResponse;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
