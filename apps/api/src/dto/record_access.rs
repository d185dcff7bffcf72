use std::collections::BTreeMap;

use permscope_application::RecordAccessReport;
use permscope_domain::RecordAccessResult;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a record access check.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-access-request.ts"
)]
pub struct RecordAccessRequest {
    pub record_ids: Vec<String>,
}

/// Per-record access of one user.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-access-response.ts"
)]
pub struct RecordAccessResponse {
    pub user_id: String,
    pub username: String,
    pub timestamp: String,
    pub results: BTreeMap<String, RecordAccessResultResponse>,
}

/// Access letters and level for one record.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-access-result-response.ts"
)]
pub struct RecordAccessResultResponse {
    pub object_type_prefix: String,
    pub permissions: Vec<String>,
    pub max_access_level: String,
}

impl RecordAccessResponse {
    pub fn from_report(report: RecordAccessReport, timestamp: String) -> Self {
        Self {
            user_id: report.user_id,
            username: report.username,
            timestamp,
            results: report
                .results
                .into_iter()
                .map(|(record_id, result)| (record_id, RecordAccessResultResponse::from(result)))
                .collect(),
        }
    }
}

impl From<RecordAccessResult> for RecordAccessResultResponse {
    fn from(value: RecordAccessResult) -> Self {
        Self {
            object_type_prefix: value.object_type_prefix,
            permissions: value
                .permissions
                .iter()
                .map(|access| access.letter().to_owned())
                .collect(),
            max_access_level: value.max_access_level,
        }
    }
}
