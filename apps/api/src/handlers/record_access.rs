use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::{SecondsFormat, Utc};

use crate::dto::{RecordAccessRequest, RecordAccessResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn session_user_record_access_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecordAccessRequest>, JsonRejection>,
) -> ApiResult<Json<RecordAccessResponse>> {
    let Json(payload) = payload?;
    record_access(&state, None, payload).await
}

pub async fn user_record_access_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<RecordAccessRequest>, JsonRejection>,
) -> ApiResult<Json<RecordAccessResponse>> {
    let Json(payload) = payload?;
    record_access(&state, Some(user_id), payload).await
}

async fn record_access(
    state: &AppState,
    user_id: Option<String>,
    payload: RecordAccessRequest,
) -> ApiResult<Json<RecordAccessResponse>> {
    let report = state
        .record_access_service
        .check_access(user_id, payload.record_ids)
        .await?;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    Ok(Json(RecordAccessResponse::from_report(report, timestamp)))
}
