use axum::Json;
use axum::extract::{Path, State};

use crate::dto::SecuritySchemaResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn session_user_security_schema_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<SecuritySchemaResponse>> {
    security_schema(&state, None).await
}

pub async fn user_security_schema_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<SecuritySchemaResponse>> {
    security_schema(&state, Some(user_id)).await
}

async fn security_schema(
    state: &AppState,
    user_id: Option<String>,
) -> ApiResult<Json<SecuritySchemaResponse>> {
    let schema = state
        .security_schema_service
        .security_schema(user_id)
        .await?;

    Ok(Json(SecuritySchemaResponse::from(schema)))
}
