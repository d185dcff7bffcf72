use permscope_core::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// Decodes a successful JSON response or turns the failure into an upstream error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        return Err(AppError::Upstream(format!(
            "salesforce {operation} failed with status {status}: {body}"
        )));
    }

    response.json::<T>().await.map_err(|error| {
        AppError::Upstream(format!(
            "salesforce {operation} returned an unreadable body: {error}"
        ))
    })
}

pub(crate) fn transport_error(operation: &str, error: reqwest::Error) -> AppError {
    AppError::Upstream(format!("salesforce {operation} transport error: {error}"))
}
