use async_trait::async_trait;
use permscope_application::CrmSession;
use permscope_core::{AppError, AppResult, CrmIdentity};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::salesforce_http::{read_json, transport_error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPage {
    #[serde(default)]
    records: Vec<Value>,
    #[serde(default)]
    next_records_url: Option<String>,
}

/// Authenticated Salesforce REST session bound to one instance.
pub(crate) struct SalesforceSession {
    http_client: reqwest::Client,
    instance_url: Url,
    api_version: String,
    access_token: String,
    identity: CrmIdentity,
}

impl SalesforceSession {
    pub(crate) fn new(
        http_client: reqwest::Client,
        instance_url: Url,
        api_version: String,
        access_token: String,
        identity: CrmIdentity,
    ) -> Self {
        Self {
            http_client,
            instance_url,
            api_version,
            access_token,
            identity,
        }
    }

    fn query_url(&self) -> AppResult<Url> {
        self.instance_url
            .join(format!("/services/data/v{}/query", self.api_version).as_str())
            .map_err(|error| AppError::Internal(format!("invalid query url: {error}")))
    }

    fn next_page_url(&self, next_records_url: &str) -> AppResult<Url> {
        self.instance_url.join(next_records_url).map_err(|error| {
            AppError::Upstream(format!(
                "salesforce returned an invalid nextRecordsUrl '{next_records_url}': {error}"
            ))
        })
    }

    async fn fetch_page(&self, request: reqwest::RequestBuilder) -> AppResult<QueryPage> {
        let response = request
            .bearer_auth(self.access_token.as_str())
            .send()
            .await
            .map_err(|error| transport_error("query", error))?;

        read_json(response, "query").await
    }
}

#[async_trait]
impl CrmSession for SalesforceSession {
    fn identity(&self) -> &CrmIdentity {
        &self.identity
    }

    async fn query(&self, soql: &str) -> AppResult<Vec<Value>> {
        let first = self
            .http_client
            .get(self.query_url()?)
            .query(&[("q", soql)]);
        let mut page = self.fetch_page(first).await?;
        let mut records = std::mem::take(&mut page.records);
        let mut pages = 1_usize;

        while let Some(next_records_url) = page.next_records_url.take() {
            let next = self.http_client.get(self.next_page_url(&next_records_url)?);
            page = self.fetch_page(next).await?;
            records.append(&mut page.records);
            pages += 1;
        }

        debug!(pages, rows = records.len(), "salesforce query complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::{Path, Query};
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use permscope_application::CrmSession;
    use permscope_core::{AppError, CrmIdentity};
    use serde_json::{Value, json};
    use url::Url;

    use super::{QueryPage, SalesforceSession};
    use crate::test_server::spawn_server;

    const NEXT_RECORDS_URL: &str = "/services/data/v59.0/query/01gD0000002HU6KIAW-2000";

    fn session_at(instance_url: Url) -> SalesforceSession {
        SalesforceSession::new(
            reqwest::Client::new(),
            instance_url,
            "59.0".to_owned(),
            "token".to_owned(),
            CrmIdentity::new("005000000000001", "integration@example.com"),
        )
    }

    fn session() -> SalesforceSession {
        session_at(
            Url::parse("https://example.my.salesforce.com")
                .unwrap_or_else(|error| panic!("invalid test url: {error}")),
        )
    }

    fn bearer_is_valid(headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer token")
    }

    async fn first_page(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !bearer_is_valid(&headers)
            || params.get("q").map(String::as_str) != Some("SELECT Id FROM User")
        {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!([{ "errorCode": "MALFORMED_QUERY", "message": "unexpected request" }])),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "totalSize": 3,
                "done": false,
                "nextRecordsUrl": NEXT_RECORDS_URL,
                "records": [{ "Id": "005A" }, { "Id": "005B" }]
            })),
        )
    }

    async fn next_page(
        headers: HeaderMap,
        Path(locator): Path<String>,
    ) -> (StatusCode, Json<Value>) {
        if !bearer_is_valid(&headers) || locator != "01gD0000002HU6KIAW-2000" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!([{ "errorCode": "INVALID_QUERY_LOCATOR" }])),
            );
        }

        (
            StatusCode::OK,
            Json(json!({ "totalSize": 3, "done": true, "records": [{ "Id": "005C" }] })),
        )
    }

    #[tokio::test]
    async fn query_collects_rows_from_every_page() {
        let base_url = spawn_server(|_| {
            Router::new()
                .route("/services/data/v59.0/query", get(first_page))
                .route("/services/data/v59.0/query/{locator}", get(next_page))
        })
        .await;

        let rows = session_at(base_url)
            .query("SELECT Id FROM User")
            .await
            .unwrap_or_else(|error| panic!("expected rows: {error}"));

        let ids: Vec<&str> = rows.iter().filter_map(|row| row["Id"].as_str()).collect();
        assert_eq!(ids, vec!["005A", "005B", "005C"]);
    }

    #[tokio::test]
    async fn rejected_query_is_upstream_error_with_status_and_body() {
        let base_url = spawn_server(|_| {
            Router::new().route(
                "/services/data/v59.0/query",
                get(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!([{
                            "message": "Session expired or invalid",
                            "errorCode": "INVALID_SESSION_ID"
                        }])),
                    )
                }),
            )
        })
        .await;

        let result = session_at(base_url).query("SELECT Id FROM User").await;

        match result {
            Err(AppError::Upstream(message)) => {
                assert!(message.contains("401"), "{message}");
                assert!(message.contains("INVALID_SESSION_ID"), "{message}");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn query_url_targets_versioned_endpoint() {
        assert_eq!(
            session().query_url().map(|url| url.to_string()).ok().as_deref(),
            Some("https://example.my.salesforce.com/services/data/v59.0/query")
        );
    }

    #[test]
    fn next_page_url_is_resolved_against_instance() {
        assert_eq!(
            session()
                .next_page_url("/services/data/v59.0/query/01gD0000002HU6KIAW-2000")
                .map(|url| url.to_string())
                .ok()
                .as_deref(),
            Some(
                "https://example.my.salesforce.com/services/data/v59.0/query/\
                 01gD0000002HU6KIAW-2000"
            )
        );
    }

    #[test]
    fn last_page_has_no_continuation() {
        let page: Result<QueryPage, _> = serde_json::from_str(
            r#"{
                "totalSize": 1,
                "done": true,
                "records": [{ "attributes": { "type": "User" }, "Username": "a@example.com" }]
            }"#,
        );

        let page = page.unwrap_or_else(|error| panic!("expected page: {error}"));
        assert_eq!(page.records.len(), 1);
        assert!(page.next_records_url.is_none());
    }

    #[test]
    fn intermediate_page_carries_next_records_url() {
        let page: Result<QueryPage, _> = serde_json::from_str(
            r#"{
                "totalSize": 4000,
                "done": false,
                "nextRecordsUrl": "/services/data/v59.0/query/01gD0000002HU6KIAW-2000",
                "records": []
            }"#,
        );

        let page = page.unwrap_or_else(|error| panic!("expected page: {error}"));
        assert!(page.records.is_empty());
        assert_eq!(
            page.next_records_url.as_deref(),
            Some("/services/data/v59.0/query/01gD0000002HU6KIAW-2000")
        );
    }
}
