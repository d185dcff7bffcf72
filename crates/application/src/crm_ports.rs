use std::sync::Arc;

use async_trait::async_trait;
use permscope_core::{AppResult, CrmIdentity};
use serde_json::Value;

/// An authenticated CRM session.
#[async_trait]
pub trait CrmSession: Send + Sync {
    /// Returns the user the session acts as.
    fn identity(&self) -> &CrmIdentity;

    /// Runs a SOQL query and returns every result row.
    async fn query(&self, soql: &str) -> AppResult<Vec<Value>>;
}

/// Port for acquiring CRM sessions.
#[async_trait]
pub trait CrmSessionProvider: Send + Sync {
    /// Signs in with the configured integration credentials.
    async fn authenticate(&self) -> AppResult<Arc<dyn CrmSession>>;
}
