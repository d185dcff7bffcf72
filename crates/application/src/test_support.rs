use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use permscope_core::{AppError, AppResult, CrmIdentity};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::crm_ports::{CrmSession, CrmSessionProvider};

const FILTER_COLUMNS: [&str; 4] = ["Id", "RecordId", "ParentId", "AssigneeId"];

/// In-memory CRM that answers queries from canned table rows.
///
/// Rows carrying one of [`FILTER_COLUMNS`] are only returned when a quoted
/// literal of the query is a prefix of that column's value.
pub(crate) struct FakeCrm {
    state: Arc<FakeCrmState>,
}

pub(crate) struct FakeCrmState {
    identity: CrmIdentity,
    tables: HashMap<String, Vec<Value>>,
    failing_table: Option<String>,
    failing_literal: Option<String>,
    fail_authentication: bool,
    pub authentications: Mutex<u32>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeCrm {
    pub(crate) fn new(identity: CrmIdentity) -> Self {
        Self {
            state: Arc::new(FakeCrmState {
                identity,
                tables: HashMap::new(),
                failing_table: None,
                failing_literal: None,
                fail_authentication: false,
                authentications: Mutex::new(0),
                queries: Mutex::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn with_rows(mut self, table: &str, rows: Vec<Value>) -> Self {
        self.state_mut()
            .tables
            .entry(table.to_owned())
            .or_default()
            .extend(rows);
        self
    }

    pub(crate) fn failing_on(mut self, table: &str) -> Self {
        self.state_mut().failing_table = Some(table.to_owned());
        self
    }

    pub(crate) fn failing_for_literal(mut self, literal: &str) -> Self {
        self.state_mut().failing_literal = Some(literal.to_owned());
        self
    }

    pub(crate) fn rejecting_credentials(mut self) -> Self {
        self.state_mut().fail_authentication = true;
        self
    }

    pub(crate) fn state(&self) -> Arc<FakeCrmState> {
        self.state.clone()
    }

    fn state_mut(&mut self) -> &mut FakeCrmState {
        Arc::get_mut(&mut self.state)
            .unwrap_or_else(|| panic!("fake CRM must be configured before use"))
    }
}

impl FakeCrmState {
    pub(crate) async fn authentication_count(&self) -> u32 {
        *self.authentications.lock().await
    }

    pub(crate) async fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

fn table_name(soql: &str) -> Option<&str> {
    soql.split_once(" FROM ")
        .and_then(|(_, rest)| rest.split_whitespace().next())
}

fn quoted_literals(soql: &str) -> Vec<&str> {
    soql.split('\'').skip(1).step_by(2).collect()
}

fn row_matches(row: &Value, literals: &[&str]) -> bool {
    FILTER_COLUMNS.iter().all(|column| match row.get(column).and_then(Value::as_str) {
        Some(value) => literals
            .iter()
            .any(|literal| !literal.is_empty() && value.starts_with(literal)),
        None => true,
    })
}

#[async_trait]
impl CrmSession for FakeCrmState {
    fn identity(&self) -> &CrmIdentity {
        &self.identity
    }

    async fn query(&self, soql: &str) -> AppResult<Vec<Value>> {
        self.queries.lock().await.push(soql.to_owned());

        let table = table_name(soql).unwrap_or_default();
        if self.failing_table.as_deref() == Some(table) {
            return Err(AppError::Upstream(format!(
                "INVALID_TYPE: sObject type '{table}' is not supported"
            )));
        }

        let literals = quoted_literals(soql);
        if let Some(failing) = self.failing_literal.as_deref()
            && literals.contains(&failing)
        {
            return Err(AppError::Upstream(format!(
                "MALFORMED_QUERY: invalid ID field: {failing}"
            )));
        }

        Ok(self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row_matches(row, &literals))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl CrmSessionProvider for FakeCrm {
    async fn authenticate(&self) -> AppResult<Arc<dyn CrmSession>> {
        *self.state.authentications.lock().await += 1;

        if self.state.fail_authentication {
            return Err(AppError::Upstream(
                "INVALID_LOGIN: Invalid username, password, security token".to_owned(),
            ));
        }

        Ok(self.state.clone())
    }
}
