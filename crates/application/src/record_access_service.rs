use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use permscope_core::{AppError, AppResult};
use permscope_domain::{
    RecordAccessBatch, RecordAccessResult, RecordAccessRow, RecordId, UserId, merge_record_access,
};
use tracing::{debug, info};

use crate::crm_ports::{CrmSession, CrmSessionProvider};
use crate::crm_rows::{UserRecordAccessRow, decode_rows};
use crate::soql;
use crate::target_user::{TargetUser, find_user};

/// Per-record access of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAccessReport {
    /// User the access was checked for.
    pub user_id: String,
    /// Login name of that user.
    pub username: String,
    /// One entry per requested record id.
    pub results: BTreeMap<String, RecordAccessResult>,
}

/// Application service checking record-level access in batches.
#[derive(Clone)]
pub struct RecordAccessService {
    session_provider: Arc<dyn CrmSessionProvider>,
}

impl RecordAccessService {
    /// Creates a new record access service.
    #[must_use]
    pub fn new(session_provider: Arc<dyn CrmSessionProvider>) -> Self {
        Self { session_provider }
    }

    /// Checks access of `user_id`, or of the session user when absent, on every record.
    ///
    /// The batch and user id are validated before the CRM is contacted. Lookups
    /// run concurrently per key prefix and the first failure aborts the check.
    pub async fn check_access(
        &self,
        user_id: Option<String>,
        record_ids: Vec<String>,
    ) -> AppResult<RecordAccessReport> {
        let batch = RecordAccessBatch::new(record_ids)?;
        let requested_user_id = user_id
            .filter(|value| !value.trim().is_empty())
            .map(UserId::new)
            .transpose()?;

        let session = self.session_provider.authenticate().await?;
        let user = match requested_user_id {
            Some(user_id) => find_user(session.as_ref(), user_id).await?,
            None => session_user(session.as_ref())?,
        };

        let partitions = batch.partitions();
        info!(
            user_id = %user.user_id,
            record_count = batch.record_ids().len(),
            partitions = partitions.len(),
            "checking record access"
        );

        let lookups = partitions.iter().map(|(prefix, record_ids)| {
            lookup_partition(session.as_ref(), &user.user_id, prefix, record_ids)
        });
        let rows = try_join_all(lookups).await?;

        let results = merge_record_access(&batch, rows.into_iter().flatten());

        Ok(RecordAccessReport {
            user_id: user.user_id.into(),
            username: user.username,
            results,
        })
    }
}

fn session_user(session: &dyn CrmSession) -> AppResult<TargetUser> {
    let identity = session.identity();
    if identity.user_id().trim().is_empty() {
        return Err(AppError::Validation("no user id available".to_owned()));
    }

    Ok(TargetUser {
        user_id: UserId::new(identity.user_id())?,
        username: identity.username().to_owned(),
    })
}

async fn lookup_partition(
    session: &dyn CrmSession,
    user_id: &UserId,
    prefix: &str,
    record_ids: &[RecordId],
) -> AppResult<Vec<RecordAccessRow>> {
    let rows = session
        .query(soql::user_record_access(user_id, record_ids).as_str())
        .await?;
    let rows: Vec<RecordAccessRow> = decode_rows::<UserRecordAccessRow>("UserRecordAccess", rows)?
        .into_iter()
        .map(RecordAccessRow::from)
        .collect();

    debug!(
        partition = prefix,
        requested = record_ids.len(),
        returned = rows.len(),
        "record access partition resolved"
    );

    Ok(rows)
}
