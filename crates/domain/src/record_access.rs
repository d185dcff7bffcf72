use std::collections::{BTreeMap, BTreeSet};

use permscope_core::{AppError, AppResult};

use crate::identifier::RecordId;
use crate::permission::RecordAccess;

/// Maximum number of record ids accepted in one access check.
pub const MAX_RECORD_IDS: usize = 100;

/// Access level reported for records the user cannot reach.
pub const MAX_ACCESS_LEVEL_NONE: &str = "None";

/// A validated batch of record ids to check access for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAccessBatch {
    record_ids: Vec<RecordId>,
}

impl RecordAccessBatch {
    /// Validates the batch size and every id, dropping repeated ids.
    pub fn new(record_ids: Vec<String>) -> AppResult<Self> {
        if record_ids.is_empty() {
            return Err(AppError::Validation(
                "recordIds must be a non-empty array".to_owned(),
            ));
        }

        if record_ids.len() > MAX_RECORD_IDS {
            return Err(AppError::Validation(format!(
                "a maximum of {MAX_RECORD_IDS} records can be checked at once, got {}",
                record_ids.len()
            )));
        }

        let mut seen = BTreeSet::new();
        let mut validated = Vec::with_capacity(record_ids.len());
        for value in record_ids {
            let record_id = RecordId::new(value)?;
            if seen.insert(record_id.clone()) {
                validated.push(record_id);
            }
        }

        Ok(Self {
            record_ids: validated,
        })
    }

    /// Returns the distinct ids in request order.
    #[must_use]
    pub fn record_ids(&self) -> &[RecordId] {
        self.record_ids.as_slice()
    }

    /// Splits the batch by object-type key prefix.
    #[must_use]
    pub fn partitions(&self) -> BTreeMap<String, Vec<RecordId>> {
        let mut partitions: BTreeMap<String, Vec<RecordId>> = BTreeMap::new();
        for record_id in &self.record_ids {
            partitions
                .entry(record_id.key_prefix().to_owned())
                .or_default()
                .push(record_id.clone());
        }

        partitions
    }
}

/// Access flags returned by the CRM for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAccessRow {
    /// Record id as echoed by the CRM.
    pub record_id: String,
    /// Read flag.
    pub has_read: bool,
    /// Edit flag.
    pub has_edit: bool,
    /// Delete flag.
    pub has_delete: bool,
    /// Transfer flag.
    pub has_transfer: bool,
    /// Highest access level the CRM reports, if any.
    pub max_access_level: Option<String>,
}

impl RecordAccessRow {
    /// Returns the granted letters in canonical order.
    #[must_use]
    pub fn access(&self) -> BTreeSet<RecordAccess> {
        [
            (self.has_read, RecordAccess::Read),
            (self.has_edit, RecordAccess::Edit),
            (self.has_delete, RecordAccess::Delete),
            (self.has_transfer, RecordAccess::Transfer),
        ]
        .into_iter()
        .filter_map(|(granted, access)| granted.then_some(access))
        .collect()
    }
}

/// Effective access of one user on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAccessResult {
    /// Object-type key prefix of the record id.
    pub object_type_prefix: String,
    /// Granted letters in canonical order.
    pub permissions: BTreeSet<RecordAccess>,
    /// Highest access level, or `None` when nothing is granted.
    pub max_access_level: String,
}

impl RecordAccessResult {
    /// Result for a record that produced no access row.
    #[must_use]
    pub fn no_access(record_id: &RecordId) -> Self {
        Self {
            object_type_prefix: record_id.key_prefix().to_owned(),
            permissions: BTreeSet::new(),
            max_access_level: MAX_ACCESS_LEVEL_NONE.to_owned(),
        }
    }

    fn from_row(record_id: &RecordId, row: &RecordAccessRow) -> Self {
        let permissions = row.access();
        let max_access_level = if permissions.is_empty() {
            MAX_ACCESS_LEVEL_NONE.to_owned()
        } else {
            row.max_access_level
                .clone()
                .unwrap_or_else(|| MAX_ACCESS_LEVEL_NONE.to_owned())
        };

        Self {
            object_type_prefix: record_id.key_prefix().to_owned(),
            permissions,
            max_access_level,
        }
    }
}

/// Merges lookup rows into one result per requested id.
///
/// Ids without a row are backfilled with [`RecordAccessResult::no_access`];
/// rows that match no requested id are ignored.
#[must_use]
pub fn merge_record_access(
    batch: &RecordAccessBatch,
    rows: impl IntoIterator<Item = RecordAccessRow>,
) -> BTreeMap<String, RecordAccessResult> {
    let mut results = BTreeMap::new();

    for row in rows {
        for record_id in batch
            .record_ids()
            .iter()
            .filter(|record_id| record_id.matches(row.record_id.as_str()))
        {
            results.insert(
                record_id.as_str().to_owned(),
                RecordAccessResult::from_row(record_id, &row),
            );
        }
    }

    for record_id in batch.record_ids() {
        results
            .entry(record_id.as_str().to_owned())
            .or_insert_with(|| RecordAccessResult::no_access(record_id));
    }

    results
}
