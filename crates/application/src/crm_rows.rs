//! Typed schemas for CRM query rows, decoded before any business logic runs.

use permscope_core::{AppError, AppResult};
use permscope_domain::{FieldPermissionGrant, ObjectPermissionGrant, RecordAccessRow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes raw query rows into a typed schema.
pub(crate) fn decode_rows<T: DeserializeOwned>(
    object: &str,
    rows: Vec<Value>,
) -> AppResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|error| {
                AppError::Upstream(format!("unexpected {object} row from CRM: {error}"))
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UserRow {
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PermissionSetAssignmentRow {
    pub permission_set_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ObjectPermissionsRow {
    pub sobject_type: String,
    #[serde(default)]
    pub permissions_create: bool,
    #[serde(default)]
    pub permissions_read: bool,
    #[serde(default)]
    pub permissions_edit: bool,
    #[serde(default)]
    pub permissions_delete: bool,
}

impl From<ObjectPermissionsRow> for ObjectPermissionGrant {
    fn from(row: ObjectPermissionsRow) -> Self {
        Self {
            sobject_type: row.sobject_type,
            can_create: row.permissions_create,
            can_read: row.permissions_read,
            can_edit: row.permissions_edit,
            can_delete: row.permissions_delete,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct FieldPermissionsRow {
    pub sobject_type: String,
    pub field: String,
    #[serde(default)]
    pub permissions_read: bool,
    #[serde(default)]
    pub permissions_edit: bool,
}

impl From<FieldPermissionsRow> for FieldPermissionGrant {
    fn from(row: FieldPermissionsRow) -> Self {
        Self::from_qualified(
            row.sobject_type,
            row.field.as_str(),
            row.permissions_read,
            row.permissions_edit,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UserRecordAccessRow {
    pub record_id: String,
    #[serde(default)]
    pub has_read_access: bool,
    #[serde(default)]
    pub has_edit_access: bool,
    #[serde(default)]
    pub has_delete_access: bool,
    #[serde(default)]
    pub has_transfer_access: bool,
    #[serde(default)]
    pub max_access_level: Option<String>,
}

impl From<UserRecordAccessRow> for RecordAccessRow {
    fn from(row: UserRecordAccessRow) -> Self {
        Self {
            record_id: row.record_id,
            has_read: row.has_read_access,
            has_edit: row.has_edit_access,
            has_delete: row.has_delete_access,
            has_transfer: row.has_transfer_access,
            max_access_level: row.max_access_level,
        }
    }
}
