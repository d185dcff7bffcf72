//! SOQL statements issued by the application services.
//!
//! Record and user ids reach these builders only as validated newtypes; every
//! other value is quoted with [`quote_literal`].

use permscope_domain::{RecordId, UserId};

/// Quotes a string literal for SOQL, escaping backslashes and single quotes.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for character in value.chars() {
        if matches!(character, '\\' | '\'') {
            quoted.push('\\');
        }
        quoted.push(character);
    }
    quoted.push('\'');
    quoted
}

fn in_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(quote_literal)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn user_by_id(user_id: &UserId) -> String {
    format!(
        "SELECT Id, Username FROM User WHERE Id = {}",
        quote_literal(user_id.as_str())
    )
}

pub(crate) fn permission_set_assignments(user_id: &UserId) -> String {
    format!(
        "SELECT PermissionSetId FROM PermissionSetAssignment WHERE AssigneeId = {}",
        quote_literal(user_id.as_str())
    )
}

pub(crate) fn object_permissions(permission_set_ids: &[String]) -> String {
    format!(
        "SELECT SobjectType, PermissionsCreate, PermissionsRead, PermissionsEdit, \
         PermissionsDelete FROM ObjectPermissions WHERE ParentId IN ({})",
        in_list(permission_set_ids.iter().map(String::as_str))
    )
}

pub(crate) fn field_permissions(permission_set_ids: &[String]) -> String {
    format!(
        "SELECT SobjectType, Field, PermissionsRead, PermissionsEdit \
         FROM FieldPermissions WHERE ParentId IN ({})",
        in_list(permission_set_ids.iter().map(String::as_str))
    )
}

pub(crate) fn user_record_access(user_id: &UserId, record_ids: &[RecordId]) -> String {
    format!(
        "SELECT RecordId, HasReadAccess, HasEditAccess, HasDeleteAccess, HasTransferAccess, \
         MaxAccessLevel FROM UserRecordAccess WHERE UserId = {} AND RecordId IN ({})",
        quote_literal(user_id.as_str()),
        in_list(record_ids.iter().map(RecordId::as_str))
    )
}
