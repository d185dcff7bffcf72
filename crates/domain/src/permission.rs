use std::collections::BTreeSet;

/// Object-level access letters in canonical order (`c`, `r`, `e`, `d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectAccess {
    /// Create records of the object type.
    Create,
    /// Read records of the object type.
    Read,
    /// Edit records of the object type.
    Edit,
    /// Delete records of the object type.
    Delete,
}

impl ObjectAccess {
    /// Returns the one-letter transport code.
    #[must_use]
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Create => "c",
            Self::Read => "r",
            Self::Edit => "e",
            Self::Delete => "d",
        }
    }
}

/// Field-level access letters in canonical order (`r`, `w`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldAccess {
    /// Read the field value.
    Read,
    /// Write the field value.
    Write,
}

impl FieldAccess {
    /// Returns the one-letter transport code.
    #[must_use]
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::Write => "w",
        }
    }
}

/// Record-level access letters in canonical order (`r`, `e`, `d`, `t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordAccess {
    /// Read the record.
    Read,
    /// Edit the record.
    Edit,
    /// Delete the record.
    Delete,
    /// Transfer record ownership.
    Transfer,
}

impl RecordAccess {
    /// Returns the one-letter transport code.
    #[must_use]
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::Edit => "e",
            Self::Delete => "d",
            Self::Transfer => "t",
        }
    }
}

/// One object permission row granted through a permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPermissionGrant {
    /// API name of the object type.
    pub sobject_type: String,
    /// Create flag.
    pub can_create: bool,
    /// Read flag.
    pub can_read: bool,
    /// Edit flag.
    pub can_edit: bool,
    /// Delete flag.
    pub can_delete: bool,
}

impl ObjectPermissionGrant {
    /// Returns the granted letters in canonical order.
    #[must_use]
    pub fn access(&self) -> BTreeSet<ObjectAccess> {
        [
            (self.can_create, ObjectAccess::Create),
            (self.can_read, ObjectAccess::Read),
            (self.can_edit, ObjectAccess::Edit),
            (self.can_delete, ObjectAccess::Delete),
        ]
        .into_iter()
        .filter_map(|(granted, access)| granted.then_some(access))
        .collect()
    }
}

/// One field permission row granted through a permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPermissionGrant {
    /// API name of the owning object type.
    pub sobject_type: String,
    /// Field name without the object qualifier.
    pub field_name: String,
    /// Read flag.
    pub can_read: bool,
    /// Edit flag.
    pub can_edit: bool,
}

impl FieldPermissionGrant {
    /// Builds a grant from a qualified `Object.Field` name.
    #[must_use]
    pub fn from_qualified(
        sobject_type: impl Into<String>,
        qualified_field: &str,
        can_read: bool,
        can_edit: bool,
    ) -> Self {
        Self {
            sobject_type: sobject_type.into(),
            field_name: field_name_from_qualified(qualified_field).to_owned(),
            can_read,
            can_edit,
        }
    }

    /// Returns the granted letters in canonical order.
    #[must_use]
    pub fn access(&self) -> BTreeSet<FieldAccess> {
        [
            (self.can_read, FieldAccess::Read),
            (self.can_edit, FieldAccess::Write),
        ]
        .into_iter()
        .filter_map(|(granted, access)| granted.then_some(access))
        .collect()
    }
}

/// Strips the object qualifier from `Object.Field`; unqualified names are kept whole.
#[must_use]
pub fn field_name_from_qualified(qualified_field: &str) -> &str {
    qualified_field
        .split_once('.')
        .map_or(qualified_field, |(_, field)| field)
}
