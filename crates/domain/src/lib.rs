//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod aggregation;
mod identifier;
mod permission;
mod record_access;

pub use aggregation::{
    AggregatedObjectPermissions, AggregationObserver, FieldPermissions, NoopAggregationObserver,
    aggregate, attach_field_groups, group_field_grants, group_object_grants, sort_field_groups,
    sort_objects,
};
pub use identifier::{KEY_PREFIX_LENGTH, RecordId, UserId};
pub use permission::{
    FieldAccess, FieldPermissionGrant, ObjectAccess, ObjectPermissionGrant, RecordAccess,
    field_name_from_qualified,
};
pub use record_access::{
    MAX_ACCESS_LEVEL_NONE, MAX_RECORD_IDS, RecordAccessBatch, RecordAccessResult,
    RecordAccessRow, merge_record_access,
};
