use std::collections::{BTreeSet, HashMap};

use crate::permission::{FieldAccess, FieldPermissionGrant, ObjectAccess, ObjectPermissionGrant};

/// Effective access on one field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPermissions {
    /// Field name without the object qualifier.
    pub field_name: String,
    /// Granted letters in canonical order.
    pub permissions: BTreeSet<FieldAccess>,
}

/// Effective access on one object type together with its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedObjectPermissions {
    /// API name of the object type.
    pub sobject_type: String,
    /// Union of all object letters granted to the user.
    pub permissions: BTreeSet<ObjectAccess>,
    /// Field access sorted by field name.
    pub fields: Vec<FieldPermissions>,
}

/// Checkpoint hook invoked while permissions are aggregated.
///
/// Implementations only observe; the aggregation result never depends on them.
pub trait AggregationObserver: Send + Sync {
    /// Called once rows are grouped by object type.
    fn grouping_complete(&self, _object_groups: usize, _field_groups: usize) {}

    /// Called with the final sorted aggregation.
    fn aggregation_complete(&self, _objects: &[AggregatedObjectPermissions]) {}
}

/// Observer that ignores every checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAggregationObserver;

impl AggregationObserver for NoopAggregationObserver {}

/// Groups field rows by object type, merging repeated grants on the same field.
///
/// When `drop_empty` is set, fields left without any letter are discarded.
/// The returned field lists are in no particular order.
#[must_use]
pub fn group_field_grants(
    rows: impl IntoIterator<Item = FieldPermissionGrant>,
    drop_empty: bool,
) -> HashMap<String, Vec<FieldPermissions>> {
    let mut by_object: HashMap<String, HashMap<String, BTreeSet<FieldAccess>>> = HashMap::new();

    for row in rows {
        let access = row.access();
        by_object
            .entry(row.sobject_type)
            .or_default()
            .entry(row.field_name)
            .or_default()
            .extend(access);
    }

    by_object
        .into_iter()
        .filter_map(|(sobject_type, fields)| {
            let fields: Vec<FieldPermissions> = fields
                .into_iter()
                .filter(|(_, permissions)| !(drop_empty && permissions.is_empty()))
                .map(|(field_name, permissions)| FieldPermissions {
                    field_name,
                    permissions,
                })
                .collect();

            (!fields.is_empty()).then_some((sobject_type, fields))
        })
        .collect()
}

/// Sorts every field list by field name.
pub fn sort_field_groups(groups: &mut HashMap<String, Vec<FieldPermissions>>) {
    for fields in groups.values_mut() {
        fields.sort_by(|left, right| left.field_name.cmp(&right.field_name));
    }
}

/// Groups object rows by type and unions their letters.
///
/// A later grant never erases an earlier one. When `drop_empty` is set, object
/// types left without any letter are discarded.
#[must_use]
pub fn group_object_grants(
    rows: impl IntoIterator<Item = ObjectPermissionGrant>,
    drop_empty: bool,
) -> HashMap<String, BTreeSet<ObjectAccess>> {
    let mut by_object: HashMap<String, BTreeSet<ObjectAccess>> = HashMap::new();

    for row in rows {
        let access = row.access();
        by_object.entry(row.sobject_type).or_default().extend(access);
    }

    if drop_empty {
        by_object.retain(|_, permissions| !permissions.is_empty());
    }

    by_object
}

/// Attaches field lists to their object types.
///
/// Field groups without a matching object group are not emitted.
#[must_use]
pub fn attach_field_groups(
    object_groups: HashMap<String, BTreeSet<ObjectAccess>>,
    mut field_groups: HashMap<String, Vec<FieldPermissions>>,
) -> Vec<AggregatedObjectPermissions> {
    object_groups
        .into_iter()
        .map(|(sobject_type, permissions)| {
            let fields = field_groups.remove(&sobject_type).unwrap_or_default();
            AggregatedObjectPermissions {
                sobject_type,
                permissions,
                fields,
            }
        })
        .collect()
}

/// Sorts objects by type name.
pub fn sort_objects(objects: &mut [AggregatedObjectPermissions]) {
    objects.sort_by(|left, right| left.sobject_type.cmp(&right.sobject_type));
}

/// Builds the sorted object/field permission tree from flat grant rows.
#[must_use]
pub fn aggregate(
    object_rows: impl IntoIterator<Item = ObjectPermissionGrant>,
    field_rows: impl IntoIterator<Item = FieldPermissionGrant>,
    drop_empty: bool,
    observer: &dyn AggregationObserver,
) -> Vec<AggregatedObjectPermissions> {
    let mut field_groups = group_field_grants(field_rows, drop_empty);
    let object_groups = group_object_grants(object_rows, drop_empty);
    observer.grouping_complete(object_groups.len(), field_groups.len());

    sort_field_groups(&mut field_groups);
    let mut objects = attach_field_groups(object_groups, field_groups);
    sort_objects(&mut objects);

    observer.aggregation_complete(&objects);
    objects
}
