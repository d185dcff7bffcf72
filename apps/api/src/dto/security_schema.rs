use permscope_application::SecuritySchema;
use permscope_domain::{AggregatedObjectPermissions, FieldPermissions};
use serde::Serialize;
use ts_rs::TS;

/// Effective permissions of one user across every object type.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/security-schema-response.ts"
)]
pub struct SecuritySchemaResponse {
    pub user_id: String,
    pub permissions: Vec<ObjectPermissionsResponse>,
}

/// Letters granted on one object type and its fields.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/object-permissions-response.ts"
)]
pub struct ObjectPermissionsResponse {
    pub sobject_type: String,
    pub permissions: Vec<String>,
    pub fields: Vec<FieldPermissionsResponse>,
}

/// Letters granted on one field.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-permissions-response.ts"
)]
pub struct FieldPermissionsResponse {
    pub field: String,
    pub permissions: Vec<String>,
}

impl From<SecuritySchema> for SecuritySchemaResponse {
    fn from(value: SecuritySchema) -> Self {
        Self {
            user_id: value.user_id,
            permissions: value
                .objects
                .into_iter()
                .map(ObjectPermissionsResponse::from)
                .collect(),
        }
    }
}

impl From<AggregatedObjectPermissions> for ObjectPermissionsResponse {
    fn from(value: AggregatedObjectPermissions) -> Self {
        Self {
            sobject_type: value.sobject_type,
            permissions: value
                .permissions
                .iter()
                .map(|access| access.letter().to_owned())
                .collect(),
            fields: value
                .fields
                .into_iter()
                .map(FieldPermissionsResponse::from)
                .collect(),
        }
    }
}

impl From<FieldPermissions> for FieldPermissionsResponse {
    fn from(value: FieldPermissions) -> Self {
        Self {
            field: value.field_name,
            permissions: value
                .permissions
                .iter()
                .map(|access| access.letter().to_owned())
                .collect(),
        }
    }
}
