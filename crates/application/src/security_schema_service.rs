use std::sync::Arc;

use permscope_core::{AppError, AppResult};
use permscope_domain::{
    AggregatedObjectPermissions, AggregationObserver, FieldPermissionGrant,
    NoopAggregationObserver, ObjectPermissionGrant, UserId, aggregate,
};
use tracing::info;

use crate::crm_ports::{CrmSession, CrmSessionProvider};
use crate::crm_rows::{
    FieldPermissionsRow, ObjectPermissionsRow, PermissionSetAssignmentRow, decode_rows,
};
use crate::soql;
use crate::target_user::find_user;

/// How permission entries that resolve to no letters are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPermissionPolicy {
    /// Keep objects and fields without any granted letter.
    #[default]
    Retain,
    /// Leave objects and fields without any granted letter out of the schema.
    Drop,
}

impl EmptyPermissionPolicy {
    /// Maps the `drop_empty` configuration flag onto a policy.
    #[must_use]
    pub fn from_drop_flag(drop_empty: bool) -> Self {
        if drop_empty { Self::Drop } else { Self::Retain }
    }

    fn drops_empty(self) -> bool {
        self == Self::Drop
    }
}

/// Object and field permissions of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuritySchema {
    /// User the schema was resolved for.
    pub user_id: String,
    /// Objects sorted by type name, each with fields sorted by name.
    pub objects: Vec<AggregatedObjectPermissions>,
}

/// Application service resolving a user's object and field permissions.
#[derive(Clone)]
pub struct SecuritySchemaService {
    session_provider: Arc<dyn CrmSessionProvider>,
    empty_permission_policy: EmptyPermissionPolicy,
    observer: Arc<dyn AggregationObserver>,
}

impl SecuritySchemaService {
    /// Creates a new security schema service.
    #[must_use]
    pub fn new(
        session_provider: Arc<dyn CrmSessionProvider>,
        empty_permission_policy: EmptyPermissionPolicy,
    ) -> Self {
        Self {
            session_provider,
            empty_permission_policy,
            observer: Arc::new(NoopAggregationObserver),
        }
    }

    /// Replaces the aggregation checkpoint observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AggregationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolves the security schema for `user_id`, or for the session user when absent.
    pub async fn security_schema(&self, user_id: Option<String>) -> AppResult<SecuritySchema> {
        let session = self.session_provider.authenticate().await?;

        let requested_user_id = user_id
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| session.identity().user_id().to_owned());
        if requested_user_id.trim().is_empty() {
            return Err(AppError::Validation("no user id available".to_owned()));
        }

        let user = find_user(session.as_ref(), UserId::new(requested_user_id)?).await?;
        let permission_set_ids = self
            .permission_set_ids(session.as_ref(), &user.user_id)
            .await?;

        if permission_set_ids.is_empty() {
            info!(user_id = %user.user_id, "user has no permission set assignments");
            return Ok(SecuritySchema {
                user_id: user.user_id.into(),
                objects: Vec::new(),
            });
        }

        let object_rows = session
            .query(soql::object_permissions(&permission_set_ids).as_str())
            .await?;
        let object_grants: Vec<ObjectPermissionGrant> =
            decode_rows::<ObjectPermissionsRow>("ObjectPermissions", object_rows)?
                .into_iter()
                .map(ObjectPermissionGrant::from)
                .collect();

        let field_rows = session
            .query(soql::field_permissions(&permission_set_ids).as_str())
            .await?;
        let field_grants: Vec<FieldPermissionGrant> =
            decode_rows::<FieldPermissionsRow>("FieldPermissions", field_rows)?
                .into_iter()
                .map(FieldPermissionGrant::from)
                .collect();

        info!(
            user_id = %user.user_id,
            permission_sets = permission_set_ids.len(),
            object_rows = object_grants.len(),
            field_rows = field_grants.len(),
            "fetched permission rows"
        );

        let objects = aggregate(
            object_grants,
            field_grants,
            self.empty_permission_policy.drops_empty(),
            self.observer.as_ref(),
        );

        Ok(SecuritySchema {
            user_id: user.user_id.into(),
            objects,
        })
    }

    async fn permission_set_ids(
        &self,
        session: &dyn CrmSession,
        user_id: &UserId,
    ) -> AppResult<Vec<String>> {
        let rows = session
            .query(soql::permission_set_assignments(user_id).as_str())
            .await?;

        Ok(
            decode_rows::<PermissionSetAssignmentRow>("PermissionSetAssignment", rows)?
                .into_iter()
                .map(|row| row.permission_set_id)
                .collect(),
        )
    }
}
