use permscope_core::{AppError, AppResult};
use permscope_domain::UserId;
use tracing::debug;

use crate::crm_ports::CrmSession;
use crate::crm_rows::{UserRow, decode_rows};
use crate::soql;

/// The user whose access is being reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TargetUser {
    pub user_id: UserId,
    pub username: String,
}

/// Confirms that a user exists and loads its login name.
pub(crate) async fn find_user(session: &dyn CrmSession, user_id: UserId) -> AppResult<TargetUser> {
    debug!(user_id = %user_id, "looking up target user");

    let rows = session.query(soql::user_by_id(&user_id).as_str()).await?;
    let user = decode_rows::<UserRow>("User", rows)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;

    Ok(TargetUser {
        user_id,
        username: user.username,
    })
}
