
/// Identity of the user an authenticated CRM session acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrmIdentity {
    user_id: String,
    username: String,
}

impl CrmIdentity {
    /// Creates an identity from the CRM user id and login name.
    #[must_use]
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    /// Returns the CRM user id of the session owner.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the login name of the session owner.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}
