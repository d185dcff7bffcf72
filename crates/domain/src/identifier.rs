use std::fmt::{Display, Formatter};

use permscope_core::{AppError, AppResult};

/// Length of the object-type key prefix at the start of every CRM id.
pub const KEY_PREFIX_LENGTH: usize = 3;

const SHORT_ID_LENGTH: usize = 15;
const LONG_ID_LENGTH: usize = 18;

fn validate_crm_id(kind: &str, value: &str) -> AppResult<()> {
    let well_formed = (KEY_PREFIX_LENGTH..=LONG_ID_LENGTH).contains(&value.len())
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric());

    if !well_formed {
        return Err(AppError::Validation(format!(
            "{kind} '{value}' must be {KEY_PREFIX_LENGTH} to {LONG_ID_LENGTH} alphanumeric characters"
        )));
    }

    Ok(())
}

/// A validated CRM record id.
///
/// Ids are restricted to ASCII alphanumerics so they can be interpolated into
/// SOQL literals without escaping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Validates and wraps a record id.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        validate_crm_id("record id", value.as_str())?;
        Ok(Self(value))
    }

    /// Returns the underlying id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the object-type key prefix.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.0[..KEY_PREFIX_LENGTH]
    }

    /// Returns whether an id echoed by the CRM refers to this record.
    ///
    /// The CRM answers with the 18-character form even when the 15-character
    /// form was queried; the first 15 characters are identical in both.
    #[must_use]
    pub fn matches(&self, returned_id: &str) -> bool {
        if self.0 == returned_id {
            return true;
        }

        self.0.len() == SHORT_ID_LENGTH
            && returned_id.len() == LONG_ID_LENGTH
            && returned_id.starts_with(self.0.as_str())
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// A validated CRM user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validates and wraps a user id.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        validate_crm_id("user id", value.as_str())?;
        Ok(Self(value))
    }

    /// Returns the underlying id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordId, UserId};

    #[test]
    fn record_id_accepts_short_and_long_forms() {
        assert!(RecordId::new("001AAA").is_ok());
        assert!(RecordId::new("001000000000001").is_ok());
        assert!(RecordId::new("001000000000001AAA").is_ok());
    }

    #[test]
    fn record_id_rejects_quotes_and_bad_lengths() {
        assert!(RecordId::new("001' OR Id != '").is_err());
        assert!(RecordId::new("01").is_err());
        assert!(RecordId::new("001000000000001AAAB").is_err());
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn record_id_exposes_key_prefix() {
        let record_id = RecordId::new("003000000000042").unwrap_or_else(|error| {
            panic!("expected valid record id: {error}");
        });
        assert_eq!(record_id.key_prefix(), "003");
    }

    #[test]
    fn short_record_id_matches_long_echo() {
        let record_id = RecordId::new("001000000000001").unwrap_or_else(|error| {
            panic!("expected valid record id: {error}");
        });

        assert!(record_id.matches("001000000000001"));
        assert!(record_id.matches("001000000000001IAE"));
        assert!(!record_id.matches("001000000000002IAE"));
    }

    #[test]
    fn user_id_rejects_injection_attempt() {
        let result = UserId::new("005' OR Name != '");
        assert!(result.is_err());
    }
}
