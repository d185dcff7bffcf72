pub mod health;
pub mod record_access;
pub mod security_schema;
