//! Application services and ports.

#![forbid(unsafe_code)]

mod crm_ports;
mod crm_rows;
mod record_access_service;
mod security_schema_service;
mod soql;
mod target_user;

#[cfg(test)]
mod test_support;

pub use crm_ports::{CrmSession, CrmSessionProvider};
pub use record_access_service::{RecordAccessReport, RecordAccessService};
pub use security_schema_service::{EmptyPermissionPolicy, SecuritySchema, SecuritySchemaService};
