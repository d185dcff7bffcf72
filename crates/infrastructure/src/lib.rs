//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod salesforce_http;
mod salesforce_session;
mod salesforce_session_provider;
mod tracing_aggregation_observer;

#[cfg(test)]
mod test_server;

pub use salesforce_session_provider::{SalesforceConfig, SalesforceSessionProvider};
pub use tracing_aggregation_observer::TracingAggregationObserver;
