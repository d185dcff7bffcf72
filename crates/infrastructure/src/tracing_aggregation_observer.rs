use permscope_domain::{AggregatedObjectPermissions, AggregationObserver};
use tracing::{debug, info};

/// Aggregation observer that reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAggregationObserver;

impl AggregationObserver for TracingAggregationObserver {
    fn grouping_complete(&self, object_groups: usize, field_groups: usize) {
        debug!(object_groups, field_groups, "grouped permission grants");
    }

    fn aggregation_complete(&self, objects: &[AggregatedObjectPermissions]) {
        let field_count: usize = objects.iter().map(|object| object.fields.len()).sum();
        info!(
            object_count = objects.len(),
            field_count, "aggregated permissions"
        );
    }
}
