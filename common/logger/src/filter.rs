use crate::severity::Severity;
use tracing::level_filters::LevelFilter;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Filter};

/// A per-layer filter that lets through only the events
/// whose severity is at least the configured threshold.
#[derive(Debug, Clone, Copy)]
pub struct SeverityFilter {
    threshold: Severity,
}

impl SeverityFilter {
    pub fn new(threshold: Severity) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }
}

impl<S: Subscriber> Filter<S> for SeverityFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: &Context<'_, S>) -> bool {
        // Spans are not printed by the sinks but they must not be disabled for the whole subscriber
        metadata.is_span() || self.threshold.admits(metadata)
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.threshold.to_level_filter())
    }
}
