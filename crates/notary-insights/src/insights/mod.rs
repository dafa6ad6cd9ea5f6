mod report;
mod rules;

pub use report::{generate_strategic_insights, InsightMetrics, StrategicInsightsReport};
pub use rules::{
    derive_insights, Insight, InsightKind, LOW_ACQUISITION_THRESHOLD, PENDING_BACKLOG_THRESHOLD,
    PROJECTED_WEEKS_PER_MONTH,
};
