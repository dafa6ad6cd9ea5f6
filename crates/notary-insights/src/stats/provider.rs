use super::domain::{DocumentStats, RevenueStats, UserActivityStats};
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only source of the aggregates the insight rules run on.
///
/// Each call is independent; callers may issue all three concurrently.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn user_activity_stats(&self) -> Result<UserActivityStats, StatsError>;
    async fn document_stats(&self) -> Result<DocumentStats, StatsError>;
    async fn revenue_stats(&self) -> Result<RevenueStats, StatsError>;
}

#[async_trait]
impl<P> StatsProvider for Arc<P>
where
    P: StatsProvider + ?Sized,
{
    async fn user_activity_stats(&self) -> Result<UserActivityStats, StatsError> {
        (**self).user_activity_stats().await
    }

    async fn document_stats(&self) -> Result<DocumentStats, StatsError> {
        (**self).document_stats().await
    }

    async fn revenue_stats(&self) -> Result<RevenueStats, StatsError> {
        (**self).revenue_stats().await
    }
}

/// Error enumeration for stats provider failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("stats source unavailable: {0}")]
    Unavailable(String),
    #[error("stats query failed: {0}")]
    Query(String),
}
