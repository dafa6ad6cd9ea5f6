use super::rules::{derive_insights, Insight};
use crate::stats::{DocumentStats, RevenueStats, StatsError, StatsProvider, UserActivityStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Raw aggregates the insights were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightMetrics {
    pub users: UserActivityStats,
    pub documents: DocumentStats,
    pub revenue: RevenueStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicInsightsReport {
    pub generated_at: DateTime<Utc>,
    pub metrics: InsightMetrics,
    pub insights: Vec<Insight>,
}

impl StrategicInsightsReport {
    pub fn from_metrics(metrics: InsightMetrics, generated_at: DateTime<Utc>) -> Self {
        let insights = derive_insights(&metrics.users, &metrics.documents, &metrics.revenue);
        Self {
            generated_at,
            metrics,
            insights,
        }
    }
}

/// Fetches the three aggregates concurrently and derives the report.
///
/// Any provider failure aborts the whole report; no partial metrics are
/// returned.
pub async fn generate_strategic_insights<P>(
    provider: &P,
) -> Result<StrategicInsightsReport, StatsError>
where
    P: StatsProvider + ?Sized,
{
    let (users, documents, revenue) = tokio::try_join!(
        provider.user_activity_stats(),
        provider.document_stats(),
        provider.revenue_stats(),
    )?;

    let report = StrategicInsightsReport::from_metrics(
        InsightMetrics {
            users,
            documents,
            revenue,
        },
        Utc::now(),
    );

    info!(
        insights = report.insights.len(),
        new_users_this_week = report.metrics.users.new_users_this_week,
        pending_documents = report.metrics.documents.pending(),
        "strategic insights generated"
    );

    Ok(report)
}
