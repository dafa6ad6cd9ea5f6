use async_trait::async_trait;
use chrono::{Duration, Utc};
use notary_insights::insights::{generate_strategic_insights, InsightKind};
use notary_insights::stats::{
    ActivityLedger, DocumentRecord, DocumentStats, RevenueStats, StatsError, StatsProvider,
    UserActivityStats, PENDING_STATUS,
};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct FixedStats {
    users: UserActivityStats,
    documents: DocumentStats,
    revenue: RevenueStats,
    failing: Option<&'static str>,
    calls: AtomicUsize,
}

impl FixedStats {
    fn new(new_users_this_week: u64, pending: Option<u64>, week: f64, month: f64) -> Self {
        let mut documents = DocumentStats::default();
        if let Some(count) = pending {
            documents
                .documents_by_status
                .insert(PENDING_STATUS.to_string(), count);
        }

        Self {
            users: UserActivityStats {
                new_users_this_week,
                ..UserActivityStats::default()
            },
            documents,
            revenue: RevenueStats {
                revenue_this_week: week,
                revenue_this_month: month,
                ..RevenueStats::default()
            },
            ..Self::default()
        }
    }

    fn failing_on(mut self, source: &'static str) -> Self {
        self.failing = Some(source);
        self
    }

    fn check(&self, source: &'static str) -> Result<(), StatsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing == Some(source) {
            return Err(StatsError::Query(format!("{source} query timed out")));
        }
        Ok(())
    }
}

#[async_trait]
impl StatsProvider for FixedStats {
    async fn user_activity_stats(&self) -> Result<UserActivityStats, StatsError> {
        self.check("users")?;
        Ok(self.users)
    }

    async fn document_stats(&self) -> Result<DocumentStats, StatsError> {
        self.check("documents")?;
        Ok(self.documents.clone())
    }

    async fn revenue_stats(&self) -> Result<RevenueStats, StatsError> {
        self.check("revenue")?;
        Ok(self.revenue)
    }
}

#[tokio::test]
async fn report_echoes_metrics_and_orders_insights() {
    let provider = FixedStats::new(3, Some(10), 100.0, 350.0);

    let before = Utc::now();
    let report = generate_strategic_insights(&provider)
        .await
        .expect("report builds");
    let after = Utc::now();

    assert!(report.generated_at >= before && report.generated_at <= after);
    assert_eq!(report.metrics.users, provider.users);
    assert_eq!(report.metrics.documents, provider.documents);
    assert_eq!(report.metrics.revenue, provider.revenue);

    let kinds: Vec<_> = report.insights.iter().map(|insight| insight.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::LowAcquisition,
            InsightKind::RevenueBelowProjection
        ]
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn backlog_sits_between_user_and_revenue_insights() {
    let provider = FixedStats::new(12, Some(75), 100.0, 500.0);
    let report = generate_strategic_insights(&provider)
        .await
        .expect("report builds");

    let kinds: Vec<_> = report.insights.iter().map(|insight| insight.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            InsightKind::UserGrowth,
            InsightKind::PendingBacklog,
            InsightKind::RevenueOnTrack
        ]
    );
    assert!(report.insights[0].description().contains("12"));
    assert!(report.insights[1].description().contains("75"));
}

#[tokio::test]
async fn any_failing_source_rejects_the_whole_report() {
    for source in ["users", "documents", "revenue"] {
        let provider = FixedStats::new(10, None, 1.0, 1.0).failing_on(source);
        let err = generate_strategic_insights(&provider)
            .await
            .expect_err("report must fail");
        assert_eq!(err, StatsError::Query(format!("{source} query timed out")));
    }
}

#[tokio::test]
async fn report_serializes_with_dashboard_field_names() {
    let provider = FixedStats::new(8, Some(60), 10.0, 90.0);
    let report = generate_strategic_insights(&provider)
        .await
        .expect("report builds");

    let value = serde_json::to_value(&report).expect("serializes");
    assert!(value["generatedAt"].is_string());
    assert_eq!(value["metrics"]["users"]["newUsersThisWeek"], 8);
    assert_eq!(value["metrics"]["documents"]["documentsByStatus"]["pending"], 60);
    assert_eq!(value["metrics"]["revenue"]["revenueThisMonth"], 90.0);
    assert_eq!(value["insights"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["insights"][1]["title"], "Documentos pendientes");
}

#[tokio::test]
async fn ledger_backs_the_generator() {
    let now = Utc::now();
    let ledger = ActivityLedger::new();
    for _ in 0..6 {
        ledger.record_user(now - Duration::minutes(5));
    }
    for _ in 0..51 {
        ledger.record_document(DocumentRecord::pending(now - Duration::minutes(5)));
    }

    let report = generate_strategic_insights(&ledger)
        .await
        .expect("report builds");
    assert_eq!(report.insights.len(), 3);
    assert_eq!(report.insights[0].kind(), InsightKind::UserGrowth);
    assert_eq!(report.insights[1].kind(), InsightKind::PendingBacklog);
    assert_eq!(report.insights[2].kind(), InsightKind::RevenueOnTrack);

    ledger.mark_unavailable("primary database offline");
    let err = generate_strategic_insights(&ledger)
        .await
        .expect_err("outage propagates");
    assert!(matches!(err, StatsError::Unavailable(_)));
}
