use super::domain::{
    ActivityRecord, DocumentRecord, DocumentStats, RevenueStats, UserActivityStats, UserRecord,
    VideoCallRecord,
};
use super::provider::{StatsError, StatsProvider};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Reporting window boundaries relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub today: DateTime<Utc>,
    pub week_start: DateTime<Utc>,
    pub month_start: DateTime<Utc>,
}

impl StatsWindows {
    pub fn at(now: DateTime<Utc>) -> Self {
        let date = now.date_naive();
        let today = date.and_time(NaiveTime::MIN).and_utc();
        let month_start = date
            .with_day(1)
            .unwrap_or(date)
            .and_time(NaiveTime::MIN)
            .and_utc();

        Self {
            today,
            week_start: today - Duration::days(7),
            month_start,
        }
    }
}

#[derive(Debug, Default)]
struct LedgerState {
    users: Vec<UserRecord>,
    documents: Vec<DocumentRecord>,
    video_calls: Vec<VideoCallRecord>,
    outage: Option<String>,
}

impl LedgerState {
    fn push(&mut self, record: ActivityRecord) {
        match record {
            ActivityRecord::User(user) => self.users.push(user),
            ActivityRecord::Document(document) => self.documents.push(document),
            ActivityRecord::VideoCall(call) => self.video_calls.push(call),
        }
    }
}

/// In-memory activity store that answers the platform stats queries.
///
/// Clones share the same records.
#[derive(Debug, Default, Clone)]
pub struct ActivityLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let ledger = Self::new();
        ledger.extend(records);
        ledger
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, record: ActivityRecord) {
        self.write().push(record);
    }

    pub fn extend<I>(&self, records: I)
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let mut state = self.write();
        for record in records {
            state.push(record);
        }
    }

    pub fn record_user(&self, created_at: DateTime<Utc>) {
        self.record(ActivityRecord::User(UserRecord { created_at }));
    }

    pub fn record_document(&self, document: DocumentRecord) {
        self.record(ActivityRecord::Document(document));
    }

    pub fn record_video_call(&self, call: VideoCallRecord) {
        self.record(ActivityRecord::VideoCall(call));
    }

    pub fn len(&self) -> usize {
        let state = self.read();
        state.users.len() + state.documents.len() + state.video_calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every stats read fails until [`ActivityLedger::restore`] is called.
    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        self.write().outage = Some(reason.into());
    }

    pub fn restore(&self) {
        self.write().outage = None;
    }

    fn ensure_available(&self) -> Result<(), StatsError> {
        match &self.read().outage {
            Some(reason) => Err(StatsError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    pub fn user_activity_at(&self, now: DateTime<Utc>) -> UserActivityStats {
        let windows = StatsWindows::at(now);
        let state = self.read();
        let since = |start: DateTime<Utc>| {
            state
                .users
                .iter()
                .filter(|user| user.created_at >= start)
                .count() as u64
        };

        UserActivityStats {
            total_users: state.users.len() as u64,
            new_users_today: since(windows.today),
            new_users_this_week: since(windows.week_start),
            new_users_this_month: since(windows.month_start),
        }
    }

    pub fn document_stats_at(&self, now: DateTime<Utc>) -> DocumentStats {
        let windows = StatsWindows::at(now);
        let state = self.read();

        let mut documents_by_status = BTreeMap::new();
        for document in &state.documents {
            if document.status.is_empty() {
                continue;
            }
            *documents_by_status
                .entry(document.status.clone())
                .or_insert(0) += 1;
        }

        DocumentStats {
            total_documents: state.documents.len() as u64,
            documents_created_today: state
                .documents
                .iter()
                .filter(|document| document.created_at >= windows.today)
                .count() as u64,
            documents_by_status,
        }
    }

    pub fn revenue_stats_at(&self, now: DateTime<Utc>) -> RevenueStats {
        let windows = StatsWindows::at(now);
        let state = self.read();

        let paid_documents = || state.documents.iter().filter(|document| document.is_paid());
        let paid_since = |start: DateTime<Utc>| -> f64 {
            paid_documents()
                .filter(|document| document.updated_at >= start)
                .map(|document| document.payment_amount)
                .sum()
        };

        let document_revenue: f64 = paid_documents().map(|doc| doc.payment_amount).sum();
        let video_call_revenue: f64 = state
            .video_calls
            .iter()
            .filter(|call| call.is_paid())
            .map(|call| call.payment_amount)
            .sum();
        // No course sales are recorded yet.
        let course_revenue = 0.0;

        RevenueStats {
            total_revenue: document_revenue + course_revenue + video_call_revenue,
            revenue_today: paid_since(windows.today),
            revenue_this_week: paid_since(windows.week_start),
            revenue_this_month: paid_since(windows.month_start),
            document_revenue,
            course_revenue,
            video_call_revenue,
        }
    }

    pub fn documents_created_since(&self, from: DateTime<Utc>) -> u64 {
        self.read()
            .documents
            .iter()
            .filter(|document| document.created_at >= from)
            .count() as u64
    }

    pub fn users_registered_since(&self, from: DateTime<Utc>) -> u64 {
        self.read()
            .users
            .iter()
            .filter(|user| user.created_at >= from)
            .count() as u64
    }
}

#[async_trait]
impl StatsProvider for ActivityLedger {
    async fn user_activity_stats(&self) -> Result<UserActivityStats, StatsError> {
        self.ensure_available()?;
        let stats = self.user_activity_at(Utc::now());
        debug!(new_users_this_week = stats.new_users_this_week, "computed user activity");
        Ok(stats)
    }

    async fn document_stats(&self) -> Result<DocumentStats, StatsError> {
        self.ensure_available()?;
        let stats = self.document_stats_at(Utc::now());
        debug!(total_documents = stats.total_documents, "computed document stats");
        Ok(stats)
    }

    async fn revenue_stats(&self) -> Result<RevenueStats, StatsError> {
        self.ensure_available()?;
        let stats = self.revenue_stats_at(Utc::now());
        debug!(revenue_this_month = stats.revenue_this_month, "computed revenue stats");
        Ok(stats)
    }
}
