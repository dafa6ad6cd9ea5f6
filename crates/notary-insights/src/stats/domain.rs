use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document status bucket watched for certifier backlog.
pub const PENDING_STATUS: &str = "pending";

/// Registration counts over the rolling reporting windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivityStats {
    pub total_users: u64,
    pub new_users_today: u64,
    pub new_users_this_week: u64,
    pub new_users_this_month: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub total_documents: u64,
    pub documents_created_today: u64,
    /// Only statuses with at least one document appear here.
    pub documents_by_status: BTreeMap<String, u64>,
}

impl DocumentStats {
    pub fn count_with_status(&self, status: &str) -> u64 {
        self.documents_by_status.get(status).copied().unwrap_or(0)
    }

    pub fn pending(&self) -> u64 {
        self.count_with_status(PENDING_STATUS)
    }
}

/// Completed-payment totals. Amounts are in the platform's billing currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub total_revenue: f64,
    pub revenue_today: f64,
    pub revenue_this_week: f64,
    pub revenue_this_month: f64,
    pub document_revenue: f64,
    pub course_revenue: f64,
    pub video_call_revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Stored values are matched exactly; `Completed` is not `completed`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub status: String,
    pub payment_status: Option<PaymentStatus>,
    pub payment_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// A freshly uploaded, unpaid document awaiting certification.
    pub fn pending(created_at: DateTime<Utc>) -> Self {
        Self {
            status: PENDING_STATUS.to_string(),
            payment_status: None,
            payment_amount: 0.0,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn paid(
        status: &str,
        amount: f64,
        created_at: DateTime<Utc>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: status.to_string(),
            payment_status: Some(PaymentStatus::Completed),
            payment_amount: amount,
            created_at,
            updated_at: paid_at,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == Some(PaymentStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCallRecord {
    pub payment_status: Option<PaymentStatus>,
    pub payment_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoCallRecord {
    pub fn is_paid(&self) -> bool {
        self.payment_status == Some(PaymentStatus::Completed)
    }
}

/// One row of platform activity feeding the stats ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityRecord {
    User(UserRecord),
    Document(DocumentRecord),
    VideoCall(VideoCallRecord),
}
