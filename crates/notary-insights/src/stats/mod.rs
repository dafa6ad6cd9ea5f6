//! Platform activity aggregates: the stats collaborator contract and the
//! in-memory ledger that implements it.

pub mod domain;
pub mod import;
pub mod ledger;
pub mod provider;

pub use domain::{
    ActivityRecord, DocumentRecord, DocumentStats, PaymentStatus, RevenueStats,
    UserActivityStats, UserRecord, VideoCallRecord, PENDING_STATUS,
};
pub use import::{LedgerImportError, LedgerImporter};
pub use ledger::{ActivityLedger, StatsWindows};
pub use provider::{StatsError, StatsProvider};
