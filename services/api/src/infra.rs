use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use notary_insights::config::OperatingMode;
use notary_insights::error::AppError;
use notary_insights::scheduler::ReportPeriod;
use notary_insights::stats::{ActivityLedger, LedgerImporter, StatsProvider};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) mode: OperatingMode,
    pub(crate) stats: Arc<dyn StatsProvider>,
}

/// Opens the activity ledger, hydrating it from a CSV export when one is given.
pub(crate) fn load_ledger(path: Option<&Path>) -> Result<ActivityLedger, AppError> {
    match path {
        Some(path) => {
            let ledger = LedgerImporter::from_path(path)?;
            info!(path = %path.display(), records = ledger.len(), "activity ledger imported");
            Ok(ledger)
        }
        None => Ok(ActivityLedger::new()),
    }
}

pub(crate) fn parse_period(raw: &str) -> Result<ReportPeriod, String> {
    raw.parse::<ReportPeriod>().map_err(|err| err.to_string())
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
