use crate::stats::{ActivityLedger, StatsWindows};
use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl ReportPeriod {
    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::Daily => "Diario",
            ReportPeriod::Weekly => "Semanal",
            ReportPeriod::Monthly => "Mensual",
        }
    }

    /// Midnight one day, seven days, or one calendar month before `now`.
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = StatsWindows::at(now).today;
        match self {
            ReportPeriod::Daily => today - Duration::days(1),
            ReportPeriod::Weekly => today - Duration::days(7),
            ReportPeriod::Monthly => today
                .checked_sub_months(Months::new(1))
                .unwrap_or(today - Duration::days(30)),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report period '{0}' (expected daily, weekly, or monthly)")]
pub struct UnknownPeriod(pub String);

impl FromStr for ReportPeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            other => Err(UnknownPeriod(other.to_string())),
        }
    }
}

/// Activity summary for one reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDigest {
    pub period: ReportPeriod,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub documents_created: u64,
    pub users_registered: u64,
}

impl ActivityDigest {
    pub fn subject(&self) -> String {
        format!("Reporte {} NotaryPro", self.period)
    }

    pub fn render(&self) -> String {
        format!(
            "Reporte {} de NotaryPro\nDocumentos creados: {}\nUsuarios registrados: {}\nGenerado el {}",
            self.period.label(),
            self.documents_created,
            self.users_registered,
            self.until.format("%Y-%m-%d %H:%M")
        )
    }
}

pub fn build_digest(
    ledger: &ActivityLedger,
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> ActivityDigest {
    let from = period.window_start(now);
    ActivityDigest {
        period,
        from,
        until: now,
        documents_created: ledger.documents_created_since(from),
        users_registered: ledger.users_registered_since(from),
    }
}
