use super::domain::{
    ActivityRecord, DocumentRecord, PaymentStatus, UserRecord, VideoCallRecord, PENDING_STATUS,
};
use super::ledger::ActivityLedger;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum LedgerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, reason: String },
}

impl std::fmt::Display for LedgerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerImportError::Io(err) => write!(f, "failed to read activity export: {}", err),
            LedgerImportError::Csv(err) => write!(f, "invalid activity CSV data: {}", err),
            LedgerImportError::InvalidRow { row, reason } => {
                write!(f, "activity row {}: {}", row, reason)
            }
        }
    }
}

impl std::error::Error for LedgerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerImportError::Io(err) => Some(err),
            LedgerImportError::Csv(err) => Some(err),
            LedgerImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for LedgerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads platform activity exports
/// (`kind,created_at,updated_at,status,payment_status,amount`) into a ledger.
pub struct LedgerImporter;

impl LedgerImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ActivityLedger, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ActivityLedger, LedgerImportError> {
        let records = parse_records(reader)?;
        Ok(ActivityLedger::from_records(records))
    }
}

pub fn parse_records<R: Read>(reader: R) -> Result<Vec<ActivityRecord>, LedgerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<ActivityRow>().enumerate() {
        let row = row?;
        let record = row
            .into_record()
            .map_err(|reason| LedgerImportError::InvalidRow {
                row: index + 1,
                reason,
            })?;
        records.push(record);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    kind: String,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    updated_at: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    payment_status: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
}

impl ActivityRow {
    fn into_record(self) -> Result<ActivityRecord, String> {
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("unparsable created_at '{}'", self.created_at))?;
        let updated_at = match self.updated_at.as_deref() {
            Some(raw) => {
                parse_timestamp(raw).ok_or_else(|| format!("unparsable updated_at '{raw}'"))?
            }
            None => created_at,
        };
        let payment_status = match self.payment_status.as_deref() {
            Some(raw) => Some(
                PaymentStatus::parse(raw)
                    .ok_or_else(|| format!("unknown payment status '{raw}'"))?,
            ),
            None => None,
        };
        let payment_amount = self.amount.unwrap_or(0.0);

        match self.kind.to_ascii_lowercase().as_str() {
            "user" => Ok(ActivityRecord::User(UserRecord { created_at })),
            "document" => Ok(ActivityRecord::Document(DocumentRecord {
                status: self.status.unwrap_or_else(|| PENDING_STATUS.to_string()),
                payment_status,
                payment_amount,
                created_at,
                updated_at,
            })),
            "video_call" | "videocall" => Ok(ActivityRecord::VideoCall(VideoCallRecord {
                payment_status,
                payment_amount,
                created_at,
                updated_at,
            })),
            other => Err(format!("unknown record kind '{other}'")),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
