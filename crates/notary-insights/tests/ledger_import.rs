use chrono::{TimeZone, Utc};
use notary_insights::stats::{LedgerImportError, LedgerImporter};

const EXPORT: &str = "kind,created_at,updated_at,status,payment_status,amount\n\
user,2025-03-11T10:00:00Z,,,,\n\
user,2025-02-01,,,,\n\
document,2025-03-10T09:00:00Z,2025-03-12T09:30:00Z,signed,completed,15000\n\
document,2025-03-12T07:00:00Z,,pending,,\n\
document,2025-03-12T07:30:00Z,,Pending,pending,8000\n\
video_call,2025-03-11T16:00:00Z,,,completed,5000\n";

#[test]
fn importer_builds_ledger_from_export() {
    let ledger = LedgerImporter::from_reader(EXPORT.as_bytes()).expect("import succeeds");
    assert_eq!(ledger.len(), 6);

    let now = Utc
        .with_ymd_and_hms(2025, 3, 12, 18, 0, 0)
        .single()
        .expect("valid timestamp");

    let users = ledger.user_activity_at(now);
    assert_eq!(users.total_users, 2);
    assert_eq!(users.new_users_this_week, 1);

    let documents = ledger.document_stats_at(now);
    assert_eq!(documents.total_documents, 3);
    assert_eq!(documents.documents_created_today, 2);
    assert_eq!(documents.pending(), 1);
    assert_eq!(documents.count_with_status("Pending"), 1);
    assert_eq!(documents.count_with_status("signed"), 1);

    let revenue = ledger.revenue_stats_at(now);
    assert_eq!(revenue.document_revenue, 15000.0);
    assert_eq!(revenue.video_call_revenue, 5000.0);
    assert_eq!(revenue.total_revenue, 20000.0);
    assert_eq!(revenue.revenue_today, 15000.0);
}

#[test]
fn importer_rejects_unknown_kinds_with_row_number() {
    let csv = "kind,created_at,updated_at,status,payment_status,amount\n\
user,2025-03-11,,,,\n\
course,2025-03-11,,,completed,100\n";

    let err = LedgerImporter::from_reader(csv.as_bytes()).expect_err("import fails");
    match err {
        LedgerImportError::InvalidRow { row, reason } => {
            assert_eq!(row, 2);
            assert!(reason.contains("course"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn importer_only_accepts_stored_payment_statuses() {
    let csv = "kind,created_at,updated_at,status,payment_status,amount\n\
document,2025-03-11,,signed,paid,100\n";

    let err = LedgerImporter::from_reader(csv.as_bytes()).expect_err("import fails");
    match err {
        LedgerImportError::InvalidRow { row, reason } => {
            assert_eq!(row, 1);
            assert!(reason.contains("unknown payment status 'paid'"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn importer_rejects_unparsable_timestamps() {
    let csv = "kind,created_at,updated_at,status,payment_status,amount\n\
document,last tuesday,,pending,,\n";

    let err = LedgerImporter::from_reader(csv.as_bytes()).expect_err("import fails");
    assert!(err.to_string().contains("activity row 1"));
    assert!(err.to_string().contains("last tuesday"));
}

#[test]
fn importer_reports_missing_files() {
    let err = LedgerImporter::from_path("does/not/exist.csv").expect_err("missing file");
    assert!(matches!(err, LedgerImportError::Io(_)));
}
