use crate::infra::{format_timestamp, load_ledger, parse_period};
use chrono::Utc;
use clap::Args;
use notary_insights::error::AppError;
use notary_insights::insights::{generate_strategic_insights, StrategicInsightsReport};
use notary_insights::scheduler::{build_digest, ReportPeriod};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct InsightsReportArgs {
    /// Activity CSV export used to compute the metrics (empty ledger when omitted)
    #[arg(long)]
    ledger_csv: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DigestArgs {
    /// Reporting period: daily, weekly, or monthly
    #[arg(long, value_parser = parse_period, default_value = "daily")]
    period: ReportPeriod,
    /// Activity CSV export to summarize
    #[arg(long)]
    ledger_csv: Option<PathBuf>,
}

pub(crate) async fn run_insights_report(args: InsightsReportArgs) -> Result<(), AppError> {
    let ledger = load_ledger(args.ledger_csv.as_deref())?;
    let report = generate_strategic_insights(&ledger).await?;

    if args.json {
        let body = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{body}");
    } else {
        render_insights_report(&report);
    }

    Ok(())
}

pub(crate) fn run_activity_digest(args: DigestArgs) -> Result<(), AppError> {
    let ledger = load_ledger(args.ledger_csv.as_deref())?;
    let digest = build_digest(&ledger, args.period, Utc::now());

    println!("{}", digest.subject());
    println!(
        "Window: {} -> {}",
        format_timestamp(digest.from),
        format_timestamp(digest.until)
    );
    println!();
    println!("{}", digest.render());

    Ok(())
}

fn render_insights_report(report: &StrategicInsightsReport) {
    let metrics = &report.metrics;

    println!("Strategic insights");
    println!("Generated {}", format_timestamp(report.generated_at));

    println!("\nUsers");
    println!(
        "- {} total, {} new today, {} this week, {} this month",
        metrics.users.total_users,
        metrics.users.new_users_today,
        metrics.users.new_users_this_week,
        metrics.users.new_users_this_month
    );

    println!("\nDocuments");
    println!(
        "- {} total, {} created today",
        metrics.documents.total_documents, metrics.documents.documents_created_today
    );
    if metrics.documents.documents_by_status.is_empty() {
        println!("- no documents by status");
    }
    for (status, count) in &metrics.documents.documents_by_status {
        println!("- {status}: {count}");
    }

    println!("\nRevenue");
    println!(
        "- {:.0} today, {:.0} this week, {:.0} this month ({:.0} total)",
        metrics.revenue.revenue_today,
        metrics.revenue.revenue_this_week,
        metrics.revenue.revenue_this_month,
        metrics.revenue.total_revenue
    );

    println!("\nInsights");
    for insight in &report.insights {
        println!("- {}: {}", insight.title(), insight.description());
    }
}
