use crate::report::{run_activity_digest, run_insights_report, DigestArgs, InsightsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use notary_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "NotaryPro Strategic Insights",
    about = "Serve and inspect strategic insights for the notarization platform",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate the strategic insights report from the command line
    Insights {
        #[command(subcommand)]
        command: InsightsCommand,
    },
    /// Summarize platform activity for a reporting period
    Activity {
        #[command(subcommand)]
        command: ActivityCommand,
    },
}

#[derive(Subcommand, Debug)]
enum InsightsCommand {
    /// Print the current insights and the metrics behind them
    Report(InsightsReportArgs),
}

#[derive(Subcommand, Debug)]
enum ActivityCommand {
    /// Print the daily, weekly, or monthly activity digest
    Digest(DigestArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Insights {
            command: InsightsCommand::Report(args),
        } => run_insights_report(args).await,
        Command::Activity {
            command: ActivityCommand::Digest(args),
        } => run_activity_digest(args),
    }
}
