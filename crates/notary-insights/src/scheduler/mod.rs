//! Periodic activity digests delivered at a fixed time of day.
//!
//! The daily digest fires at the configured minute, the weekly digest joins it
//! on Mondays, and the monthly digest on the first of the month. The task is
//! owned by a [`SchedulerHandle`]; dropping the server should go through
//! [`SchedulerHandle::shutdown`].

mod digest;

pub use digest::{build_digest, ActivityDigest, ReportPeriod, UnknownPeriod};

use crate::config::ReportScheduleConfig;
use crate::stats::ActivityLedger;
use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outbound hook for finished digests (mailer, chat webhook, log).
pub trait DigestPublisher: Send + Sync {
    fn publish(&self, digest: &ActivityDigest) -> Result<(), DigestError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("digest transport unavailable: {0}")]
    Transport(String),
}

/// Writes digests to the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDigestPublisher;

impl DigestPublisher for TracingDigestPublisher {
    fn publish(&self, digest: &ActivityDigest) -> Result<(), DigestError> {
        info!(
            period = %digest.period,
            documents_created = digest.documents_created,
            users_registered = digest.users_registered,
            subject = %digest.subject(),
            "{}",
            digest.render()
        );
        Ok(())
    }
}

/// Periods whose digest is due at `now`, in delivery order.
pub fn due_periods(now: DateTime<Utc>, run_at: NaiveTime) -> Vec<ReportPeriod> {
    if now.hour() != run_at.hour() || now.minute() != run_at.minute() {
        return Vec::new();
    }

    let mut due = vec![ReportPeriod::Daily];
    if now.weekday() == Weekday::Mon {
        due.push(ReportPeriod::Weekly);
    }
    if now.day() == 1 {
        due.push(ReportPeriod::Monthly);
    }
    due
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Running scheduler task and the token that stops it.
#[derive(Debug)]
pub struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "report scheduler task ended abnormally");
        }
    }
}

pub fn spawn_report_scheduler<P>(
    ledger: ActivityLedger,
    publisher: Arc<P>,
    config: ReportScheduleConfig,
) -> SchedulerHandle
where
    P: DigestPublisher + 'static,
{
    spawn_report_scheduler_with_clock(ledger, publisher, config, Arc::new(Utc::now))
}

pub fn spawn_report_scheduler_with_clock<P>(
    ledger: ActivityLedger,
    publisher: Arc<P>,
    config: ReportScheduleConfig,
    clock: Clock,
) -> SchedulerHandle
where
    P: DigestPublisher + 'static,
{
    let token = CancellationToken::new();
    let task = tokio::spawn(run_scheduler(
        ledger,
        publisher,
        config,
        clock,
        token.clone(),
    ));

    info!(run_at = %config.run_at, tick = ?config.tick, "report scheduler started");
    SchedulerHandle { token, task }
}

async fn run_scheduler<P>(
    ledger: ActivityLedger,
    publisher: Arc<P>,
    config: ReportScheduleConfig,
    clock: Clock,
    token: CancellationToken,
) where
    P: DigestPublisher + 'static,
{
    let mut ticker = tokio::time::interval(config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_slot: Option<NaiveDateTime> = None;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                info!("report scheduler stopped");
                break;
            }
            _ = ticker.tick() => {
                let now = clock();
                let slot = now
                    .date_naive()
                    .and_hms_opt(now.hour(), now.minute(), 0);
                if slot.is_some() && slot == last_slot {
                    continue;
                }

                let due = due_periods(now, config.run_at);
                if due.is_empty() {
                    continue;
                }
                last_slot = slot;

                for period in due {
                    let digest = build_digest(&ledger, period, now);
                    debug!(%period, "publishing activity digest");
                    if let Err(err) = publisher.publish(&digest) {
                        warn!(%period, error = %err, "activity digest not delivered");
                    }
                }
            }
        }
    }
}
