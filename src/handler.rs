use crate::billing_month::BillingMonth;
use crate::config::Config;
use crate::error::BillingNotifierError;
use crate::report::CostReport;
use crate::s3_report_client::Fetch;
use crate::summary::summarize;
use crate::webhook_client::Notify;

use chrono::Utc;
use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct ReportEvent {
    #[serde(default)]
    pub name: String,
}

pub(crate) async fn function_handler<F, N>(
    event: LambdaEvent<ReportEvent>,
    config: &Config,
    fetcher: &F,
    notifier: &N,
) -> Result<String, Error>
where
    F: Fetch + Sync,
    N: Notify + Sync,
{
    let (event, context) = event.into_parts();
    info!(request_id = %context.request_id, "Billing report requested");

    let month = BillingMonth::from(Utc::now());
    let remaining = remaining_time(context.deadline, SystemTime::now());
    with_deadline(remaining, report_billing(config, month, fetcher, notifier)).await?;
    Ok(event.name)
}

/// Fetches, summarizes and posts one month's billing report.
pub async fn report_billing<F, N>(
    config: &Config,
    month: BillingMonth,
    fetcher: &F,
    notifier: &N,
) -> Result<(), BillingNotifierError>
where
    F: Fetch + Sync,
    N: Notify + Sync,
{
    let key = month.report_key(&config.account_id);
    let bytes = fetcher.fetch_report(&key).await?;

    let report = CostReport::parse(&bytes)?;
    info!("Parsed {} rows from {}", report.len(), key);

    let summary = summarize(month, &report)?;
    info!("Reporting {} charged services", summary.items.len());

    notifier.notify(&summary.to_string()).await?;
    Ok(())
}

/// Time left before `deadline_ms` (milliseconds since the epoch). Zero means
/// the runtime gave no deadline.
fn remaining_time(deadline_ms: u64, now: SystemTime) -> Option<Duration> {
    if deadline_ms == 0 {
        return None;
    }
    let deadline = UNIX_EPOCH + Duration::from_millis(deadline_ms);
    Some(deadline.duration_since(now).unwrap_or(Duration::ZERO))
}

async fn with_deadline<T>(
    remaining: Option<Duration>,
    future: impl Future<Output = Result<T, BillingNotifierError>>,
) -> Result<T, BillingNotifierError> {
    match remaining {
        Some(remaining) => tokio::time::timeout(remaining, future)
            .await
            .map_err(|_| BillingNotifierError::DeadlineExceeded)?,
        None => future.await,
    }
}
