mod billing_month;
mod config;
mod error;
mod handler;
mod report;
mod s3_report_client;
mod summary;
mod webhook_client;

use config::Config;
use handler::function_handler;
use lambda_runtime::{run, service_fn, Error};
use reqwest::Client;
use s3_report_client::S3ReportClient;
use tracing_subscriber::{fmt, EnvFilter};
use webhook_client::WebhookClient;

#[tokio::main]
async fn main() -> Result<(), Error> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // CloudWatch stamps every line on ingestion.
        .without_time()
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    let fetcher = S3ReportClient::new(config.region.clone(), config.bucket.clone());
    let notifier = WebhookClient::new(Client::new(), config.webhook.clone());

    run(service_fn(|event| function_handler(event, &config, &fetcher, &notifier))).await
}
