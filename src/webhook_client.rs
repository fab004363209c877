use crate::error::BillingNotifierError;
use async_trait::async_trait;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

const MESSAGE_TYPE: &str = "mrkdwn";

#[derive(Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

/// What the webhook answered. Only kept for logging.
#[derive(Debug, PartialEq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

pub struct WebhookClient {
    client: Client,
    url: String,
}

#[async_trait]
pub trait Notify {
    async fn notify(&self, message: &str) -> Result<WebhookResponse, BillingNotifierError>;
}

#[async_trait]
impl Notify for WebhookClient {
    /// Any HTTP status counts as delivered; only transport failures are errors.
    async fn notify(&self, message: &str) -> Result<WebhookResponse, BillingNotifierError> {
        let payload = serde_json::to_vec(&WebhookPayload {
            kind: MESSAGE_TYPE,
            text: message,
        })?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            info!(status = status.as_u16(), body = %body, "Webhook delivered");
        } else {
            warn!(status = status.as_u16(), body = %body, "Webhook answered with an error status");
        }
        Ok(WebhookResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl WebhookClient {
    pub fn new(client: Client, url: String) -> Self {
        WebhookClient { client, url }
    }
}
