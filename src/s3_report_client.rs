use crate::error::BillingNotifierError;
use async_trait::async_trait;

use rusoto_core::Region;
use rusoto_s3::{GetObjectRequest, S3Client, S3};
use tokio::io::AsyncReadExt;
use tracing::info;

pub struct S3ReportClient {
    client: S3Client,
    bucket: String,
}

#[async_trait]
pub trait Fetch {
    async fn fetch_report(&self, key: &str) -> Result<Vec<u8>, BillingNotifierError>;
}

#[async_trait]
impl Fetch for S3ReportClient {
    async fn fetch_report(&self, key: &str) -> Result<Vec<u8>, BillingNotifierError> {
        info!("Start fetching billing report s3://{}/{}", self.bucket, key);
        let output = self
            .client
            .get_object(GetObjectRequest {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                ..Default::default()
            })
            .await?;

        let body = output
            .body
            .ok_or_else(|| BillingNotifierError::MissingBody(key.to_string()))?;
        let mut bytes = Vec::new();
        body.into_async_read().read_to_end(&mut bytes).await?;
        info!("Fetched {} bytes of billing report", bytes.len());
        Ok(bytes)
    }
}

impl S3ReportClient {
    pub fn new(region: Region, bucket: String) -> Self {
        Self::new_with_client(S3Client::new(region), bucket)
    }

    fn new_with_client(client: S3Client, bucket: String) -> Self {
        S3ReportClient { client, bucket }
    }
}
