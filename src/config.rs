use crate::error::BillingNotifierError;
use rusoto_core::Region;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const ACCOUNT_ID: &str = "ACCOUNT_ID";
pub const WEBHOOK: &str = "WEBHOOK";
pub const BILLING_BUCKET: &str = "BILLING_BUCKET";
pub const BILLING_REGION: &str = "BILLING_REGION";

const DEFAULT_BUCKET: &str = "kingraint94-billing-reports";
const DEFAULT_REGION: Region = Region::UsEast2;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub account_id: String,
    pub webhook: String,
    pub bucket: String,
    pub region: Region,
}

impl Config {
    pub fn from_env() -> Result<Self, BillingNotifierError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, BillingNotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).unwrap_or_else(|| {
                warn!("{} is not set", name);
                String::new()
            })
        };
        let account_id = required(ACCOUNT_ID);
        let webhook = required(WEBHOOK);

        let bucket = lookup(BILLING_BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
        let region = match lookup(BILLING_REGION) {
            Some(name) => Region::from_str(&name)
                .map_err(|_| BillingNotifierError::InvalidRegion(name))?,
            None => DEFAULT_REGION,
        };

        Ok(Config {
            account_id,
            webhook,
            bucket,
            region,
        })
    }
}
