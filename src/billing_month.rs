use chrono::{DateTime, Datelike, TimeZone};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Calendar month a billing report covers. Renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillingMonth {
    pub year: i32,
    pub month: u32,
}

impl<Tz: TimeZone> From<DateTime<Tz>> for BillingMonth {
    fn from(date_time: DateTime<Tz>) -> Self {
        BillingMonth {
            year: date_time.year(),
            month: date_time.month(),
        }
    }
}

impl Display for BillingMonth {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl BillingMonth {
    /// Object key of the monthly billing CSV export for `account_id`.
    pub fn report_key(&self, account_id: &str) -> String {
        format!("{}-aws-billing-csv-{}.csv", account_id, self)
    }
}
