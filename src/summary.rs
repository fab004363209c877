use crate::billing_month::BillingMonth;
use crate::error::BillingNotifierError;
use crate::report::{CostReport, CostRow};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A service with a positive charge. Amounts stay as the report wrote them.
#[derive(Debug, PartialEq)]
pub struct LineItem {
    pub service: String,
    pub total: String,
    pub currency: String,
}

#[derive(Debug, PartialEq)]
pub struct Total {
    pub total: String,
    pub currency: String,
}

#[derive(Debug, PartialEq)]
pub struct BillingSummary {
    pub month: BillingMonth,
    pub items: Vec<LineItem>,
    pub total: Total,
}

impl Display for BillingSummary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} Billing Report", self.month)?;
        for item in &self.items {
            write!(f, "\n{}\t{}\t{}", item.service, item.total, item.currency)?;
        }
        write!(f, "\nSum:\t{}\t{}", self.total.total, self.total.currency)
    }
}

/// Collects the positively charged services up to the totals row.
pub fn summarize(
    month: BillingMonth,
    report: &CostReport,
) -> Result<BillingSummary, BillingNotifierError> {
    let mut items = Vec::new();
    for row in report.rows() {
        let row = row?;
        if row.is_totals() {
            return Ok(BillingSummary {
                month,
                items,
                total: Total {
                    total: row.total.to_string(),
                    currency: row.currency.to_string(),
                },
            });
        }
        if is_charged(&row)? {
            items.push(LineItem {
                service: row.service.to_string(),
                total: row.total.to_string(),
                currency: row.currency.to_string(),
            });
        }
    }
    Err(BillingNotifierError::MissingTotals)
}

fn is_charged(row: &CostRow) -> Result<bool, BillingNotifierError> {
    match row.total.parse::<f64>() {
        Ok(amount) => Ok(amount > 0.0),
        // row 0 holds the column names
        Err(_) if row.index == 0 => Ok(false),
        Err(source) => Err(BillingNotifierError::ParseAmount {
            row: row.index,
            value: row.total.to_string(),
            source,
        }),
    }
}
