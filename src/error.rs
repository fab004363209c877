use std::error::Error;

use rusoto_core::RusotoError;
use rusoto_s3::GetObjectError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::num::ParseFloatError;

#[derive(Debug)]
pub enum BillingNotifierError {
    InvalidRegion(String),
    Retrieval(RusotoError<GetObjectError>),
    MissingBody(String),
    ReadBody(std::io::Error),
    Decode(csv::Error),
    MalformedQuoting {
        line: usize,
    },
    ShortRow {
        row: usize,
        width: usize,
    },
    ParseAmount {
        row: usize,
        value: String,
        source: ParseFloatError,
    },
    MissingTotals,
    Serialize(serde_json::Error),
    Transport(reqwest::Error),
    DeadlineExceeded,
}

impl Display for BillingNotifierError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BillingNotifierError::InvalidRegion(ref name) => {
                write!(f, "Unknown AWS region {:?}", name)
            }
            BillingNotifierError::Retrieval(ref error) => {
                write!(f, "Failed to fetch billing report: {}", error)
            }
            BillingNotifierError::MissingBody(ref key) => {
                write!(f, "Billing report {} has no body", key)
            }
            BillingNotifierError::ReadBody(ref error) => {
                write!(f, "Failed to read billing report body: {}", error)
            }
            BillingNotifierError::Decode(ref error) => {
                write!(f, "Failed to decode billing report: {}", error)
            }
            BillingNotifierError::MalformedQuoting { line } => {
                write!(f, "Billing report has malformed quoting on line {}", line)
            }
            BillingNotifierError::ShortRow { row, width } => write!(
                f,
                "Billing report row {} has {} fields, at least {} required",
                row,
                width,
                crate::report::MIN_ROW_WIDTH
            ),
            BillingNotifierError::ParseAmount {
                row,
                ref value,
                ref source,
            } => write!(
                f,
                "Billing report row {} has invalid total {:?}: {}",
                row, value, source
            ),
            BillingNotifierError::MissingTotals => {
                write!(f, "Billing report has no totals row")
            }
            BillingNotifierError::Serialize(ref error) => {
                write!(f, "Failed to serialize webhook payload: {}", error)
            }
            BillingNotifierError::Transport(ref error) => {
                write!(f, "Failed to deliver webhook: {}", error)
            }
            BillingNotifierError::DeadlineExceeded => {
                write!(f, "Invocation deadline exceeded")
            }
        }
    }
}

impl Error for BillingNotifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            BillingNotifierError::Retrieval(ref error) => Some(error),
            BillingNotifierError::ReadBody(ref error) => Some(error),
            BillingNotifierError::Decode(ref error) => Some(error),
            BillingNotifierError::ParseAmount { ref source, .. } => Some(source),
            BillingNotifierError::Serialize(ref error) => Some(error),
            BillingNotifierError::Transport(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<GetObjectError>> for BillingNotifierError {
    fn from(e: RusotoError<GetObjectError>) -> BillingNotifierError {
        BillingNotifierError::Retrieval(e)
    }
}

impl From<std::io::Error> for BillingNotifierError {
    fn from(e: std::io::Error) -> BillingNotifierError {
        BillingNotifierError::ReadBody(e)
    }
}

impl From<csv::Error> for BillingNotifierError {
    fn from(e: csv::Error) -> BillingNotifierError {
        BillingNotifierError::Decode(e)
    }
}

impl From<serde_json::Error> for BillingNotifierError {
    fn from(e: serde_json::Error) -> BillingNotifierError {
        BillingNotifierError::Serialize(e)
    }
}

impl From<reqwest::Error> for BillingNotifierError {
    fn from(e: reqwest::Error) -> BillingNotifierError {
        BillingNotifierError::Transport(e)
    }
}
