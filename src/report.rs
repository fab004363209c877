use crate::error::BillingNotifierError;
use csv::{ReaderBuilder, StringRecord};

pub const SERVICE_COLUMN: usize = 13;
pub const CURRENCY_COLUMN: usize = 23;
pub const TOTAL_COLUMN: usize = 28;

pub const MIN_ROW_WIDTH: usize = TOTAL_COLUMN + 1;

/// Rows of an AWS billing CSV export, in file order. Row 0 is the column header.
#[derive(Debug)]
pub struct CostReport {
    records: Vec<StringRecord>,
}

/// The positional fields of one report row.
#[derive(Debug, PartialEq)]
pub struct CostRow<'a> {
    pub index: usize,
    pub service: &'a str,
    pub currency: &'a str,
    pub total: &'a str,
}

impl CostRow<'_> {
    /// The totals row is the only one without a service name.
    pub fn is_totals(&self) -> bool {
        self.service.is_empty()
    }
}

impl CostReport {
    pub fn parse(bytes: &[u8]) -> Result<Self, BillingNotifierError> {
        check_quoting(bytes)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let records = reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        Ok(CostReport { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Width is checked per row as it is yielded, so rows past the point where
    /// a caller stops iterating are never inspected.
    pub fn rows(&self) -> impl Iterator<Item = Result<CostRow<'_>, BillingNotifierError>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| cost_row(index, record))
    }
}

#[derive(Clone, Copy)]
enum Quoting {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
    Closed,
}

/// Rejects what the csv reader silently accepts: a quote inside an unquoted
/// field, text after a closing quote, and a quoted field left open at the end.
fn check_quoting(bytes: &[u8]) -> Result<(), BillingNotifierError> {
    let mut line = 1;
    let mut state = Quoting::FieldStart;
    for &byte in bytes {
        state = match (state, byte) {
            (Quoting::Quoted, b'"') => Quoting::QuoteInQuoted,
            (Quoting::Quoted, _) => Quoting::Quoted,
            (Quoting::FieldStart, b'"') | (Quoting::QuoteInQuoted, b'"') => Quoting::Quoted,
            (Quoting::Unquoted, b'"') => return Err(BillingNotifierError::MalformedQuoting { line }),
            (_, b',') | (_, b'\n') => Quoting::FieldStart,
            (Quoting::QuoteInQuoted, b'\r') | (Quoting::Closed, b'\r') => Quoting::Closed,
            (Quoting::QuoteInQuoted, _) | (Quoting::Closed, _) => {
                return Err(BillingNotifierError::MalformedQuoting { line })
            }
            (Quoting::FieldStart, _) | (Quoting::Unquoted, _) => Quoting::Unquoted,
        };
        if byte == b'\n' {
            line += 1;
        }
    }
    match state {
        Quoting::Quoted => Err(BillingNotifierError::MalformedQuoting { line }),
        _ => Ok(()),
    }
}

fn cost_row(index: usize, record: &StringRecord) -> Result<CostRow<'_>, BillingNotifierError> {
    let field = move |column: usize| {
        record.get(column).ok_or(BillingNotifierError::ShortRow {
            row: index,
            width: record.len(),
        })
    };
    Ok(CostRow {
        index,
        service: field(SERVICE_COLUMN)?,
        currency: field(CURRENCY_COLUMN)?,
        total: field(TOTAL_COLUMN)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::error::BillingNotifierError;
    use crate::report::{CostReport, CostRow, CURRENCY_COLUMN, MIN_ROW_WIDTH, SERVICE_COLUMN, TOTAL_COLUMN};

    /// Builds one CSV line with the given service, currency and total columns.
    pub(crate) fn csv_line(service: &str, total: &str, currency: &str) -> String {
        let mut fields = vec![String::new(); MIN_ROW_WIDTH];
        fields[SERVICE_COLUMN] = service.to_string();
        fields[CURRENCY_COLUMN] = currency.to_string();
        fields[TOTAL_COLUMN] = total.to_string();
        fields.join(",")
    }

    #[test]
    fn test_parse_keeps_row_order() {
        let csv = [
            csv_line("ProductName", "TotalCost", "CurrencyCode"),
            csv_line("Amazon Elastic Compute Cloud", "45.00", "USD"),
            csv_line("", "50.00", "USD"),
        ]
        .join("\n");

        let report = CostReport::parse(csv.as_bytes()).unwrap();
        let rows = report.rows().collect::<Result<Vec<_>, _>>().unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(
            rows[1],
            CostRow {
                index: 1,
                service: "Amazon Elastic Compute Cloud",
                currency: "USD",
                total: "45.00",
            }
        );
        assert!(!rows[0].is_totals());
        assert!(rows[2].is_totals());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let mut fields = vec!["\"\"".to_string(); MIN_ROW_WIDTH];
        fields[SERVICE_COLUMN] = "\"AWS Key Management Service, \"\"KMS\"\"\"".to_string();
        fields[TOTAL_COLUMN] = "\"1.25\"".to_string();
        fields[CURRENCY_COLUMN] = "USD".to_string();

        let report = CostReport::parse(fields.join(",").as_bytes()).unwrap();
        let row = report.rows().next().unwrap().unwrap();

        assert_eq!(row.service, "AWS Key Management Service, \"KMS\"");
        assert_eq!(row.total, "1.25");
    }

    #[test]
    fn test_short_row() {
        let csv = format!("{}\na,b,c", csv_line("ProductName", "TotalCost", "CurrencyCode"));

        let report = CostReport::parse(csv.as_bytes()).unwrap();
        let mut rows = report.rows();

        assert!(rows.next().unwrap().is_ok());
        match rows.next().unwrap() {
            Err(BillingNotifierError::ShortRow { row, width }) => {
                assert_eq!(row, 1);
                assert_eq!(width, 3);
            }
            other => panic!("unexpected row {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_quote() {
        let csv = [
            csv_line("ProductName", "TotalCost", "CurrencyCode"),
            csv_line("EC2", "45.00", "USD"),
            csv_line("", "45.00", "USD"),
            "a,\"unterminated".to_string(),
        ]
        .join("\n");

        let result = CostReport::parse(csv.as_bytes());

        assert!(matches!(
            result,
            Err(BillingNotifierError::MalformedQuoting { line: 4 })
        ));
    }

    #[test]
    fn test_bare_quote_in_unquoted_field() {
        let csv = format!("{}\nx,a\"b", csv_line("ProductName", "TotalCost", "CurrencyCode"));

        let result = CostReport::parse(csv.as_bytes());

        assert!(matches!(
            result,
            Err(BillingNotifierError::MalformedQuoting { line: 2 })
        ));
    }

    #[test]
    fn test_text_after_closing_quote() {
        let result = CostReport::parse(b"\"EC2\"x,1\n");

        assert!(matches!(
            result,
            Err(BillingNotifierError::MalformedQuoting { line: 1 })
        ));
    }

    #[test]
    fn test_quoted_newline_and_crlf() {
        let mut fields = vec!["\"\"".to_string(); MIN_ROW_WIDTH];
        fields[SERVICE_COLUMN] = "\"Amazon\nCloudFront\"".to_string();
        fields[TOTAL_COLUMN] = "\"2.00\"".to_string();
        let csv = format!("{}\r\n{}\r\n", fields.join(","), csv_line("", "2.00", "USD"));

        let report = CostReport::parse(csv.as_bytes()).unwrap();
        let row = report.rows().next().unwrap().unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(row.service, "Amazon\nCloudFront");
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let mut bytes = csv_line("ProductName", "TotalCost", "CurrencyCode").into_bytes();
        bytes.extend_from_slice(b"\n\xff\xfe,1,2");

        let result = CostReport::parse(&bytes);

        assert!(matches!(result, Err(BillingNotifierError::Decode(_))));
    }
}
