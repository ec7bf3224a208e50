use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{decode, Row, Source};
use crate::error::Result;

static NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)").unwrap()
});

/// Reads the longest numeric prefix of a field. Fields without one, and
/// values that come out as zero or NaN, are zero.
pub fn parse_number(field: &str) -> f64 {
    let field = field.trim_start();

    let num = match NUMBER_PREFIX.find(field) {
        Some(m) => {
            let digits = m.as_str();

            if digits.ends_with("Infinity") {
                if digits.starts_with('-') {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            } else {
                digits.parse().unwrap_or(0.0)
            }
        }
        None => 0.0,
    };

    if num.is_nan() || num == 0.0 {
        0.0
    } else {
        num
    }
}

/// One order or shipment line of the sales sheet.
///
/// Dates are kept exactly as the sheet writes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub status: String,
    pub fy: String,
    pub stuffing_date: String,
    pub stuffing_month: String,
    pub etd_sob: String,
    pub eta: String,
    pub order_number: String,
    pub commercial_invoice_no: String,
    pub product_code: String,
    pub category: String,
    pub segment: String,
    pub product: String,
    pub image_link: String,
    pub client: String,
    pub country: String,
    pub qty: f64,
    pub unit_price: f64,
    pub export_value: f64,
    pub month: String,
    pub order_forwarding_date: String,
    pub fob_price: f64,
    pub moq: f64,
    pub logo_image: String,
}

impl Record {
    /// Maps a decoded row by position. Missing fields are empty or zero.
    pub fn from_row(row: &Row) -> Record {
        let text = |i: usize| row.get(i).unwrap_or("").to_string();
        let number = |i: usize| parse_number(row.get(i).unwrap_or(""));

        Record {
            status: text(0),
            fy: text(1),
            stuffing_date: text(2),
            stuffing_month: text(3),
            etd_sob: text(4),
            eta: text(5),
            order_number: text(6),
            commercial_invoice_no: text(7),
            product_code: text(8),
            category: text(9),
            segment: text(10),
            product: text(11),
            image_link: text(12),
            client: text(13),
            country: text(14),
            qty: number(15),
            unit_price: number(16),
            export_value: number(17),
            month: text(18),
            order_forwarding_date: text(19),
            fob_price: number(20),
            moq: number(21),
            logo_image: text(22),
        }
    }
}

/// Maps every row but the header.
pub fn records_from_table(rows: &[Row]) -> Vec<Record> {
    rows.iter().skip(1).map(Record::from_row).collect()
}

/// Fetches the orders document and maps it into records.
pub fn load_records(source: &dyn Source) -> Result<Vec<Record>> {
    let text = source.fetch()?;
    let records = records_from_table(&decode(&text));

    debug!(source = %source.describe(), records = records.len(), "loaded records");

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{load_records, parse_number, records_from_table, Record};
    use crate::{decode, mock::MockSource, Row};

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number("  -3.5"), -3.5);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("12.5 kg"), 12.5);
        assert_eq!(parse_number("1,200"), 1.0);
        assert_eq!(parse_number("2e3"), 2000.0);
        assert_eq!(parse_number("7e"), 7.0);
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_number_garbage_is_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("$12"), 0.0);
        assert_eq!(parse_number("N/A"), 0.0);
        assert_eq!(parse_number("-0"), 0.0);
        assert!(parse_number("-0").is_sign_positive());
    }

    #[test]
    fn test_full_row() {
        let mut fields: Vec<String> = (0..23).map(|i| format!("f{}", i)).collect();
        fields[15] = "3".to_string();
        fields[16] = "2.5".to_string();
        fields[17] = "7.5".to_string();
        fields[20] = "1.25".to_string();
        fields[21] = "100".to_string();

        let record = Record::from_row(&Row::from(fields));

        assert_eq!(record.status, "f0");
        assert_eq!(record.product_code, "f8");
        assert_eq!(record.product, "f11");
        assert_eq!(record.client, "f13");
        assert_eq!(record.qty, 3.0);
        assert_eq!(record.unit_price, 2.5);
        assert_eq!(record.export_value, 7.5);
        assert_eq!(record.month, "f18");
        assert_eq!(record.fob_price, 1.25);
        assert_eq!(record.moq, 100.0);
        assert_eq!(record.logo_image, "f22");
    }

    #[test]
    fn test_short_row_defaults() {
        let record = Record::from_row(&Row::from(vec!["shipped", "FY24"]));

        assert_eq!(record.status, "shipped");
        assert_eq!(record.fy, "FY24");
        assert_eq!(record.product, "");
        assert_eq!(record.export_value, 0.0);
        assert_eq!(Record::from_row(&Row::new()), Record::default());
    }

    #[test]
    fn test_header_is_skipped() {
        let rows = decode("status,fy\nshipped,FY24\nopen,FY25\n");
        let records = records_from_table(&rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, "shipped");
        assert_eq!(records[1].fy, "FY25");
    }

    #[test]
    fn test_load_records() {
        let source = MockSource::new(vec![Some(
            include_str!("../test/assets/orders.csv").to_string(),
        )]);

        let records = load_records(&source).unwrap();

        assert_eq!(records.len(), 6);
        assert_eq!(records[0].product, "Widget A");
        assert_eq!(records[0].product_code, "WA-01");
        assert_eq!(records[0].client, "DIAZ");
        assert_eq!(records[0].export_value, 100.0);
        assert_eq!(records[2].product, "Widget, Deluxe");
    }

    #[test]
    fn test_load_records_propagates_failure() {
        let source = MockSource::new(vec![None]);

        assert!(load_records(&source).is_err());
    }
}
