use std::str::FromStr;

use crate::{Error, Record};

/// Text columns of a record that rows can be grouped by or labeled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    Fy,
    StuffingMonth,
    OrderNumber,
    CommercialInvoiceNo,
    ProductCode,
    Category,
    Segment,
    Product,
    Client,
    Country,
    Month,
}

impl Field {
    pub fn get<'r>(&self, record: &'r Record) -> &'r str {
        match *self {
            Field::Status => &record.status,
            Field::Fy => &record.fy,
            Field::StuffingMonth => &record.stuffing_month,
            Field::OrderNumber => &record.order_number,
            Field::CommercialInvoiceNo => &record.commercial_invoice_no,
            Field::ProductCode => &record.product_code,
            Field::Category => &record.category,
            Field::Segment => &record.segment,
            Field::Product => &record.product,
            Field::Client => &record.client,
            Field::Country => &record.country,
            Field::Month => &record.month,
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(name: &str) -> Result<Field, Self::Err> {
        Ok(match name {
            "status" => Field::Status,
            "fy" => Field::Fy,
            "stuffing_month" => Field::StuffingMonth,
            "order_number" => Field::OrderNumber,
            "commercial_invoice_no" => Field::CommercialInvoiceNo,
            "product_code" => Field::ProductCode,
            "category" => Field::Category,
            "segment" => Field::Segment,
            "product" => Field::Product,
            "client" => Field::Client,
            "country" => Field::Country,
            "month" => Field::Month,
            _ => return Err(Error::UnknownField(name.to_string())),
        })
    }
}

/// Numeric columns that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Qty,
    UnitPrice,
    ExportValue,
    FobPrice,
    Moq,
}

impl Measure {
    pub fn get(&self, record: &Record) -> f64 {
        match *self {
            Measure::Qty => record.qty,
            Measure::UnitPrice => record.unit_price,
            Measure::ExportValue => record.export_value,
            Measure::FobPrice => record.fob_price,
            Measure::Moq => record.moq,
        }
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(name: &str) -> Result<Measure, Self::Err> {
        Ok(match name {
            "qty" => Measure::Qty,
            "unit_price" => Measure::UnitPrice,
            "export_value" => Measure::ExportValue,
            "fob_price" => Measure::FobPrice,
            "moq" => Measure::Moq,
            _ => return Err(Error::UnknownField(name.to_string())),
        })
    }
}
