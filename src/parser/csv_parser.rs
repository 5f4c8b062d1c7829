// CSV sales table parsing
use crate::model::{ParserError, SalesRecord, SalesTable};
use crate::normalizer::{map_columns, PRODUCT_ID, TIMESTAMP, UNITS_SOLD};
use crate::utils::parse_date;
use tracing::debug;

pub trait Parser {
    fn parse(&self, text: &str) -> Result<SalesTable, ParserError>;
}

pub struct CsvSalesParser;

impl CsvSalesParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvSalesParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CsvSalesParser {
    fn parse(&self, text: &str) -> Result<SalesTable, ParserError> {
        parse_csv(text)
    }
}

/// Parses a CSV export with a header row. Column names are normalized,
/// so `Product`/`Units_Sold`/`Date` style headers are accepted.
pub fn parse_csv(text: &str) -> Result<SalesTable, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = map_columns(reader.headers()?.iter());
    let product_idx = columns.product_id.ok_or(ParserError::MissingColumn(PRODUCT_ID))?;
    let date_idx = columns.timestamp.ok_or(ParserError::MissingColumn(TIMESTAMP))?;
    let units_idx = columns.units_sold.ok_or(ParserError::MissingColumn(UNITS_SOLD))?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = i + 2;
        if row.iter().all(|f| f.is_empty()) {
            continue;
        }

        let product_id = row.get(product_idx).unwrap_or_default();
        if product_id.is_empty() {
            return Err(invalid(line, PRODUCT_ID, product_id));
        }

        let raw_date = row.get(date_idx).unwrap_or_default();
        let timestamp = parse_date(raw_date).ok_or_else(|| invalid(line, TIMESTAMP, raw_date))?;

        let raw_units = row.get(units_idx).unwrap_or_default();
        let units_sold = raw_units
            .parse::<f64>()
            .ok()
            .filter(|u| u.is_finite() && *u >= 0.0)
            .ok_or_else(|| invalid(line, UNITS_SOLD, raw_units))?;

        records.push(SalesRecord::new(product_id, timestamp, units_sold));
    }

    debug!("Parsed {} sales records", records.len());
    Ok(SalesTable::new(records))
}

fn invalid(row: usize, field: &'static str, value: &str) -> ParserError {
    ParserError::InvalidValue {
        row,
        field,
        value: value.to_string(),
    }
}
