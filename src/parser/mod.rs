// Parsers turning raw sales exports into normalized records.

pub mod csv_parser;

pub use csv_parser::{parse_csv, CsvSalesParser, Parser};
