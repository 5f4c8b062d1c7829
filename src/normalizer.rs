// Maps the column names seen in exported sales sheets onto canonical ones.

pub const PRODUCT_ID: &str = "product_id";
pub const TIMESTAMP: &str = "timestamp";
pub const UNITS_SOLD: &str = "units_sold";

const ALIASES: &[(&str, &[&str])] = &[
    (PRODUCT_ID, &["product_id", "product", "product_name", "productid", "sku"]),
    (TIMESTAMP, &["timestamp", "date", "week", "week_start"]),
    (UNITS_SOLD, &["units_sold", "units", "weekly_sales", "sales", "quantity"]),
];

/// Returns the canonical column name for a header, if it is a known alias.
pub fn normalize_header(header: &str) -> Option<&'static str> {
    let key = header.trim().to_lowercase().replace([' ', '-'], "_");
    for (canonical, aliases) in ALIASES {
        if aliases.iter().any(|a| *a == key) {
            return Some(canonical);
        }
    }
    None
}

/// Position of each canonical column in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub product_id: Option<usize>,
    pub timestamp: Option<usize>,
    pub units_sold: Option<usize>,
}

pub fn map_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> ColumnMap {
    let mut map = ColumnMap {
        product_id: None,
        timestamp: None,
        units_sold: None,
    };

    for (idx, header) in headers.into_iter().enumerate() {
        let slot = match normalize_header(header) {
            Some(PRODUCT_ID) => &mut map.product_id,
            Some(TIMESTAMP) => &mut map.timestamp,
            Some(UNITS_SOLD) => &mut map.units_sold,
            _ => continue,
        };
        // first matching column wins
        if slot.is_none() {
            *slot = Some(idx);
        }
    }

    map
}
